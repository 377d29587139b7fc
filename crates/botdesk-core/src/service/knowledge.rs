//! Knowledge ingestion: document upload, page scrape, sitemap crawl.
//!
//! Only local checks happen here (file type, emptiness, URL shape); the
//! platform does the actual parsing and indexing.

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use botdesk_types::chatbot::ChatbotId;
use botdesk_types::error::ApiError;
use botdesk_types::knowledge::{IngestReceipt, KnowledgeSource, SUPPORTED_DOCUMENT_EXTENSIONS};

use crate::api::PlatformApi;

/// Check that `url` is an absolute http(s) URL with a host.
///
/// Returns the trimmed URL.
pub fn validate_http_url(url: &str) -> Result<&str, ApiError> {
    let url = url.trim();
    let invalid = || ApiError::Validation(format!("Not a valid http(s) URL: {url}"));

    let (scheme, rest) = url.split_once("://").ok_or_else(invalid)?;
    if !scheme.eq_ignore_ascii_case("http") && !scheme.eq_ignore_ascii_case("https") {
        return Err(invalid());
    }
    let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
    if host.is_empty() || url.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    Ok(url)
}

/// Check the extension against the supported document formats.
pub fn validate_document_type(path: &Path) -> Result<(), ApiError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    if SUPPORTED_DOCUMENT_EXTENSIONS.contains(&ext.as_str()) {
        Ok(())
    } else {
        Err(ApiError::Validation(format!(
            "Unsupported file type. Supported: {}",
            SUPPORTED_DOCUMENT_EXTENSIONS.join(", ")
        )))
    }
}

pub struct KnowledgeService<A: PlatformApi> {
    api: Arc<A>,
}

impl<A: PlatformApi> KnowledgeService<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    /// Validate and submit any knowledge source.
    pub async fn ingest(
        &self,
        id: ChatbotId,
        source: &KnowledgeSource,
    ) -> Result<IngestReceipt, ApiError> {
        let receipt = match source {
            KnowledgeSource::Document { path } => self.upload_document(id, path).await?,
            KnowledgeSource::Url { url } => self.scrape_url(id, url).await?,
            KnowledgeSource::Sitemap { url, limit } => self.process_sitemap(id, url, *limit).await?,
        };
        info!(chatbot_id = %id, kind = source.kind(), %source, "knowledge ingested");
        Ok(receipt)
    }

    /// Upload a `.pdf`, `.docx`, or `.txt` file. Empty files are rejected.
    pub async fn upload_document(&self, id: ChatbotId, path: &Path) -> Result<IngestReceipt, ApiError> {
        validate_document_type(path)?;
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|_| ApiError::Validation(format!("File not found: {}", path.display())))?;
        if !metadata.is_file() {
            return Err(ApiError::Validation(format!("Not a file: {}", path.display())));
        }
        if metadata.len() == 0 {
            return Err(ApiError::Validation(format!("File is empty: {}", path.display())));
        }
        self.api.upload_document(id, path).await
    }

    pub async fn scrape_url(&self, id: ChatbotId, url: &str) -> Result<IngestReceipt, ApiError> {
        let url = validate_http_url(url)?;
        self.api.scrape_url(id, url).await
    }

    /// Crawl a sitemap. `limit`, when given, must be at least 1; `None`
    /// processes every page.
    pub async fn process_sitemap(
        &self,
        id: ChatbotId,
        sitemap_url: &str,
        limit: Option<u32>,
    ) -> Result<IngestReceipt, ApiError> {
        let url = validate_http_url(sitemap_url)?;
        if limit == Some(0) {
            return Err(ApiError::Validation("Page limit must be at least 1".to_string()));
        }
        self.api.process_sitemap(id, url, limit).await
    }
}

//! Knowledge source types.
//!
//! Ingestion itself happens on the platform. The console only names the
//! source and reports whatever receipt the backend returns.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::path::PathBuf;

/// Document formats accepted for upload.
pub const SUPPORTED_DOCUMENT_EXTENSIONS: &[&str] = &["pdf", "docx", "txt"];

/// A source of knowledge to attach to a chatbot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KnowledgeSource {
    /// A local file uploaded as multipart form data.
    Document { path: PathBuf },
    /// A single page scraped by the platform.
    Url { url: String },
    /// Every page listed in a sitemap, optionally capped at `limit` pages.
    Sitemap { url: String, limit: Option<u32> },
}

impl KnowledgeSource {
    /// Short label for progress and log messages.
    pub fn kind(&self) -> &'static str {
        match self {
            KnowledgeSource::Document { .. } => "document",
            KnowledgeSource::Url { .. } => "url",
            KnowledgeSource::Sitemap { .. } => "sitemap",
        }
    }
}

impl fmt::Display for KnowledgeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KnowledgeSource::Document { path } => write!(f, "{}", path.display()),
            KnowledgeSource::Url { url } => write!(f, "{url}"),
            KnowledgeSource::Sitemap { url, limit: Some(n) } => write!(f, "{url} (first {n} pages)"),
            KnowledgeSource::Sitemap { url, limit: None } => write!(f, "{url} (all pages)"),
        }
    }
}

/// Backend response to an ingestion request.
///
/// The shape is owned by the platform, so the payload is kept as raw JSON
/// with a few best-effort accessors for the summary line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IngestReceipt(pub serde_json::Value);

impl IngestReceipt {
    /// Human-readable message from the backend, if any.
    pub fn message(&self) -> Option<&str> {
        ["message", "detail", "status"]
            .iter()
            .find_map(|key| self.0.get(key).and_then(|v| v.as_str()))
    }

    /// Number of pages or chunks processed, if reported.
    pub fn processed_count(&self) -> Option<u64> {
        ["processed", "pages_processed", "chunks", "chunks_created", "total"]
            .iter()
            .find_map(|key| match self.0.get(key) {
                Some(serde_json::Value::Number(n)) => n.as_u64(),
                Some(serde_json::Value::Array(items)) => Some(items.len() as u64),
                _ => None,
            })
    }
}

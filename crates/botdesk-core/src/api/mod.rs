//! Platform API port.
//!
//! Every operation the console performs goes through [`PlatformApi`]. The
//! HTTP implementation lives in `botdesk-infra`; tests use an in-memory fake.
//! Uses native async fn in traits for request/response calls and a boxed
//! stream for the chat response, mirroring how the backend streams it.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use futures_util::Stream;

use botdesk_types::access_key::{AccessKey, CreateAccessKeyRequest};
use botdesk_types::auth::{AuthToken, LoginRequest};
use botdesk_types::chat::{ChatChunk, ChatRequest, SessionList, Transcript};
use botdesk_types::chatbot::{Chatbot, ChatbotId};
use botdesk_types::error::ApiError;
use botdesk_types::knowledge::IngestReceipt;

/// Incremental chat response: one item per server-sent event.
pub type ChatStream = Pin<Box<dyn Stream<Item = Result<ChatChunk, ApiError>> + Send + 'static>>;

/// The remote chatbot platform.
///
/// Implementations attach the signed-in user's bearer token and user id;
/// callers never pass credentials explicitly (except to `login`).
pub trait PlatformApi: Send + Sync {
    /// Exchange email and password for a bearer token.
    fn login(
        &self,
        request: &LoginRequest,
    ) -> impl Future<Output = Result<AuthToken, ApiError>> + Send;

    /// Register a new chatbot owned by the signed-in user.
    fn create_chatbot(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Chatbot, ApiError>> + Send;

    /// All chatbots owned by the signed-in user.
    fn list_chatbots(&self) -> impl Future<Output = Result<Vec<Chatbot>, ApiError>> + Send;

    fn get_chatbot(
        &self,
        id: ChatbotId,
    ) -> impl Future<Output = Result<Chatbot, ApiError>> + Send;

    fn rename_chatbot(
        &self,
        id: ChatbotId,
        name: &str,
    ) -> impl Future<Output = Result<Chatbot, ApiError>> + Send;

    /// Permanently delete a chatbot.
    fn delete_chatbot(&self, id: ChatbotId) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// Upload a local document into the chatbot's knowledge base.
    fn upload_document(
        &self,
        id: ChatbotId,
        path: &Path,
    ) -> impl Future<Output = Result<IngestReceipt, ApiError>> + Send;

    /// Have the platform scrape a single page.
    fn scrape_url(
        &self,
        id: ChatbotId,
        url: &str,
    ) -> impl Future<Output = Result<IngestReceipt, ApiError>> + Send;

    /// Have the platform crawl a sitemap, optionally capped at `limit` pages.
    fn process_sitemap(
        &self,
        id: ChatbotId,
        sitemap_url: &str,
        limit: Option<u32>,
    ) -> impl Future<Output = Result<IngestReceipt, ApiError>> + Send;

    /// Sessions across all of the user's chatbots, newest first.
    fn list_sessions(&self) -> impl Future<Output = Result<SessionList, ApiError>> + Send;

    /// Stored messages of one session.
    fn get_transcript(
        &self,
        id: ChatbotId,
        session_id: &str,
    ) -> impl Future<Output = Result<Transcript, ApiError>> + Send;

    /// Send a message. Resolves once the response headers arrive; content
    /// follows on the returned stream.
    fn send_chat(
        &self,
        id: ChatbotId,
        request: ChatRequest,
    ) -> impl Future<Output = Result<ChatStream, ApiError>> + Send;

    /// Issue an embed access key for a chatbot.
    fn create_access_key(
        &self,
        request: &CreateAccessKeyRequest,
    ) -> impl Future<Output = Result<AccessKey, ApiError>> + Send;

    fn deactivate_access_key(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<AccessKey, ApiError>> + Send;
}

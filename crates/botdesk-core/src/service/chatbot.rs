//! Chatbot management service.
//!
//! Creating or deleting a chatbot is followed by a re-list so the caller can
//! show the updated table. A failed re-list does not undo the change; it is
//! reported alongside the result.

use std::sync::Arc;

use tracing::{info, warn};

use botdesk_types::chatbot::{Chatbot, ChatbotId};
use botdesk_types::error::ApiError;

use crate::api::PlatformApi;
use crate::pagination::Paginator;

/// Result of a mutation plus the list fetched right after it.
#[derive(Debug)]
pub struct Refreshed<T> {
    pub value: T,
    pub chatbots: Result<Vec<Chatbot>, ApiError>,
}

pub struct ChatbotService<A: PlatformApi> {
    api: Arc<A>,
    page_size: usize,
}

fn validate_name(name: &str) -> Result<&str, ApiError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ApiError::Validation("Chatbot name cannot be empty".to_string()));
    }
    Ok(name)
}

impl<A: PlatformApi> ChatbotService<A> {
    pub fn new(api: Arc<A>, page_size: usize) -> Self {
        Self { api, page_size }
    }

    /// Create a chatbot. Issues exactly one creation request, then re-lists.
    pub async fn create(&self, name: &str) -> Result<Refreshed<Chatbot>, ApiError> {
        let name = validate_name(name)?;
        let chatbot = self.api.create_chatbot(name).await?;
        info!(chatbot_id = %chatbot.id, name = %chatbot.name, "chatbot created");
        Ok(Refreshed {
            value: chatbot,
            chatbots: self.relist().await,
        })
    }

    pub async fn list(&self) -> Result<Vec<Chatbot>, ApiError> {
        self.api.list_chatbots().await
    }

    /// Fetch the list and open it at `page` (clamped).
    pub async fn page(&self, page: usize) -> Result<Paginator<Chatbot>, ApiError> {
        let mut pager = Paginator::new(self.list().await?, self.page_size);
        pager.goto(page);
        Ok(pager)
    }

    pub async fn get(&self, id: ChatbotId) -> Result<Chatbot, ApiError> {
        self.api.get_chatbot(id).await
    }

    pub async fn rename(&self, id: ChatbotId, name: &str) -> Result<Chatbot, ApiError> {
        let name = validate_name(name)?;
        let chatbot = self.api.rename_chatbot(id, name).await?;
        info!(chatbot_id = %id, name = %chatbot.name, "chatbot renamed");
        Ok(chatbot)
    }

    /// Delete a chatbot, then re-list. Confirmation is the caller's job.
    pub async fn delete(&self, id: ChatbotId) -> Result<Refreshed<ChatbotId>, ApiError> {
        self.api.delete_chatbot(id).await?;
        info!(chatbot_id = %id, "chatbot deleted");
        Ok(Refreshed {
            value: id,
            chatbots: self.relist().await,
        })
    }

    async fn relist(&self) -> Result<Vec<Chatbot>, ApiError> {
        let result = self.api.list_chatbots().await;
        if let Err(e) = &result {
            warn!(error = %e, "failed to refresh chatbot list");
        }
        result
    }
}

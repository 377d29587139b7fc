//! Embed access keys and the widget snippet.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::info;

use botdesk_types::access_key::{AccessKey, CreateAccessKeyRequest};
use botdesk_types::chatbot::ChatbotId;
use botdesk_types::error::ApiError;

use crate::api::PlatformApi;

pub struct EmbedService<A: PlatformApi> {
    api: Arc<A>,
    widget_url: String,
}

impl<A: PlatformApi> EmbedService<A> {
    pub fn new(api: Arc<A>, widget_url: impl Into<String>) -> Self {
        Self {
            api,
            widget_url: widget_url.into(),
        }
    }

    /// Issue a key for `chatbot_id`. Without `expires_in_days` the platform
    /// applies its default expiry.
    pub async fn issue(
        &self,
        chatbot_id: ChatbotId,
        expires_in_days: Option<u32>,
    ) -> Result<AccessKey, ApiError> {
        if expires_in_days == Some(0) {
            return Err(ApiError::Validation("Expiry must be at least 1 day".to_string()));
        }
        let request = CreateAccessKeyRequest {
            chatbot_id,
            expires_at: expires_in_days.map(|days| Utc::now() + Duration::days(i64::from(days))),
        };
        let key = self.api.create_access_key(&request).await?;
        info!(chatbot_id = %chatbot_id, key_id = key.id, "access key issued");
        Ok(key)
    }

    pub async fn revoke(&self, key: &str) -> Result<AccessKey, ApiError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(ApiError::Validation("Access key cannot be empty".to_string()));
        }
        let revoked = self.api.deactivate_access_key(key).await?;
        info!(key_id = revoked.id, "access key deactivated");
        Ok(revoked)
    }

    /// The `<script>` tag to paste into a web page.
    pub fn snippet(&self, key: &AccessKey) -> String {
        key.embed_snippet(&self.widget_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeApi;

    fn service() -> (EmbedService<FakeApi>, Arc<FakeApi>) {
        let api = Arc::new(FakeApi::new());
        (EmbedService::new(api.clone(), "https://cdn.example.com/widget.js"), api)
    }

    #[tokio::test]
    async fn issue_renders_snippet() {
        let (svc, _) = service();
        let key = svc.issue(ChatbotId(3), None).await.unwrap();
        assert_eq!(key.chatbot_id, ChatbotId(3));
        assert!(key.expires_at.is_none());
        assert_eq!(
            svc.snippet(&key),
            r#"<script src="https://cdn.example.com/widget.js" data-access-key="ak_live_123" defer></script>"#
        );
    }

    #[tokio::test]
    async fn issue_with_expiry() {
        let (svc, api) = service();
        assert!(svc.issue(ChatbotId(3), Some(0)).await.is_err());
        assert!(api.calls().is_empty());

        let key = svc.issue(ChatbotId(3), Some(7)).await.unwrap();
        let expires = key.expires_at.unwrap();
        assert!(expires > Utc::now() + Duration::days(6));
        assert!(key.is_usable_at(Utc::now()));
    }

    #[tokio::test]
    async fn revoke_marks_inactive() {
        let (svc, api) = service();
        assert!(svc.revoke("  ").await.is_err());
        let key = svc.revoke("ak_live_123").await.unwrap();
        assert!(!key.is_active);
        assert_eq!(api.calls(), vec!["deactivate_access_key"]);
    }
}

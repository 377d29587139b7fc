//! Embed access keys.
//!
//! An access key lets a public web page talk to one chatbot through the
//! embeddable widget without the owner's credentials.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::chat::timestamp;
use crate::chatbot::ChatbotId;

/// Body of `POST /access-keys/`. The platform defaults expiry to 30 days.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAccessKeyRequest {
    pub chatbot_id: ChatbotId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessKey {
    pub id: i64,
    pub key: String,
    pub chatbot_id: ChatbotId,
    pub is_active: bool,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default, with = "timestamp::option")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl AccessKey {
    /// Render the `<script>` tag that embeds the chat widget on a web page.
    pub fn embed_snippet(&self, widget_url: &str) -> String {
        format!(
            r#"<script src="{widget_url}" data-access-key="{}" defer></script>"#,
            self.key
        )
    }

    /// Whether the key can still be used at `now`.
    pub fn is_usable_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.expires_at.is_none_or(|exp| exp > now)
    }
}

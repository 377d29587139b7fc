use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Server-assigned identifier of a chatbot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatbotId(pub i64);

impl fmt::Display for ChatbotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ChatbotId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(ChatbotId)
            .map_err(|_| format!("invalid chatbot id: '{s}'"))
    }
}

/// A chatbot owned by the signed-in user.
///
/// The platform owns the knowledge index (`index_id`); the console only
/// displays it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chatbot {
    pub id: ChatbotId,
    pub name: String,
    pub user_id: i64,
    #[serde(default)]
    pub index_id: Option<String>,
    /// Freeform lifecycle label reported by the backend, absent on older deployments.
    #[serde(default)]
    pub status: Option<String>,
}

impl Chatbot {
    /// Lifecycle state for display. A missing label reads as active.
    pub fn status(&self) -> ChatbotStatus {
        match self.status.as_deref() {
            None => ChatbotStatus::Active,
            Some(raw) => raw.parse().unwrap_or(ChatbotStatus::Other(raw.to_string())),
        }
    }
}

/// Display states for a chatbot's status badge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatbotStatus {
    Active,
    Inactive,
    Pending,
    Error,
    Other(String),
}

impl fmt::Display for ChatbotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatbotStatus::Active => write!(f, "active"),
            ChatbotStatus::Inactive => write!(f, "inactive"),
            ChatbotStatus::Pending => write!(f, "pending"),
            ChatbotStatus::Error => write!(f, "error"),
            ChatbotStatus::Other(s) => write!(f, "{s}"),
        }
    }
}

impl FromStr for ChatbotStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(ChatbotStatus::Active),
            "inactive" => Ok(ChatbotStatus::Inactive),
            "pending" => Ok(ChatbotStatus::Pending),
            "error" => Ok(ChatbotStatus::Error),
            other => Err(format!("unknown chatbot status: '{other}'")),
        }
    }
}

/// Body of `POST /chatbots`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateChatbotRequest {
    pub name: String,
    pub user_id: i64,
}

/// Body of `PUT /chatbots/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateChatbotRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_id: Option<String>,
}

//! Client configuration types for botdesk.
//!
//! `ClientConfig` represents `config.toml` in the data directory. Every
//! field has a default, so an empty or missing file is valid.

use serde::{Deserialize, Serialize};

/// Top-level configuration for the console.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the platform API, without the `/api/v1` prefix.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Script URL referenced by generated embed snippets.
    #[serde(default = "default_widget_url")]
    pub widget_url: String,

    /// Timeout for non-streaming requests, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Rows per page when listing chatbots.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_api_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_widget_url() -> String {
    "http://localhost:3000/widget.js".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_page_size() -> usize {
    10
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            widget_url: default_widget_url(),
            request_timeout_secs: default_request_timeout_secs(),
            page_size: default_page_size(),
        }
    }
}

impl ClientConfig {
    /// Versioned API root, e.g. `http://localhost:8000/api/v1`.
    pub fn api_root(&self) -> String {
        format!("{}/api/v1", self.api_base_url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_default_values() {
        let config = ClientConfig::default();
        assert_eq!(config.api_base_url, "http://localhost:8000");
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.page_size, 10);
    }

    #[test]
    fn test_client_config_deserialize_with_defaults() {
        let config: ClientConfig = toml::from_str("").unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_client_config_deserialize_with_values() {
        let toml_str = r#"
api_base_url = "https://bots.example.com/"
page_size = 25
"#;
        let config: ClientConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.page_size, 25);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.api_root(), "https://bots.example.com/api/v1");
    }
}

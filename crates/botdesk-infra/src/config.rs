//! Client configuration loader for botdesk.
//!
//! Reads `config.toml` from the data directory (`~/.botdesk/` in production)
//! and deserializes it into [`ClientConfig`]. Falls back to defaults when the
//! file is missing or malformed. `BOTDESK_API_URL` overrides the API base URL.

use std::path::{Path, PathBuf};

use botdesk_types::config::ClientConfig;

pub const DATA_DIR_ENV_VAR: &str = "BOTDESK_DATA_DIR";
pub const API_URL_ENV_VAR: &str = "BOTDESK_API_URL";

/// Resolve the data directory.
///
/// Priority: `BOTDESK_DATA_DIR`, then `~/.botdesk`, then `./.botdesk`.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV_VAR) {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".botdesk");
    }

    PathBuf::from(".botdesk")
}

/// Load configuration from `{data_dir}/config.toml`, then apply environment
/// overrides.
pub async fn load_client_config(data_dir: &Path) -> ClientConfig {
    let config = read_config_file(data_dir).await;
    apply_env_overrides(config, std::env::var(API_URL_ENV_VAR).ok())
}

async fn read_config_file(data_dir: &Path) -> ClientConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return ClientConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return ClientConfig::default();
        }
    };

    match toml::from_str::<ClientConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            ClientConfig::default()
        }
    }
}

/// Apply an API URL override if one is set and non-blank.
pub fn apply_env_overrides(mut config: ClientConfig, api_url: Option<String>) -> ClientConfig {
    if let Some(url) = api_url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty()) {
        tracing::debug!(api_base_url = %url, "API URL overridden from environment");
        config.api_base_url = url;
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = read_config_file(tmp.path()).await;
        assert_eq!(config, ClientConfig::default());
    }

    #[tokio::test]
    async fn valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            r#"
api_base_url = "https://bots.example.com"
widget_url = "https://cdn.example.com/widget.js"
request_timeout_secs = 10
"#,
        )
        .await
        .unwrap();

        let config = read_config_file(tmp.path()).await;
        assert_eq!(config.api_base_url, "https://bots.example.com");
        assert_eq!(config.request_timeout_secs, 10);
        assert_eq!(config.page_size, 10);
    }

    #[tokio::test]
    async fn invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = read_config_file(tmp.path()).await;
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn env_override_replaces_base_url() {
        let config = apply_env_overrides(
            ClientConfig::default(),
            Some(" https://staging.example.com ".to_string()),
        );
        assert_eq!(config.api_base_url, "https://staging.example.com");

        let config = apply_env_overrides(ClientConfig::default(), Some("  ".to_string()));
        assert_eq!(config.api_base_url, "http://localhost:8000");
    }
}

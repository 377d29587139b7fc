//! Credential stores: a JSON file in the data directory and the process
//! environment.
//!
//! The default chain is `[EnvCredentialStore, FileCredentialStore]`, so a
//! token exported in the shell overrides the one saved by `bdesk login`.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use botdesk_core::credentials::{CredentialStore, Credentials};
use botdesk_types::error::ApiError;

pub const TOKEN_ENV_VAR: &str = "BOTDESK_TOKEN";
pub const USER_ID_ENV_VAR: &str = "BOTDESK_USER_ID";

const CREDENTIALS_FILE: &str = "credentials.json";

/// On-disk shape of `credentials.json`.
#[derive(Serialize, Deserialize)]
struct StoredCredentials {
    token: String,
    user_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    email: Option<String>,
}

/// `{data_dir}/credentials.json`, readable only by the owner on unix.
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(CREDENTIALS_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, action: &str, err: std::io::Error) -> ApiError {
        ApiError::Credentials(format!("failed to {action} {}: {err}", self.path.display()))
    }
}

impl CredentialStore for FileCredentialStore {
    fn name(&self) -> &'static str {
        "file"
    }

    fn load(&self) -> Result<Option<Credentials>, ApiError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(self.io_error("read", err)),
        };
        let stored: StoredCredentials = serde_json::from_str(&content).map_err(|e| {
            ApiError::Credentials(format!("malformed {}: {e}", self.path.display()))
        })?;
        Ok(Some(Credentials::new(stored.token, stored.user_id, stored.email)))
    }

    fn save(&self, credentials: &Credentials) -> Result<(), ApiError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.io_error("create directory for", e))?;
        }
        let stored = StoredCredentials {
            token: credentials.token.expose_secret().to_string(),
            user_id: credentials.user_id,
            email: credentials.email.clone(),
        };
        let json = serde_json::to_vec_pretty(&stored)
            .map_err(|e| ApiError::Credentials(e.to_string()))?;

        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&self.path).map_err(|e| self.io_error("open", e))?;
        file.write_all(&json).map_err(|e| self.io_error("write", e))?;

        // `mode` only applies on creation; tighten a pre-existing file too.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))
                .map_err(|e| self.io_error("set permissions on", e))?;
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), ApiError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(self.io_error("remove", err)),
        }
    }
}

/// Read-only store backed by `BOTDESK_TOKEN` and `BOTDESK_USER_ID`.
pub struct EnvCredentialStore {
    token_var: String,
    user_id_var: String,
}

impl EnvCredentialStore {
    pub fn new() -> Self {
        Self::with_vars(TOKEN_ENV_VAR, USER_ID_ENV_VAR)
    }

    /// Read from differently named variables.
    pub fn with_vars(token_var: impl Into<String>, user_id_var: impl Into<String>) -> Self {
        Self {
            token_var: token_var.into(),
            user_id_var: user_id_var.into(),
        }
    }

    fn var(name: &str) -> Option<String> {
        std::env::var(name).ok().filter(|v| !v.trim().is_empty())
    }
}

impl Default for EnvCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore for EnvCredentialStore {
    fn name(&self) -> &'static str {
        "env"
    }

    fn load(&self) -> Result<Option<Credentials>, ApiError> {
        let Some(token) = Self::var(&self.token_var) else {
            return Ok(None);
        };
        let user_id = Self::var(&self.user_id_var)
            .and_then(|v| v.trim().parse::<i64>().ok())
            .ok_or_else(|| {
                ApiError::Credentials(format!(
                    "{} is set but {} is missing or not a number",
                    self.token_var, self.user_id_var
                ))
            })?;
        Ok(Some(Credentials::new(token.trim(), user_id, None)))
    }

    fn save(&self, _credentials: &Credentials) -> Result<(), ApiError> {
        Err(ApiError::Credentials(
            "environment credential store is read-only".to_string(),
        ))
    }

    fn clear(&self) -> Result<(), ApiError> {
        Err(ApiError::Credentials(
            "environment credential store is read-only".to_string(),
        ))
    }

    fn is_writable(&self) -> bool {
        false
    }
}

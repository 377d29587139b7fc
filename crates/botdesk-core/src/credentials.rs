//! Credential storage port and the store chain.
//!
//! The console keeps the bearer token and user id between invocations.
//! Stores are chained in priority order: the first store that has
//! credentials wins on load, saves go to the first writable store.
//!
//! This module depends only on `botdesk-types` and the `CredentialStore`
//! trait -- concrete stores live in `botdesk-infra`.

use std::fmt;
use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

use botdesk_types::auth::AuthToken;
use botdesk_types::error::ApiError;

/// A signed-in identity: bearer token plus the owning user id.
#[derive(Clone)]
pub struct Credentials {
    pub token: SecretString,
    pub user_id: i64,
    /// Email used at login, kept for `whoami`. Absent for env-provided tokens.
    pub email: Option<String>,
}

impl Credentials {
    pub fn new(token: impl Into<String>, user_id: i64, email: Option<String>) -> Self {
        Self {
            token: SecretString::from(token.into()),
            user_id,
            email,
        }
    }

    pub fn from_token(token: &AuthToken, email: Option<String>) -> Self {
        Self::new(token.access_token.clone(), token.user_id, email)
    }

    /// Token with all but the last 4 characters hidden.
    pub fn masked_token(&self) -> String {
        mask_token(self.token.expose_secret())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"[REDACTED]")
            .field("user_id", &self.user_id)
            .field("email", &self.email)
            .finish()
    }
}

/// Mask a token for display, e.g. `****a1b2`.
pub fn mask_token(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 4 {
        "****".to_string()
    } else {
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("****{tail}")
    }
}

/// A place credentials can be read from and (optionally) written to.
///
/// Methods are synchronous: stores are small local files or environment
/// variables, and the HTTP client reads them once per request.
pub trait CredentialStore: Send + Sync {
    /// Short name used in logs and `whoami` output.
    fn name(&self) -> &'static str;

    /// Stored credentials, or `None` if this store has none.
    fn load(&self) -> Result<Option<Credentials>, ApiError>;

    fn save(&self, credentials: &Credentials) -> Result<(), ApiError>;

    /// Remove stored credentials. Clearing an empty store is not an error.
    fn clear(&self) -> Result<(), ApiError>;

    /// Read-only stores reject `save` and `clear`.
    fn is_writable(&self) -> bool {
        true
    }
}

pub type DynCredentialStore = Arc<dyn CredentialStore>;

/// Stores in priority order, highest first.
pub struct CredentialChain {
    stores: Vec<DynCredentialStore>,
}

impl CredentialChain {
    pub fn new(stores: Vec<DynCredentialStore>) -> Self {
        Self { stores }
    }

    /// Load from the first store that has credentials, along with its name.
    ///
    /// A store that fails to load ends the lookup with its error. Lower
    /// priority stores are never consulted in its place, so a half-set
    /// environment cannot quietly sign in as the user in the file.
    pub fn load_with_source(&self) -> Result<Option<(Credentials, &'static str)>, ApiError> {
        for store in &self.stores {
            match store.load() {
                Ok(Some(creds)) => {
                    debug!(store = store.name(), user_id = creds.user_id, "credentials loaded");
                    return Ok(Some((creds, store.name())));
                }
                Ok(None) => continue,
                Err(e) => {
                    warn!(store = store.name(), error = %e, "credential store unreadable");
                    return Err(e);
                }
            }
        }
        Ok(None)
    }
}

impl CredentialStore for CredentialChain {
    fn name(&self) -> &'static str {
        "chain"
    }

    fn load(&self) -> Result<Option<Credentials>, ApiError> {
        Ok(self.load_with_source()?.map(|(creds, _)| creds))
    }

    fn save(&self, credentials: &Credentials) -> Result<(), ApiError> {
        let store = self
            .stores
            .iter()
            .find(|s| s.is_writable())
            .ok_or_else(|| ApiError::Credentials("no writable credential store available".to_string()))?;
        store.save(credentials)?;
        debug!(store = store.name(), "credentials saved");
        Ok(())
    }

    fn clear(&self) -> Result<(), ApiError> {
        for store in self.stores.iter().filter(|s| s.is_writable()) {
            store.clear()?;
        }
        Ok(())
    }

    fn is_writable(&self) -> bool {
        self.stores.iter().any(|s| s.is_writable())
    }
}

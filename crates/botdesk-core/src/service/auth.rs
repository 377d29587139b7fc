//! Sign-in, sign-out, and identity lookup.

use std::sync::Arc;

use tracing::info;

use botdesk_types::auth::LoginRequest;
use botdesk_types::error::ApiError;

use crate::api::PlatformApi;
use crate::credentials::{CredentialChain, CredentialStore, Credentials};

/// The signed-in identity and the store it came from.
#[derive(Debug, Clone)]
pub struct Identity {
    pub credentials: Credentials,
    pub source: &'static str,
}

pub struct AuthService<A: PlatformApi> {
    api: Arc<A>,
    credentials: Arc<CredentialChain>,
}

impl<A: PlatformApi> AuthService<A> {
    pub fn new(api: Arc<A>, credentials: Arc<CredentialChain>) -> Self {
        Self { api, credentials }
    }

    /// Exchange email and password for a token and persist it.
    ///
    /// Both fields are required; nothing is sent if either is blank.
    pub async fn login(&self, email: &str, password: &str) -> Result<Credentials, ApiError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(ApiError::Validation("Email is required".to_string()));
        }
        if password.is_empty() {
            return Err(ApiError::Validation("Password is required".to_string()));
        }

        let token = self
            .api
            .login(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await?;

        let credentials = Credentials::from_token(&token, Some(email.to_string()));
        self.credentials.save(&credentials)?;
        info!(user_id = credentials.user_id, "signed in");
        Ok(credentials)
    }

    /// Forget stored credentials. Returns whether anyone was signed in.
    pub fn logout(&self) -> Result<bool, ApiError> {
        let was_signed_in = self.credentials.load()?.is_some();
        self.credentials.clear()?;
        if was_signed_in {
            info!("signed out");
        }
        Ok(was_signed_in)
    }

    pub fn whoami(&self) -> Result<Identity, ApiError> {
        let (credentials, source) = self
            .credentials
            .load_with_source()?
            .ok_or(ApiError::NotAuthenticated)?;
        Ok(Identity { credentials, source })
    }
}

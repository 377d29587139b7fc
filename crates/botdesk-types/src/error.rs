use thiserror::Error;

/// Fallback shown when the server rejects a request without a detail message.
pub const GENERIC_SERVER_MESSAGE: &str = "An error occurred";

/// Shown for a 401 that carries no detail.
pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Run `bdesk login` again.";

/// Shown when no response came back at all.
pub const NETWORK_MESSAGE: &str = "Network error or server not reachable";

/// Errors from talking to the chatbot platform.
///
/// Every failure in the console ends up as one of these and is surfaced to
/// the user once via [`ApiError::user_message`]. Nothing is retried.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("not signed in")]
    NotAuthenticated,

    #[error("credentials rejected: {}", .detail.as_deref().unwrap_or("no detail"))]
    Unauthorized { detail: Option<String> },

    #[error("server returned {status}: {}", .detail.as_deref().unwrap_or(GENERIC_SERVER_MESSAGE))]
    Server { status: u16, detail: Option<String> },

    #[error("network error: {0}")]
    Network(String),

    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("stream error: {0}")]
    Stream(String),

    #[error("{0}")]
    Validation(String),

    #[error("credential store error: {0}")]
    Credentials(String),
}

impl ApiError {
    /// The one-line notification shown to the user.
    ///
    /// A server-supplied detail wins; otherwise a generic message for the
    /// failure class.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::NotAuthenticated => "You are not signed in. Run `bdesk login` first.".to_string(),
            ApiError::Unauthorized { detail } => detail
                .clone()
                .unwrap_or_else(|| SESSION_EXPIRED_MESSAGE.to_string()),
            ApiError::Server { detail, .. } => detail
                .clone()
                .unwrap_or_else(|| GENERIC_SERVER_MESSAGE.to_string()),
            ApiError::Network(_) => NETWORK_MESSAGE.to_string(),
            ApiError::Decode(_) => GENERIC_SERVER_MESSAGE.to_string(),
            ApiError::Stream(msg) => msg.clone(),
            ApiError::Validation(msg) => msg.clone(),
            ApiError::Credentials(msg) => msg.clone(),
        }
    }

    /// Whether a fresh login could fix this error.
    pub fn needs_login(&self) -> bool {
        matches!(self, ApiError::NotAuthenticated | ApiError::Unauthorized { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_detail_preferred() {
        let err = ApiError::Server {
            status: 404,
            detail: Some("Chatbot not found".to_string()),
        };
        assert_eq!(err.user_message(), "Chatbot not found");
        assert_eq!(err.to_string(), "server returned 404: Chatbot not found");
    }

    #[test]
    fn test_server_without_detail_falls_back() {
        let err = ApiError::Server {
            status: 500,
            detail: None,
        };
        assert_eq!(err.user_message(), GENERIC_SERVER_MESSAGE);
    }

    #[test]
    fn test_network_message() {
        let err = ApiError::Network("connection refused".to_string());
        assert_eq!(err.user_message(), NETWORK_MESSAGE);
        assert!(!err.needs_login());
        assert!(ApiError::Unauthorized { detail: None }.needs_login());
    }

    #[test]
    fn test_unauthorized_prefers_detail() {
        let err = ApiError::Unauthorized {
            detail: Some("Incorrect email or password".to_string()),
        };
        assert_eq!(err.user_message(), "Incorrect email or password");
        assert!(err.needs_login());
        let err = ApiError::Unauthorized { detail: None };
        assert_eq!(err.user_message(), SESSION_EXPIRED_MESSAGE);
    }
}

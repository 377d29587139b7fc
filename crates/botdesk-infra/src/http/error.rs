//! Mapping HTTP failures to [`ApiError`].

use reqwest::StatusCode;

use botdesk_types::error::ApiError;

/// Pull a human-readable message out of an error body.
///
/// The platform answers with `{"detail": "..."}`, or for request validation
/// failures `{"detail": [{"msg": "...", ...}, ...]}`. Anything else yields
/// `None`.
pub fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        serde_json::Value::Array(items) => items
            .first()
            .and_then(|item| item.get("msg"))
            .and_then(|msg| msg.as_str())
            .map(String::from),
        _ => None,
    }
}

/// Error for a non-success status with the response body already read.
pub fn status_error(status: StatusCode, body: &str) -> ApiError {
    let detail = extract_detail(body);
    if status == StatusCode::UNAUTHORIZED {
        return ApiError::Unauthorized { detail };
    }
    ApiError::Server {
        status: status.as_u16(),
        detail,
    }
}

/// Error for a request that produced no response.
pub fn transport_error(err: reqwest::Error) -> ApiError {
    if err.is_decode() {
        return ApiError::Decode(err.to_string());
    }
    ApiError::Network(err.to_string())
}

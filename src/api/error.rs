//! API Client Error Types
//!
//! Classifies every failure of a backend round trip into transport,
//! backend-reported, or malformed-response errors.

use thiserror::Error;

/// Errors that can occur when talking to the backend
#[derive(Error, Debug)]
pub enum ApiError {
    /// Connection could not be established
    #[error("Backend unavailable")]
    Unavailable,

    /// Request did not complete within the configured timeout
    #[error("Request timeout")]
    Timeout,

    /// Other transport-level failure
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Backend answered with a non-2xx status
    #[error("API error {status}: {message}")]
    Backend { status: u16, message: String },

    /// Backend kept answering 429
    #[error("Rate limited")]
    RateLimited,

    /// Response body did not have the expected shape
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// Base URL or resource URL could not be built
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Local file could not be read for upload
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Broad failure class, used for reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    Backend,
    Malformed,
    Local,
}

impl ApiError {
    /// Classify a reqwest error the way the retry loop needs it
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_connect() {
            ApiError::Unavailable
        } else {
            ApiError::Request(err)
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Unavailable
            | ApiError::Timeout
            | ApiError::Request(_)
            | ApiError::RateLimited => ErrorKind::Transport,
            ApiError::Backend { .. } => ErrorKind::Backend,
            ApiError::Malformed(_) => ErrorKind::Malformed,
            ApiError::InvalidUrl(_) | ApiError::Io(_) => ErrorKind::Local,
        }
    }

    /// Whether a retry could plausibly succeed
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Unavailable | ApiError::Timeout | ApiError::RateLimited => true,
            ApiError::Backend { status, .. } => matches!(status, 502 | 503 | 504),
            _ => false,
        }
    }

    /// Message suitable for a user-facing notification
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Backend { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Pull a human-readable message out of an error response body
///
/// Django REST framework answers with `{"error": ...}` from the custom views
/// and `{"detail": ...}` from the framework itself.
pub(crate) fn extract_message(body: &str, status: u16) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["error", "detail", "message"] {
            if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
                return text.to_string();
            }
        }
        if let Some(text) = value.as_str() {
            return text.to_string();
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {}", status)
    } else {
        trimmed.to_string()
    }
}

/// Result type for backend operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_message_from_error_field() {
        let msg = extract_message(r#"{"error": "Keywords required"}"#, 400);
        assert_eq!(msg, "Keywords required");
    }

    #[test]
    fn test_extract_message_from_detail_field() {
        let msg = extract_message(r#"{"detail": "Not found."}"#, 404);
        assert_eq!(msg, "Not found.");
    }

    #[test]
    fn test_extract_message_fallbacks() {
        assert_eq!(extract_message("\"No IDs provided\"", 400), "No IDs provided");
        assert_eq!(extract_message("<html>oops</html>", 500), "<html>oops</html>");
        assert_eq!(extract_message("  ", 502), "HTTP 502");
    }

    #[test]
    fn test_transient_classification() {
        assert!(ApiError::Timeout.is_transient());
        assert!(ApiError::Unavailable.is_transient());
        assert!(ApiError::Backend { status: 503, message: String::new() }.is_transient());
        assert!(!ApiError::Backend { status: 400, message: String::new() }.is_transient());
        assert!(!ApiError::Malformed("x".into()).is_transient());
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(ApiError::Timeout.kind(), ErrorKind::Transport);
        assert_eq!(
            ApiError::Backend { status: 500, message: "boom".into() }.kind(),
            ErrorKind::Backend
        );
        assert_eq!(ApiError::Malformed("bad".into()).kind(), ErrorKind::Malformed);
    }

    #[test]
    fn test_user_message_prefers_backend_text() {
        let err = ApiError::Backend {
            status: 400,
            message: "HR Email is required.".into(),
        };
        assert_eq!(err.user_message(), "HR Email is required.");
        assert_eq!(err.to_string(), "API error 400: HR Email is required.");
    }
}

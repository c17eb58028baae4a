//! Error types for the Dhan REST integration.

use thiserror::Error;

/// Errors that can occur when talking to the Dhan API.
#[derive(Debug, Error)]
pub enum DhanError {
    /// Credentials were rejected (HTTP 401/403).
    #[error("authentication error: {0}")]
    Authentication(String),

    /// API request failed.
    #[error("API error: {status_code} - {message}")]
    Api {
        /// HTTP status code.
        status_code: u16,
        /// Error body returned by the API.
        message: String,
    },

    /// Rate limit exceeded.
    #[error("rate limit exceeded, retry after {retry_after_secs}s")]
    RateLimit {
        /// Seconds to wait before retry.
        retry_after_secs: u64,
    },

    /// Network error.
    #[error("network error: {0}")]
    Network(String),

    /// Request timeout.
    #[error("request timeout: {0}")]
    Timeout(String),

    /// Response body could not be decoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Response decoded but lacked a required field.
    #[error("response missing field: {0}")]
    MissingField(&'static str),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl DhanError {
    /// Creates an API error from status code and message.
    pub fn api(status_code: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status_code,
            message: message.into(),
        }
    }

    /// Creates a rate limit error.
    pub fn rate_limit(retry_after_secs: u64) -> Self {
        Self::RateLimit { retry_after_secs }
    }

    /// True for failures caused by the network or a busy server rather than
    /// by the request itself.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout(_) | Self::RateLimit { .. } => true,
            Self::Api { status_code, .. } => *status_code >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for DhanError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::Network(format!("connection failed: {err}"))
        } else if err.is_decode() {
            Self::Serialization(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for DhanError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type alias for Dhan operations.
pub type Result<T> = std::result::Result<T, DhanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_construction() {
        let err = DhanError::api(400, "DH-905: invalid security");
        assert!(matches!(err, DhanError::Api { status_code: 400, .. }));
        assert!(err.to_string().contains("400"));
        assert!(err.to_string().contains("DH-905"));
    }

    #[test]
    fn test_rate_limit_display() {
        let err = DhanError::rate_limit(3);
        assert!(err.to_string().contains("3s"));
        assert!(err.is_transient());
    }

    #[test]
    fn test_server_error_is_transient() {
        assert!(DhanError::api(503, "unavailable").is_transient());
        assert!(!DhanError::api(400, "bad request").is_transient());
    }

    #[test]
    fn test_auth_and_decode_errors_are_not_transient() {
        assert!(!DhanError::Authentication("expired token".to_string()).is_transient());
        assert!(!DhanError::MissingField("data.ltp").is_transient());
        assert!(DhanError::Timeout("elapsed".to_string()).is_transient());
    }

    #[test]
    fn test_missing_field_display() {
        let err = DhanError::MissingField("orderId");
        assert_eq!(err.to_string(), "response missing field: orderId");
    }
}

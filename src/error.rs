//! Error types for the Poloniex client library.

use serde::Deserialize;
use thiserror::Error;

/// The main error type for all Poloniex client operations.
#[derive(Error, Debug)]
pub enum PoloniexError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP request with middleware failed
    #[error("HTTP request failed: {0}")]
    HttpMiddleware(#[from] reqwest_middleware::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Poloniex API returned an error
    #[error("Poloniex API error: {0}")]
    Api(ApiError),

    /// Rate limit exceeded, either reported by Poloniex or by the local limiter
    #[error("Rate limit exceeded, retry after {retry_after_ms:?}ms")]
    RateLimitExceeded {
        /// Suggested wait time in milliseconds before retrying
        retry_after_ms: Option<u64>,
    },

    /// Authentication error
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Invalid response from the API
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Invalid client or rate limit configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Missing required credentials
    #[error("Missing credentials: API key and secret required for private endpoints")]
    MissingCredentials,
}

impl PoloniexError {
    /// Check if this error means the caller should slow down.
    pub fn is_rate_limit(&self) -> bool {
        match self {
            PoloniexError::RateLimitExceeded { .. } => true,
            PoloniexError::Api(api) => api.is_rate_limit(),
            _ => false,
        }
    }
}

/// Error body returned by Poloniex for non-2xx responses.
///
/// Poloniex encodes errors as `{"code": 21709, "message": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiError {
    /// Numeric Poloniex error code
    pub code: i64,
    /// Human-readable error message
    pub message: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl ApiError {
    /// Create a new API error from code and message.
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Check if this is a rate limit error.
    pub fn is_rate_limit(&self) -> bool {
        self.code == error_codes::RATE_LIMIT_EXCEEDED
            || self.message.to_ascii_lowercase().contains("rate limit")
    }

    /// Check if this is an authentication failure.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self.code,
            error_codes::INVALID_KEY | error_codes::INVALID_SIGNATURE | error_codes::EXPIRED_TIMESTAMP
        )
    }

    /// Check if this is an insufficient balance error.
    pub fn is_insufficient_balance(&self) -> bool {
        self.code == error_codes::INSUFFICIENT_BALANCE
    }

    /// Check if the referenced order does not exist.
    pub fn is_order_not_found(&self) -> bool {
        self.code == error_codes::ORDER_NOT_FOUND
    }
}

/// Known Poloniex error codes for pattern matching.
pub mod error_codes {
    /// Request frequency too high
    pub const RATE_LIMIT_EXCEEDED: i64 = 429;
    /// Internal server error
    pub const INTERNAL_ERROR: i64 = 500;
    /// Service unavailable
    pub const SERVICE_UNAVAILABLE: i64 = 503;
    /// API key does not exist or is disabled
    pub const INVALID_KEY: i64 = 401;
    /// Signature does not match
    pub const INVALID_SIGNATURE: i64 = 10004;
    /// Request timestamp outside the accepted window
    pub const EXPIRED_TIMESTAMP: i64 = 10005;
    /// Not enough funds to place the order
    pub const INSUFFICIENT_BALANCE: i64 = 21721;
    /// Order does not exist
    pub const ORDER_NOT_FOUND: i64 = 21709;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_from_body() {
        let body = r#"{"code": 21709, "message": "Order not found"}"#;
        let error: ApiError = serde_json::from_str(body).unwrap();
        assert_eq!(error.code, 21709);
        assert_eq!(error.message, "Order not found");
        assert!(error.is_order_not_found());
        assert!(!error.is_rate_limit());
    }

    #[test]
    fn test_api_error_display() {
        let error = ApiError::new(21721, "Insufficient balance");
        assert_eq!(error.to_string(), "21721: Insufficient balance");
        assert!(error.is_insufficient_balance());
    }

    #[test]
    fn test_rate_limit_detection() {
        assert!(ApiError::new(429, "Too many requests").is_rate_limit());
        assert!(ApiError::new(24106, "Rate limit exceeded").is_rate_limit());

        let err = PoloniexError::RateLimitExceeded {
            retry_after_ms: Some(200),
        };
        assert!(err.is_rate_limit());
        assert!(PoloniexError::Api(ApiError::new(429, "slow down")).is_rate_limit());
        assert!(!PoloniexError::MissingCredentials.is_rate_limit());
    }

    #[test]
    fn test_auth_failure_detection() {
        assert!(ApiError::new(10004, "Signature mismatch").is_auth_failure());
        assert!(!ApiError::new(21709, "Order not found").is_auth_failure());
    }
}

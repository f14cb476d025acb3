//! Provider error types and handling

use crate::config::ConfigError;
use crate::providers::fault::FaultKind;
use std::time::Duration;
use thiserror::Error;

/// Failure reported by a client handle for a single network call
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClientError {
    /// Rate limit exceeded (HTTP 429)
    #[error("Rate limit exceeded: {message}")]
    RateLimited { message: String },

    /// Provider-side failure (HTTP 5xx)
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// The request did not complete in time
    #[error("Request timed out")]
    Timeout,

    /// Connecting or transferring failed
    #[error("Connection failed: {0}")]
    Connection(String),

    /// The provider rejected the request (HTTP 400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The response body was not JSON
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// The response body was JSON but not a completion response
    #[error("Unexpected response shape: {0}")]
    UnexpectedShape(String),

    /// Authentication failed (HTTP 401/403)
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Unknown model or endpoint (HTTP 404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other non-success status
    #[error("Unexpected status {status}: {message}")]
    Status { status: u16, message: String },

    /// Client construction or other local failure
    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else if err.is_connect() || err.is_request() || err.is_body() {
            ClientError::Connection(err.to_string())
        } else {
            ClientError::Other(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

/// Errors surfaced to callers of a generator
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// Invalid configuration, missing credentials, or missing model name
    #[error(transparent)]
    Configuration(#[from] ConfigError),

    /// The model name maps to no known endpoint
    #[error("No {family} API defined for '{model}'")]
    UnsupportedEndpoint { family: String, model: String },

    /// A fault that is not retried
    #[error("{kind} fault from provider: {source}")]
    Provider {
        kind: FaultKind,
        #[source]
        source: ClientError,
    },

    /// A deployment retry bound was reached while faults stayed transient
    #[error("Giving up after {retries} retries ({waited:?} spent waiting): {source}")]
    RetriesExhausted {
        retries: u32,
        waited: Duration,
        #[source]
        source: ClientError,
    },

    /// `generate` was asked for zero outputs
    #[error("Generation count must be at least 1")]
    InvalidGenerationCount,
}

/// Result type for generator operations
pub type GeneratorResult<T> = Result<T, GeneratorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = GeneratorError::UnsupportedEndpoint {
            family: "OpenAI".to_string(),
            model: "gpt-99".to_string(),
        };
        assert_eq!(err.to_string(), "No OpenAI API defined for 'gpt-99'");

        let err = GeneratorError::Provider {
            kind: FaultKind::Unclassified,
            source: ClientError::Authentication("bad key".to_string()),
        };
        assert!(err.to_string().contains("Authentication failed: bad key"));
    }

    #[test]
    fn test_serde_error_is_decode() {
        let err = serde_json::from_str::<serde_json::Value>("{ nope").unwrap_err();
        assert!(matches!(ClientError::from(err), ClientError::Decode(_)));
    }
}

//! Error types for provider clients.

use sdmx_ingest::ExtractError;
use sdmx_model::ValidationError;
use sdmx_registry::Provider;
use thiserror::Error;

/// Errors raised by a [`Transport`](crate::Transport).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TransportError {
    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {message}")]
    Client { message: String },

    /// The request could not be sent or timed out.
    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },

    /// The server answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// The response body could not be read.
    #[error("failed to read response from {url}: {message}")]
    Body { url: String, message: String },
}

/// Errors raised by a [`SourceClient`](crate::SourceClient).
///
/// Nothing is recovered locally: every failure reaches the caller.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClientError {
    /// Identifier not present in the provider's catalog.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Revision-history key that cannot be a series identifier.
    #[error("invalid series key '{key}'")]
    InvalidSeriesKey { key: String },

    /// Response the parser could not interpret.
    #[error("malformed response: {0}")]
    Format(#[from] ExtractError),

    /// Network failure.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Operation the provider does not offer.
    #[error("{provider} does not support {operation}")]
    Unsupported {
        provider: Provider,
        operation: &'static str,
    },
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ClientError::Unsupported {
            provider: Provider::Oecd,
            operation: "revision history",
        };
        assert_eq!(err.to_string(), "OECD does not support revision history");

        let err = TransportError::Status {
            url: "https://example.org/x".to_string(),
            status: 404,
        };
        assert_eq!(err.to_string(), "https://example.org/x returned HTTP 404");
    }

    #[test]
    fn test_validation_error_is_transparent() {
        let err: ClientError = ValidationError {
            identifier: "NOPE".to_string(),
            available: vec!["EXR".to_string()],
        }
        .into();
        assert!(err.to_string().contains("NOPE"));
        assert!(matches!(err, ClientError::Validation(_)));
    }
}

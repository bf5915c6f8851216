//! Error types for the provider registry.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when resolving or loading provider configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RegistryError {
    /// Provider code not known to the registry.
    #[error("unknown provider '{0}'; expected one of: ECB, IMF, INSEE, OECD")]
    UnknownProvider(String),

    /// Configuration file could not be read.
    #[error("failed to read configuration {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration is not valid TOML or does not match the schema.
    #[error("invalid provider configuration: {message}")]
    ConfigParse { message: String },

    /// Endpoint template without the `{}` placeholder.
    #[error("endpoint template '{template}' for {field} has no '{{}}' placeholder")]
    MissingPlaceholder { field: &'static str, template: String },
}

impl From<toml::de::Error> for RegistryError {
    fn from(err: toml::de::Error) -> Self {
        Self::ConfigParse {
            message: err.to_string(),
        }
    }
}

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RegistryError::UnknownProvider("BIS".to_string());
        assert_eq!(
            err.to_string(),
            "unknown provider 'BIS'; expected one of: ECB, IMF, INSEE, OECD"
        );

        let err = RegistryError::MissingPlaceholder {
            field: "data",
            template: "https://example.org/data".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "endpoint template 'https://example.org/data' for data has no '{}' placeholder"
        );
    }
}

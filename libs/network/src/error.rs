//! Network Error Types
//!
//! Failures of mapping reads, response decoding and key derivation.

use dex_types::ValueError;
use thiserror::Error;

/// Result type alias for network operations
pub type Result<T> = std::result::Result<T, NetworkError>;

/// Main network error type
#[derive(Error, Debug)]
pub enum NetworkError {
    /// Mapping read failed at the transport or API level
    #[error("Mapping fetch failed for {program}/{mapping}/{key}: {message}")]
    MappingFetchFailed {
        program: String,
        mapping: String,
        key: String,
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Mapping value present but not in the expected shape
    #[error("Malformed {mapping} value for key {key}: {source}")]
    MalformedValue {
        mapping: String,
        key: String,
        source: ValueError,
    },

    /// Mapping key could not be derived
    #[error("Key derivation failed: {message}")]
    KeyDerivation { message: String },

    /// Invalid client configuration
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl NetworkError {
    /// Create a mapping fetch error
    pub fn mapping_fetch(
        program: impl Into<String>,
        mapping: impl Into<String>,
        key: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::MappingFetchFailed {
            program: program.into(),
            mapping: mapping.into(),
            key: key.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create a mapping fetch error with source
    pub fn mapping_fetch_with_source(
        program: impl Into<String>,
        mapping: impl Into<String>,
        key: impl Into<String>,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::MappingFetchFailed {
            program: program.into(),
            mapping: mapping.into(),
            key: key.into(),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a key derivation error
    pub fn key_derivation(message: impl Into<String>) -> Self {
        Self::KeyDerivation {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

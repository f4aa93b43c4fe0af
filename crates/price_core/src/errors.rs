//! Error types for the pricing core

use thiserror::Error;

/// Errors that can occur in the pricing core
#[derive(Error, Debug)]
pub enum PriceError {
    /// Artifact present but unusable (hash mismatch, wrong schema, bad values)
    #[error("Artifact integrity check failed: {0}")]
    ArtifactIntegrity(String),

    /// Invalid configuration values
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Invalid model parameters
    #[error("Invalid model parameters: {0}")]
    InvalidModel(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML configuration parse error
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// TOML configuration write error
    #[error("Config write error: {0}")]
    ConfigWrite(#[from] toml::ser::Error),
}

/// Result type for pricing core operations
pub type Result<T> = std::result::Result<T, PriceError>;

//! Error types for the Littera system.

use thiserror::Error;

/// Main error type for Littera operations.
///
/// Malformed event ordering never produces an error; only configuration
/// problems and I/O failures during finalization are fatal.
#[derive(Error, Debug)]
pub enum LitteraError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for Littera operations.
pub type Result<T> = std::result::Result<T, LitteraError>;

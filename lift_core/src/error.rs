//! Error types for the lift_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for lift_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A line-classification pattern failed to compile
    #[error("Pattern error: {0}")]
    Regex(#[from] regex::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Rejected catalog mutation (e.g. a name that normalizes to nothing)
    #[error("Catalog validation error: {0}")]
    CatalogValidation(String),

    /// Missing or unusable workout input
    #[error("Input error: {0}")]
    Input(String),
}

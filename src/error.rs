//! Error types for mlflow-glue.

use std::path::PathBuf;

use thiserror::Error;

/// Crate-level error type.
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or malformed configuration
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Experiment lookup, creation or activation failed
    #[error("Failed to ensure experiment {name}: {message}")]
    Experiment { name: String, message: String },

    /// Model reference could not be turned into a registry URI
    #[error("Invalid model reference: {0}")]
    InvalidModelReference(String),

    /// Registry resolution or artifact download error, surfaced as-is
    #[error(transparent)]
    Registry(#[from] crate::model::registry::RegistryError),

    /// No weight file in the downloaded artifacts
    #[error("No .onnx file found under {}", root.display())]
    WeightFileNotFound { root: PathBuf },

    /// Downloaded artifact tree could not be scanned
    #[error("Failed to scan artifact directory: {0}")]
    Scan(#[from] walkdir::Error),

    /// Inference runtime failed to construct the model
    #[error("Inference runtime error: {0}")]
    Runtime(#[from] crate::model::runtime::RuntimeError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for mlflow-glue operations.
pub type Result<T> = std::result::Result<T, Error>;

//! Model registry seam.
//!
//! The resolver only needs one thing from a registry: materialize every
//! artifact behind a `models:/` URI into a local directory.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

use crate::mlflow::RestError;
use crate::model::uri::ModelUri;

/// Errors from registry resolution and artifact download.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error(transparent)]
    Rest(#[from] RestError),

    #[error("No versions found for registered model '{name}'{}", stage_suffix(.stage))]
    NoVersions { name: String, stage: Option<String> },

    #[error("Unsupported artifact URI scheme '{scheme}' in {uri}")]
    UnsupportedScheme { scheme: String, uri: String },

    #[error("Invalid local file URI: {0}")]
    InvalidFileUri(String),

    #[error("Unsafe path in artifact listing: {0}")]
    UnsafePath(String),

    #[error("Artifact source does not exist: {}", .0.display())]
    MissingSource(PathBuf),

    #[error("IO error while downloading artifacts: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to walk artifact source: {0}")]
    Walk(#[from] walkdir::Error),
}

fn stage_suffix(stage: &Option<String>) -> String {
    stage
        .as_ref()
        .map(|s| format!(" in stage '{}'", s))
        .unwrap_or_default()
}

/// A store of versioned, named model artifacts.
#[async_trait]
pub trait ModelRegistry: Send + Sync {
    /// Download all artifacts for `uri` below `destination`.
    ///
    /// Returns the local directory (or file) that now holds the artifacts.
    /// The layout below it is up to the registry.
    async fn download_artifacts(
        &self,
        uri: &ModelUri,
        destination: &Path,
    ) -> Result<PathBuf, RegistryError>;
}

//! Registered model resolution.

use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};

use crate::defaults;
use crate::error::Result;
use crate::model::discovery::select_weight_file;
use crate::model::registry::ModelRegistry;
use crate::model::runtime::{InferenceRuntime, Task};
use crate::model::staging::StagingDir;
use crate::model::uri::ModelUri;

/// Settings for [`ModelResolver`].
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Directory under which per-call staging directories are created
    pub staging_root: PathBuf,
    /// Task mode every model is built for
    pub task: Task,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            staging_root: defaults::staging_root(),
            task: Task::Detect,
        }
    }
}

/// An inference object together with the artifacts it was loaded from.
///
/// The staging directory lives as long as this value and is removed when it is
/// dropped. Call [`LoadedModel::persist`] to keep it.
#[derive(Debug)]
pub struct LoadedModel<M> {
    model: M,
    uri: ModelUri,
    weights_path: PathBuf,
    staging: StagingDir,
}

impl<M> LoadedModel<M> {
    pub fn uri(&self) -> &ModelUri {
        &self.uri
    }

    /// Path of the weight file the model was built from.
    pub fn weights_path(&self) -> &Path {
        &self.weights_path
    }

    pub fn staging_dir(&self) -> &Path {
        self.staging.path()
    }

    /// Take the model and keep the staging directory on disk.
    ///
    /// The caller becomes responsible for deleting the returned directory.
    pub fn persist(self) -> (M, PathBuf) {
        (self.model, self.staging.persist())
    }

    /// Take the model and delete the staging directory.
    pub fn into_model(self) -> M {
        self.model
    }
}

impl<M> Deref for LoadedModel<M> {
    type Target = M;

    fn deref(&self) -> &M {
        &self.model
    }
}

impl<M> DerefMut for LoadedModel<M> {
    fn deref_mut(&mut self) -> &mut M {
        &mut self.model
    }
}

/// Resolves registered models to inference objects.
pub struct ModelResolver<R, E> {
    registry: R,
    runtime: E,
    config: ResolverConfig,
}

impl<R, E> ModelResolver<R, E>
where
    R: ModelRegistry,
    E: InferenceRuntime,
{
    pub fn new(registry: R, runtime: E) -> Self {
        Self::with_config(registry, runtime, ResolverConfig::default())
    }

    pub fn with_config(registry: R, runtime: E, config: ResolverConfig) -> Self {
        Self {
            registry,
            runtime,
            config,
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Download a registered model and build an inference object from its
    /// `.onnx` weight file.
    ///
    /// `version` is `latest` when `None`, otherwise used verbatim in the
    /// `models:/<name>/<version>` URI. Registry errors are returned unchanged
    /// as [`Error::Registry`](crate::Error::Registry); a download without any
    /// weight file yields
    /// [`Error::WeightFileNotFound`](crate::Error::WeightFileNotFound).
    /// The staging directory is removed on every failure.
    pub async fn load_model(
        &self,
        model_name: &str,
        version: Option<&str>,
    ) -> Result<LoadedModel<E::Model>> {
        let version = version.unwrap_or(defaults::LATEST_VERSION);
        let uri = ModelUri::new(model_name, version)?;

        let staging = StagingDir::create(&self.config.staging_root, model_name)?;
        log::debug!("Downloading {} into {}", uri, staging.path().display());

        let local_dir = self.registry.download_artifacts(&uri, staging.path()).await?;
        let weights_path = select_weight_file(&local_dir)?;
        let model = self.runtime.construct(&weights_path, self.config.task)?;

        log::info!("[Loaded] {}:{} from {}", model_name, version, weights_path.display());

        Ok(LoadedModel {
            model,
            uri,
            weights_path,
            staging,
        })
    }

    /// [`load_model`](Self::load_model) for the latest version.
    pub async fn load_latest(&self, model_name: &str) -> Result<LoadedModel<E::Model>> {
        self.load_model(model_name, None).await
    }
}

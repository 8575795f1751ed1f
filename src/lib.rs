//! mlflow-glue - experiment and registered-model helpers for MLflow based CV workflows.
//!
//! Two independent operations:
//! - [`ensure_experiment`]: look up or create an experiment and make it active
//!   in a caller-owned [`TrackingContext`].
//! - [`ModelResolver::load_model`]: download a registered model, find its
//!   `.onnx` weights and build an inference object from them.

pub mod defaults;
pub mod error;

pub mod config;
pub mod mlflow;
pub mod model;
pub mod tracking;

pub use error::{Error, Result};

pub use config::{ConfigError, Credentials, ExperimentNames, TrackingConfig};
pub use mlflow::{MlflowClient, RestError};
pub use model::{
    DetectionModel, InferenceRuntime, LoadedModel, ModelRegistry, ModelResolver, ModelUri,
    OrtRuntime, RegistryError, ResolverConfig, RuntimeError, StagingDir, Task, VersionSelector,
};
pub use tracking::{
    ensure_experiment, Experiment, LifecycleStage, TrackingContext, TrackingError,
    TrackingService,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Experiment tracking.
//!
//! [`TrackingService`] is the seam to the tracking server; [`ensure_experiment`]
//! is the lookup-or-create-then-activate operation built on top of it.

pub mod experiment;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::mlflow::RestError;

pub use experiment::{ensure_experiment, TrackingContext};

/// Lifecycle stage reported by the tracking server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleStage {
    #[default]
    Active,
    Deleted,
}

/// An experiment known to the tracking server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experiment {
    pub experiment_id: String,
    pub name: String,
    #[serde(default)]
    pub lifecycle_stage: LifecycleStage,
    #[serde(default)]
    pub artifact_location: Option<String>,
}

impl Experiment {
    /// A freshly created, active experiment.
    pub fn new(experiment_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            experiment_id: experiment_id.into(),
            name: name.into(),
            lifecycle_stage: LifecycleStage::Active,
            artifact_location: None,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.lifecycle_stage == LifecycleStage::Deleted
    }
}

/// Errors raised while looking up, creating or activating an experiment.
#[derive(Error, Debug)]
pub enum TrackingError {
    #[error("experiment name must not be empty")]
    EmptyName,

    #[error("Cannot set a deleted experiment '{0}' as the active experiment")]
    DeletedExperiment(String),

    #[error("{0}")]
    Rest(#[from] RestError),

    #[error("{0}")]
    Service(String),
}

/// Operations consumed from the tracking server.
#[async_trait]
pub trait TrackingService: Send + Sync {
    /// Find an experiment by exact name. `Ok(None)` when it does not exist.
    async fn get_experiment_by_name(&self, name: &str) -> Result<Option<Experiment>, TrackingError>;

    /// Create an experiment and return the identifier the server assigned.
    async fn create_experiment(&self, name: &str) -> Result<String, TrackingError>;
}

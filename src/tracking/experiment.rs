//! Ensure-and-activate for experiments.

use crate::error::{Error, Result};
use crate::tracking::{Experiment, TrackingError, TrackingService};

/// Holds the experiment that subsequent logging calls attach to.
///
/// Owned by the caller and passed explicitly, so two contexts never share an
/// active experiment.
#[derive(Debug, Clone, Default)]
pub struct TrackingContext {
    active: Option<Experiment>,
}

impl TrackingContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently active experiment, if any.
    pub fn active_experiment(&self) -> Option<&Experiment> {
        self.active.as_ref()
    }

    pub fn active_experiment_id(&self) -> Option<&str> {
        self.active.as_ref().map(|e| e.experiment_id.as_str())
    }

    /// Make `experiment` the active experiment.
    ///
    /// Deleted experiments are refused and leave the context untouched.
    pub fn activate(&mut self, experiment: Experiment) -> std::result::Result<(), TrackingError> {
        if experiment.is_deleted() {
            return Err(TrackingError::DeletedExperiment(experiment.name));
        }
        log::info!(
            "Active experiment set to '{}' (id {})",
            experiment.name,
            experiment.experiment_id
        );
        self.active = Some(experiment);
        Ok(())
    }

    /// Forget the active experiment.
    pub fn clear(&mut self) {
        self.active = None;
    }
}

/// Ensure an experiment named `name` exists and make it active in `context`.
///
/// Looks the experiment up by exact name and creates it when missing. Either
/// way the experiment becomes the active one and its identifier is returned.
/// Every failure is reported as [`Error::Experiment`] carrying the name and the
/// underlying message; on failure `context` keeps its previous value.
pub async fn ensure_experiment<S>(
    service: &S,
    context: &mut TrackingContext,
    name: &str,
) -> Result<String>
where
    S: TrackingService + ?Sized,
{
    lookup_or_create(service, context, name)
        .await
        .map_err(|e| Error::Experiment {
            name: name.to_string(),
            message: e.to_string(),
        })
}

async fn lookup_or_create<S>(
    service: &S,
    context: &mut TrackingContext,
    name: &str,
) -> std::result::Result<String, TrackingError>
where
    S: TrackingService + ?Sized,
{
    if name.trim().is_empty() {
        return Err(TrackingError::EmptyName);
    }

    let experiment = match service.get_experiment_by_name(name).await? {
        Some(existing) => {
            log::debug!("Found experiment '{}' (id {})", name, existing.experiment_id);
            existing
        }
        None => {
            let experiment_id = service.create_experiment(name).await?;
            log::debug!("Created experiment '{}' (id {})", name, experiment_id);
            Experiment::new(experiment_id, name)
        }
    };

    let experiment_id = experiment.experiment_id.clone();
    context.activate(experiment)?;
    Ok(experiment_id)
}

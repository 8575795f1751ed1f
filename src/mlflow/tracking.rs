//! [`TrackingService`] over the MLflow REST API.

use async_trait::async_trait;

use crate::mlflow::protocol::{
    CreateExperimentRequest, CreateExperimentResponse, GetExperimentResponse,
};
use crate::mlflow::{MlflowClient, CREATE_EXPERIMENT, GET_EXPERIMENT_BY_NAME};
use crate::tracking::{Experiment, TrackingError, TrackingService};

#[async_trait]
impl TrackingService for MlflowClient {
    async fn get_experiment_by_name(
        &self,
        name: &str,
    ) -> Result<Option<Experiment>, TrackingError> {
        let query = [("experiment_name", name)];
        match self
            .get_json::<GetExperimentResponse>(GET_EXPERIMENT_BY_NAME, &query)
            .await
        {
            Ok(response) => Ok(Some(response.experiment.into())),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn create_experiment(&self, name: &str) -> Result<String, TrackingError> {
        let response: CreateExperimentResponse = self
            .post_json(CREATE_EXPERIMENT, &CreateExperimentRequest { name })
            .await?;
        Ok(response.experiment_id)
    }
}

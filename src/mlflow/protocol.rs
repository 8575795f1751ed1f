//! Request and response bodies of the MLflow REST API.

use serde::{Deserialize, Serialize};

use crate::tracking::{Experiment, LifecycleStage};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    pub error_code: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetExperimentResponse {
    pub experiment: ExperimentInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExperimentInfo {
    pub experiment_id: String,
    pub name: String,
    #[serde(default)]
    pub artifact_location: Option<String>,
    #[serde(default)]
    pub lifecycle_stage: Option<String>,
}

impl From<ExperimentInfo> for Experiment {
    fn from(info: ExperimentInfo) -> Self {
        let lifecycle_stage = match info.lifecycle_stage.as_deref() {
            Some(stage) if stage.eq_ignore_ascii_case("deleted") => LifecycleStage::Deleted,
            _ => LifecycleStage::Active,
        };
        Self {
            experiment_id: info.experiment_id,
            name: info.name,
            lifecycle_stage,
            artifact_location: info.artifact_location,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateExperimentRequest<'a> {
    pub name: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateExperimentResponse {
    pub experiment_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GetLatestVersionsRequest<'a> {
    pub name: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub stages: Vec<&'a str>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GetLatestVersionsResponse {
    #[serde(default)]
    pub model_versions: Vec<ModelVersionInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelVersionInfo {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub current_stage: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetDownloadUriResponse {
    pub artifact_uri: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListArtifactsResponse {
    #[serde(default)]
    pub files: Vec<FileInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FileInfo {
    pub path: String,
    #[serde(default)]
    pub is_dir: bool,
}

//! [`ModelRegistry`] over the MLflow REST API.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::mlflow::artifacts;
use crate::mlflow::protocol::{
    GetDownloadUriResponse, GetLatestVersionsRequest, GetLatestVersionsResponse, ModelVersionInfo,
};
use crate::mlflow::{MlflowClient, GET_DOWNLOAD_URI, GET_LATEST_VERSIONS};
use crate::model::registry::{ModelRegistry, RegistryError};
use crate::model::uri::{ModelUri, VersionSelector};

impl MlflowClient {
    /// Turn the version selector of `uri` into a concrete version number.
    pub async fn resolve_version(&self, uri: &ModelUri) -> Result<String, RegistryError> {
        match uri.selector() {
            VersionSelector::Version(version) => Ok(version.clone()),
            VersionSelector::Latest => self.latest_version(uri.name(), None).await,
            VersionSelector::Stage(stage) => self.latest_version(uri.name(), Some(stage)).await,
        }
    }

    /// Artifact URI of one registered model version.
    pub async fn download_uri(&self, name: &str, version: &str) -> Result<String, RegistryError> {
        let response: GetDownloadUriResponse = self
            .get_json(GET_DOWNLOAD_URI, &[("name", name), ("version", version)])
            .await?;
        Ok(response.artifact_uri)
    }

    async fn latest_version(
        &self,
        name: &str,
        stage: Option<&str>,
    ) -> Result<String, RegistryError> {
        let request = GetLatestVersionsRequest {
            name,
            stages: stage.into_iter().collect(),
        };
        let response: GetLatestVersionsResponse =
            self.post_json(GET_LATEST_VERSIONS, &request).await?;

        highest_version(&response.model_versions).ok_or_else(|| RegistryError::NoVersions {
            name: name.to_string(),
            stage: stage.map(String::from),
        })
    }
}

/// Highest numeric version in `versions`.
///
/// The server returns the latest version per stage, so "latest overall" is the
/// maximum across them.
fn highest_version(versions: &[ModelVersionInfo]) -> Option<String> {
    versions
        .iter()
        .filter_map(|v| v.version.parse::<u64>().ok().map(|n| (n, &v.version)))
        .max_by_key(|(n, _)| *n)
        .map(|(_, version)| version.clone())
}

#[async_trait]
impl ModelRegistry for MlflowClient {
    async fn download_artifacts(
        &self,
        uri: &ModelUri,
        destination: &Path,
    ) -> Result<PathBuf, RegistryError> {
        let version = self.resolve_version(uri).await?;
        let artifact_uri = self.download_uri(uri.name(), &version).await?;
        log::debug!("Resolved {} to version {} at {}", uri, version, artifact_uri);

        artifacts::download_tree(self, &artifact_uri, destination).await
    }
}

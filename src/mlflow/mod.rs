//! MLflow tracking server REST client.
//!
//! A single [`MlflowClient`] implements both
//! [`TrackingService`](crate::tracking::TrackingService) and
//! [`ModelRegistry`](crate::model::registry::ModelRegistry).

pub mod artifacts;
pub mod protocol;
mod registry;
mod tracking;

use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::config::{ConfigError, Credentials, TrackingConfig};
use protocol::ApiErrorBody;

pub(crate) const GET_EXPERIMENT_BY_NAME: &str = "api/2.0/mlflow/experiments/get-by-name";
pub(crate) const CREATE_EXPERIMENT: &str = "api/2.0/mlflow/experiments/create";
pub(crate) const GET_LATEST_VERSIONS: &str = "api/2.0/mlflow/registered-models/get-latest-versions";
pub(crate) const GET_DOWNLOAD_URI: &str = "api/2.0/mlflow/model-versions/get-download-uri";
pub(crate) const ARTIFACTS: &str = "api/2.0/mlflow-artifacts/artifacts";

const RESOURCE_DOES_NOT_EXIST: &str = "RESOURCE_DOES_NOT_EXIST";

/// Errors returned by the REST layer.
#[derive(Error, Debug)]
pub enum RestError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("MLflow API returned {status} ({error_code}): {message}")]
    Api {
        status: u16,
        error_code: String,
        message: String,
    },

    #[error("Invalid endpoint URL: {0}")]
    Url(String),
}

impl RestError {
    /// Whether the server reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Api {
                status, error_code, ..
            } => *status == 404 || error_code == RESOURCE_DOES_NOT_EXIST,
            _ => false,
        }
    }
}

/// HTTP client for one MLflow tracking server.
#[derive(Debug, Clone)]
pub struct MlflowClient {
    http: Client,
    base: Url,
    credentials: Credentials,
}

impl MlflowClient {
    /// Create a client from an explicit config.
    pub fn new(config: &TrackingConfig) -> Result<Self, ConfigError> {
        let base = Url::parse(&config.tracking_uri)
            .ok()
            .filter(|url| matches!(url.scheme(), "http" | "https"))
            .ok_or_else(|| ConfigError::InvalidTrackingUri(config.tracking_uri.clone()))?;

        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Ok(Self {
            http,
            base,
            credentials: config.credentials.clone(),
        })
    }

    /// Create a client from the `MLFLOW_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::new(&TrackingConfig::from_env()?)
    }

    /// Base URL of the tracking server.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Build the URL of an API route, keeping any path prefix of the base URL.
    fn endpoint(&self, route: &str) -> Result<Url, RestError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| RestError::Url(self.base.to_string()))?
            .pop_if_empty()
            .extend(route.split('/').filter(|s| !s.is_empty()));
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Credentials::None => request,
            Credentials::Bearer(token) => request.bearer_auth(token),
            Credentials::Basic { username, password } => {
                request.basic_auth(username, password.as_deref())
            }
        }
    }

    pub(crate) async fn get_json<T>(
        &self,
        route: &str,
        query: &[(&str, &str)],
    ) -> Result<T, RestError>
    where
        T: DeserializeOwned,
    {
        let url = self.endpoint(route)?;
        let response = self.authorize(self.http.get(url).query(query)).send().await?;
        Self::decode(response).await
    }

    pub(crate) async fn post_json<B, T>(&self, route: &str, body: &B) -> Result<T, RestError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(route)?;
        let response = self.authorize(self.http.post(url).json(body)).send().await?;
        Self::decode(response).await
    }

    /// GET `route` followed by the `/`-separated `path`, returning the
    /// successful response with its body unread.
    pub(crate) async fn get_raw(&self, route: &str, path: &str) -> Result<Response, RestError> {
        let mut url = self.endpoint(route)?;
        url.path_segments_mut()
            .map_err(|_| RestError::Url(self.base.to_string()))?
            .extend(path.split('/').filter(|s| !s.is_empty()));

        let response = self.authorize(self.http.get(url)).send().await?;
        Self::check(response).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, RestError> {
        let response = Self::check(response).await?;
        Ok(response.json::<T>().await?)
    }

    async fn check(response: Response) -> Result<Response, RestError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let parsed = serde_json::from_str::<ApiErrorBody>(&body).unwrap_or_default();
        Err(RestError::Api {
            status: status.as_u16(),
            error_code: parsed.error_code.unwrap_or_else(|| "UNKNOWN".to_string()),
            message: parsed.message.unwrap_or(body),
        })
    }
}

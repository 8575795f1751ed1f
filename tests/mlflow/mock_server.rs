use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use mlflow_glue::{MlflowClient, TrackingConfig};

pub(crate) struct MockExperiment {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) deleted: bool,
}

pub(crate) struct MockVersion {
    pub(crate) name: String,
    pub(crate) version: String,
    pub(crate) stage: String,
    pub(crate) artifact_uri: String,
}

#[derive(Default)]
pub(crate) struct MockState {
    pub(crate) experiments: Vec<MockExperiment>,
    pub(crate) versions: Vec<MockVersion>,
    /// Artifact files keyed by their path below the proxy root
    pub(crate) artifacts: BTreeMap<String, Vec<u8>>,
    pub(crate) fail_create: bool,
    pub(crate) requests: Vec<String>,
    pub(crate) authorization: Option<String>,
}

type Shared = Arc<Mutex<MockState>>;

pub(crate) struct MockServer {
    pub(crate) url: String,
    state: Shared,
}

impl MockServer {
    pub(crate) async fn start(state: MockState) -> Self {
        let state = Arc::new(Mutex::new(state));
        let app = Router::new()
            .route("/api/2.0/mlflow/experiments/get-by-name", get(get_experiment))
            .route("/api/2.0/mlflow/experiments/create", post(create_experiment))
            .route(
                "/api/2.0/mlflow/registered-models/get-latest-versions",
                post(latest_versions),
            )
            .route("/api/2.0/mlflow/model-versions/get-download-uri", get(download_uri))
            .route("/api/2.0/mlflow-artifacts/artifacts", get(list_artifacts))
            .route("/api/2.0/mlflow-artifacts/artifacts/*path", get(download_artifact))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock server");
        let addr = listener.local_addr().expect("Mock server has no address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Mock server failed");
        });

        Self {
            url: format!("http://{}", addr),
            state,
        }
    }

    pub(crate) fn client(&self) -> MlflowClient {
        MlflowClient::new(&TrackingConfig::new(&self.url)).expect("Invalid mock server URL")
    }

    pub(crate) fn requests(&self) -> Vec<String> {
        self.state.lock().unwrap().requests.clone()
    }

    pub(crate) fn count(&self, prefix: &str) -> usize {
        self.requests().iter().filter(|r| r.starts_with(prefix)).count()
    }

    pub(crate) fn authorization(&self) -> Option<String> {
        self.state.lock().unwrap().authorization.clone()
    }

    pub(crate) fn experiment_count(&self) -> usize {
        self.state.lock().unwrap().experiments.len()
    }
}

fn api_error(status: StatusCode, code: &str, message: String) -> Response {
    (status, Json(json!({ "error_code": code, "message": message }))).into_response()
}

async fn get_experiment(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let mut state = state.lock().unwrap();
    let name = query.get("experiment_name").cloned().unwrap_or_default();
    state.requests.push(format!("get-by-name {}", name));
    state.authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    match state.experiments.iter().find(|e| e.name == name) {
        Some(e) => Json(json!({
            "experiment": {
                "experiment_id": e.id,
                "name": e.name,
                "artifact_location": format!("mlflow-artifacts:/{}", e.id),
                "lifecycle_stage": if e.deleted { "deleted" } else { "active" },
            }
        }))
        .into_response(),
        None => api_error(
            StatusCode::NOT_FOUND,
            "RESOURCE_DOES_NOT_EXIST",
            format!("Could not find experiment with name '{}'", name),
        ),
    }
}

async fn create_experiment(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut state = state.lock().unwrap();
    let name = body["name"].as_str().unwrap_or_default().to_string();
    state.requests.push(format!("create {}", name));

    if state.fail_create {
        return api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "database is locked".to_string(),
        );
    }
    if state.experiments.iter().any(|e| e.name == name) {
        return api_error(
            StatusCode::BAD_REQUEST,
            "RESOURCE_ALREADY_EXISTS",
            format!("Experiment '{}' already exists.", name),
        );
    }

    let id = (state.experiments.len() + 1).to_string();
    state.experiments.push(MockExperiment {
        id: id.clone(),
        name,
        deleted: false,
    });
    Json(json!({ "experiment_id": id })).into_response()
}

async fn latest_versions(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut state = state.lock().unwrap();
    let name = body["name"].as_str().unwrap_or_default().to_string();
    let stages: Vec<String> = body["stages"]
        .as_array()
        .map(|a| a.iter().filter_map(|s| s.as_str().map(String::from)).collect())
        .unwrap_or_default();
    state.requests.push(format!("latest-versions {} {:?}", name, stages));

    if !state.versions.iter().any(|v| v.name == name) {
        return api_error(
            StatusCode::NOT_FOUND,
            "RESOURCE_DOES_NOT_EXIST",
            format!("Registered Model with name={} not found", name),
        );
    }

    let versions: Vec<Value> = state
        .versions
        .iter()
        .filter(|v| v.name == name)
        .filter(|v| stages.is_empty() || stages.iter().any(|s| s.eq_ignore_ascii_case(&v.stage)))
        .map(|v| {
            json!({
                "name": v.name,
                "version": v.version,
                "current_stage": v.stage,
                "source": v.artifact_uri,
            })
        })
        .collect();
    Json(json!({ "model_versions": versions })).into_response()
}

async fn download_uri(
    State(state): State<Shared>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let mut state = state.lock().unwrap();
    let name = query.get("name").cloned().unwrap_or_default();
    let version = query.get("version").cloned().unwrap_or_default();
    state.requests.push(format!("get-download-uri {} {}", name, version));

    match state
        .versions
        .iter()
        .find(|v| v.name == name && v.version == version)
    {
        Some(v) => Json(json!({ "artifact_uri": v.artifact_uri })).into_response(),
        None => api_error(
            StatusCode::NOT_FOUND,
            "RESOURCE_DOES_NOT_EXIST",
            format!("Model Version (name={}, version={}) not found", name, version),
        ),
    }
}

async fn list_artifacts(
    State(state): State<Shared>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let mut state = state.lock().unwrap();
    let path = query.get("path").cloned().unwrap_or_default();
    state.requests.push(format!("list {}", path));

    let prefix = if path.is_empty() {
        String::new()
    } else {
        format!("{}/", path.trim_end_matches('/'))
    };

    let mut children = BTreeSet::new();
    for key in state.artifacts.keys() {
        if let Some(rest) = key.strip_prefix(&prefix) {
            match rest.split_once('/') {
                Some((dir, _)) => children.insert((dir.to_string(), true)),
                None => children.insert((rest.to_string(), false)),
            };
        }
    }

    let files: Vec<Value> = children
        .into_iter()
        .map(|(name, is_dir)| json!({ "path": name, "is_dir": is_dir }))
        .collect();
    Json(json!({ "files": files })).into_response()
}

async fn download_artifact(State(state): State<Shared>, Path(path): Path<String>) -> Response {
    let mut state = state.lock().unwrap();
    state.requests.push(format!("download {}", path));

    match state.artifacts.get(&path) {
        Some(content) => content.clone().into_response(),
        None => api_error(
            StatusCode::NOT_FOUND,
            "RESOURCE_DOES_NOT_EXIST",
            format!("File {} not found", path),
        ),
    }
}

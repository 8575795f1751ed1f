//! Default values and well-known names.

use std::path::PathBuf;
use std::time::Duration;

pub const USER_NAME_ENV: &str = "DOMINO_USER_NAME";
pub const TRACKING_URI_ENV: &str = "MLFLOW_TRACKING_URI";
pub const TRACKING_TOKEN_ENV: &str = "MLFLOW_TRACKING_TOKEN";
pub const TRACKING_USERNAME_ENV: &str = "MLFLOW_TRACKING_USERNAME";
pub const TRACKING_PASSWORD_ENV: &str = "MLFLOW_TRACKING_PASSWORD";
pub const REQUEST_TIMEOUT_ENV: &str = "MLFLOW_HTTP_REQUEST_TIMEOUT";

pub const MODEL_REGISTRATION_PREFIX: &str = "model_registration";
pub const CV_COMPARISON_PREFIX: &str = "cv-comparison";

pub const LATEST_VERSION: &str = "latest";
pub const WEIGHT_FILE_EXTENSION: &str = ".onnx";

pub const REQUEST_TIMEOUT_SECS: u64 = 120;
pub const ONNX_INTRA_THREADS: usize = 1;

pub fn request_timeout() -> Duration { Duration::from_secs(REQUEST_TIMEOUT_SECS) }
pub fn staging_root() -> PathBuf { std::env::temp_dir() }

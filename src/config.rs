//! Configuration read from the process environment.
//!
//! Nothing here is cached in globals: callers build an [`ExperimentNames`] or a
//! [`TrackingConfig`] once and pass it to the operations that need it.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::defaults;

/// Configuration errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    MissingEnv(&'static str),

    #[error("environment variable {name} has invalid value {value:?}")]
    InvalidEnv { name: &'static str, value: String },

    #[error("invalid tracking URI {0:?}: only http and https servers are supported")]
    InvalidTrackingUri(String),
}

/// The two per-user experiment names used by the CV workflows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperimentNames {
    /// Experiment receiving model registration runs
    pub model_registration: String,
    /// Experiment receiving model comparison runs
    pub cv_comparison: String,
}

impl ExperimentNames {
    /// Build the names for an explicit user identifier.
    pub fn for_user(user: &str) -> Self {
        Self {
            model_registration: format!("{}-{}", defaults::MODEL_REGISTRATION_PREFIX, user),
            cv_comparison: format!("{}-{}", defaults::CV_COMPARISON_PREFIX, user),
        }
    }

    /// Build the names from `DOMINO_USER_NAME`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the names using `lookup` in place of the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let user = lookup(defaults::USER_NAME_ENV)
            .ok_or(ConfigError::MissingEnv(defaults::USER_NAME_ENV))?;
        Ok(Self::for_user(&user))
    }
}

/// Credentials attached to every tracking server request.
#[derive(Clone, Default, PartialEq, Eq)]
pub enum Credentials {
    #[default]
    None,
    Bearer(String),
    Basic {
        username: String,
        password: Option<String>,
    },
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Bearer(_) => write!(f, "Bearer(<redacted>)"),
            Self::Basic { username, .. } => write!(f, "Basic({}, <redacted>)", username),
        }
    }
}

/// Connection settings for the MLflow tracking server.
#[derive(Debug, Clone)]
pub struct TrackingConfig {
    /// Base URL of the tracking server
    pub tracking_uri: String,
    /// Request credentials
    pub credentials: Credentials,
    /// Per-request timeout
    pub request_timeout: Duration,
}

impl TrackingConfig {
    /// Create a config for `tracking_uri` with no credentials.
    pub fn new(tracking_uri: impl Into<String>) -> Self {
        Self {
            tracking_uri: tracking_uri.into(),
            credentials: Credentials::None,
            request_timeout: defaults::request_timeout(),
        }
    }

    /// Use a bearer token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.credentials = Credentials::Bearer(token.into());
        self
    }

    /// Override the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Read the config from the standard `MLFLOW_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the config using `lookup` in place of the process environment.
    ///
    /// A token takes precedence over username/password. Empty values count as
    /// unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let tracking_uri = get(defaults::TRACKING_URI_ENV)
            .ok_or(ConfigError::MissingEnv(defaults::TRACKING_URI_ENV))?;
        if !(tracking_uri.starts_with("http://") || tracking_uri.starts_with("https://")) {
            return Err(ConfigError::InvalidTrackingUri(tracking_uri));
        }

        let credentials = match (
            get(defaults::TRACKING_TOKEN_ENV),
            get(defaults::TRACKING_USERNAME_ENV),
        ) {
            (Some(token), _) => Credentials::Bearer(token),
            (None, Some(username)) => Credentials::Basic {
                username,
                password: get(defaults::TRACKING_PASSWORD_ENV),
            },
            (None, None) => Credentials::None,
        };

        let request_timeout = match get(defaults::REQUEST_TIMEOUT_ENV) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::InvalidEnv {
                    name: defaults::REQUEST_TIMEOUT_ENV,
                    value: raw,
                })?,
            None => defaults::request_timeout(),
        };

        Ok(Self {
            tracking_uri,
            credentials,
            request_timeout,
        })
    }
}

//! `models:/<name>/<version>` registry URIs.

use std::fmt;

use crate::defaults::LATEST_VERSION;
use crate::error::{Error, Result};

const MODELS_SCHEME: &str = "models:/";

/// How a registered model version is selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSelector {
    /// Highest registered version
    Latest,
    /// An explicit numeric version
    Version(String),
    /// Highest version currently in a registry stage such as `Production`
    Stage(String),
}

impl VersionSelector {
    /// Classify a version token. `latest` is matched case-insensitively.
    pub fn parse(token: &str) -> Result<Self> {
        let token = token.trim();
        if token.is_empty() {
            return Err(Error::InvalidModelReference("version must not be empty".into()));
        }
        if token.eq_ignore_ascii_case(LATEST_VERSION) {
            Ok(Self::Latest)
        } else if token.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self::Version(token.to_string()))
        } else {
            Ok(Self::Stage(token.to_string()))
        }
    }
}

/// A registry reference `(name, version)` rendered as `models:/<name>/<version>`.
///
/// The version token is kept verbatim, so `latest` stays `latest` in the URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelUri {
    name: String,
    version: String,
    selector: VersionSelector,
}

impl ModelUri {
    pub fn new(name: &str, version: &str) -> Result<Self> {
        if name.trim().is_empty() {
            return Err(Error::InvalidModelReference("model name must not be empty".into()));
        }
        let selector = VersionSelector::parse(version)?;
        Ok(Self {
            name: name.to_string(),
            version: version.to_string(),
            selector,
        })
    }

    /// Parse a full `models:/<name>/<version>` string.
    pub fn parse(uri: &str) -> Result<Self> {
        let rest = uri
            .strip_prefix(MODELS_SCHEME)
            .ok_or_else(|| Error::InvalidModelReference(format!("not a models:/ URI: {}", uri)))?;
        let (name, version) = rest
            .trim_start_matches('/')
            .rsplit_once('/')
            .ok_or_else(|| Error::InvalidModelReference(format!("missing version in {}", uri)))?;
        Self::new(name, version)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The version token exactly as requested.
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn selector(&self) -> &VersionSelector {
        &self.selector
    }
}

impl fmt::Display for ModelUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}/{}", MODELS_SCHEME, self.name, self.version)
    }
}

//! Artifact tree download.
//!
//! Model version artifacts are either served by the tracking server's artifact
//! proxy (`mlflow-artifacts:` URIs) or sit on a filesystem the process can read
//! (`file:` URIs and bare absolute paths).

use std::path::{Component, Path, PathBuf};

use reqwest::Url;
use walkdir::WalkDir;

use crate::mlflow::protocol::ListArtifactsResponse;
use crate::mlflow::{MlflowClient, RestError, ARTIFACTS};
use crate::model::registry::RegistryError;

const PROXY_SCHEME: &str = "mlflow-artifacts:";
const FILE_SCHEME: &str = "file:";

/// Where an artifact URI points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactLocation {
    /// Path relative to the artifact proxy root
    Proxied(String),
    /// Path on the local filesystem
    Local(PathBuf),
}

impl ArtifactLocation {
    pub fn parse(uri: &str) -> Result<Self, RegistryError> {
        if let Some(rest) = uri.strip_prefix(PROXY_SCHEME) {
            // `mlflow-artifacts://host:port/path` carries an authority we ignore;
            // requests always go to the configured tracking server.
            let path = match rest.strip_prefix("//") {
                Some(with_authority) => {
                    with_authority.split_once('/').map(|(_, p)| p).unwrap_or("")
                }
                None => rest,
            };
            return Ok(Self::Proxied(path.trim_matches('/').to_string()));
        }

        if uri.starts_with(FILE_SCHEME) {
            // `file:/p`, `file:///p` and `file://localhost/p` are all the same
            // local path; segments are percent-decoded.
            return Url::parse(uri)
                .ok()
                .and_then(|url| url.to_file_path().ok())
                .map(Self::Local)
                .ok_or_else(|| RegistryError::InvalidFileUri(uri.to_string()));
        }

        if uri.starts_with('/') {
            return Ok(Self::Local(PathBuf::from(uri)));
        }

        let scheme = uri.split_once(':').map(|(s, _)| s).unwrap_or(uri);
        Err(RegistryError::UnsupportedScheme {
            scheme: scheme.to_string(),
            uri: uri.to_string(),
        })
    }

    /// Last path segment, used as the directory name under the destination.
    fn basename(&self) -> Option<String> {
        match self {
            Self::Proxied(path) => {
                path.rsplit('/').next().filter(|s| !s.is_empty()).map(String::from)
            }
            Self::Local(path) => path.file_name().map(|n| n.to_string_lossy().to_string()),
        }
    }
}

/// Download everything behind `artifact_uri` into `destination`.
///
/// Artifacts land in `destination/<last segment of the URI>`; that path is
/// returned.
pub async fn download_tree(
    client: &MlflowClient,
    artifact_uri: &str,
    destination: &Path,
) -> Result<PathBuf, RegistryError> {
    let location = ArtifactLocation::parse(artifact_uri)?;
    let target = match location.basename() {
        Some(name) => destination.join(name),
        None => destination.to_path_buf(),
    };

    match location {
        ArtifactLocation::Proxied(root) => download_proxied(client, &root, &target).await?,
        ArtifactLocation::Local(source) => copy_local(&source, &target)?,
    }

    log::debug!("Downloaded {} to {}", artifact_uri, target.display());
    Ok(target)
}

impl MlflowClient {
    /// List the direct children of `path` on the artifact proxy.
    pub async fn list_artifacts(
        &self,
        path: &str,
    ) -> Result<ListArtifactsResponse, RegistryError> {
        Ok(self.get_json(ARTIFACTS, &[("path", path)]).await?)
    }

    /// Write the proxied file at `path` to `target`.
    pub async fn download_file(&self, path: &str, target: &Path) -> Result<(), RegistryError> {
        let response = self.get_raw(ARTIFACTS, path).await?;
        let body = response.bytes().await.map_err(RestError::from)?;

        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(target, &body)?;
        Ok(())
    }
}

async fn download_proxied(
    client: &MlflowClient,
    root: &str,
    target: &Path,
) -> Result<(), RegistryError> {
    let listing = client.list_artifacts(root).await?;

    // An empty listing means `root` is a single file.
    if listing.files.is_empty() {
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        client.download_file(root, target).await?;
        return Ok(());
    }

    let mut pending = vec![(root.to_string(), target.to_path_buf(), listing)];
    while let Some((remote_dir, local_dir, listing)) = pending.pop() {
        std::fs::create_dir_all(&local_dir)?;

        for file in listing.files {
            let name = child_name(&remote_dir, &file.path)?;
            let remote = join_remote(&remote_dir, name);
            let local = local_dir.join(name);

            if file.is_dir {
                let children = client.list_artifacts(&remote).await?;
                pending.push((remote, local, children));
            } else {
                client.download_file(&remote, &local).await?;
            }
        }
    }

    Ok(())
}

/// Name of a listed entry relative to the listed directory.
///
/// The proxy reports entries relative to the listed path, but some servers
/// return them prefixed with it.
fn child_name<'a>(parent: &str, listed: &'a str) -> Result<&'a str, RegistryError> {
    let name = if parent.is_empty() {
        listed
    } else {
        listed
            .strip_prefix(parent)
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(listed)
    };

    let name = name.trim_matches('/');
    let safe = !name.is_empty()
        && Path::new(name)
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
    if !safe {
        return Err(RegistryError::UnsafePath(listed.to_string()));
    }
    Ok(name)
}

fn join_remote(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", parent, name)
    }
}

fn copy_local(source: &Path, target: &Path) -> Result<(), RegistryError> {
    if !source.exists() {
        return Err(RegistryError::MissingSource(source.to_path_buf()));
    }

    if source.is_file() {
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::copy(source, target)?;
        return Ok(());
    }

    for entry in WalkDir::new(source) {
        let entry = entry?;
        let relative = entry.path().strip_prefix(source).unwrap_or(entry.path());
        let dest = target.join(relative);

        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&dest)?;
        } else {
            if let Some(parent) = dest.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::copy(entry.path(), &dest)?;
        }
    }

    Ok(())
}

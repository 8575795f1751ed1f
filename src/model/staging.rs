//! Per-call staging directories for downloaded artifacts.

use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A uniquely named temporary directory, removed on drop.
#[derive(Debug)]
pub struct StagingDir {
    dir: TempDir,
}

impl StagingDir {
    /// Create `<root>/<model_name>_XXXXXX`.
    pub fn create(root: &Path, model_name: &str) -> io::Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(&staging_prefix(model_name))
            .tempdir_in(root)?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Keep the directory on disk and hand its path to the caller, who then
    /// owns its removal.
    pub fn persist(self) -> PathBuf {
        self.dir.keep()
    }
}

/// Temp-dir prefix for a model name. Characters that are awkward in file
/// names become `_`.
pub fn staging_prefix(model_name: &str) -> String {
    let sanitized: String = model_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{}_", sanitized)
}

//! Weight-file discovery in downloaded artifact trees.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::defaults::WEIGHT_FILE_EXTENSION;
use crate::error::{Error, Result};

/// Every file below `root` whose name ends with `extension`.
///
/// Directories are walked depth-first with entries sorted by file name, so the
/// order is the same on every filesystem. Symlinks to regular files count as
/// files. `root` may itself be a file.
pub fn find_weight_files(root: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        let is_file = entry.file_type().is_file()
            || (entry.file_type().is_symlink() && entry.path().is_file());
        if is_file && entry.file_name().to_string_lossy().ends_with(extension) {
            found.push(entry.into_path());
        }
    }
    Ok(found)
}

/// The `.onnx` file to load from `root`: the first one in walk order.
pub fn select_weight_file(root: &Path) -> Result<PathBuf> {
    let mut candidates = find_weight_files(root, WEIGHT_FILE_EXTENSION)?;
    if candidates.is_empty() {
        return Err(Error::WeightFileNotFound {
            root: root.to_path_buf(),
        });
    }
    if candidates.len() > 1 {
        log::debug!(
            "Found {} weight files under {}, using the first",
            candidates.len(),
            root.display()
        );
    }
    Ok(candidates.swap_remove(0))
}

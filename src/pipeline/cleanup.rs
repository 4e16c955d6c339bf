//! Removal of scratch and intermediate trees.

use std::io::ErrorKind;
use std::path::Path;

use crate::error::{HarvestError, Result};

/// Removes the directory tree at `path`.
///
/// Returns `Ok(false)` and logs a warning when there is nothing to remove.
///
/// # Errors
///
/// Returns an error if the tree exists but cannot be removed.
pub fn remove_tree(path: &Path) -> Result<bool> {
    match std::fs::remove_dir_all(path) {
        Ok(()) => {
            tracing::info!("Removed {}", path.display());
            Ok(true)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::warn!("Directory not found, nothing to remove: {}", path.display());
            Ok(false)
        }
        Err(e) => Err(HarvestError::io(path, e)),
    }
}

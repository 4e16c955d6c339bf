//! Merging checked-out trees into persistent snapshots.

use std::path::Path;

use filetime::FileTime;
use walkdir::WalkDir;

use crate::error::{HarvestError, Result};

/// Copies one file, keeping its permissions and timestamps.
///
/// Parent directories of `dst` are created as needed; an existing `dst` is
/// overwritten.
///
/// # Errors
///
/// Returns an error if the copy or the timestamp update fails.
pub fn copy_preserving(src: &Path, dst: &Path) -> Result<()> {
    if let Some(parent) = dst.parent() {
        std::fs::create_dir_all(parent).map_err(|e| HarvestError::io(parent, e))?;
    }
    std::fs::copy(src, dst).map_err(|e| HarvestError::io(src, e))?;
    let meta = std::fs::metadata(src).map_err(|e| HarvestError::io(src, e))?;
    filetime::set_file_times(
        dst,
        FileTime::from_last_access_time(&meta),
        FileTime::from_last_modification_time(&meta),
    )
    .map_err(|e| HarvestError::io(dst, e))
}

/// Recursively merges the contents of `src` into `dst`.
///
/// Directories already present in `dst` are kept; files with the same
/// relative path are overwritten. Symlinks are followed; dangling ones are
/// skipped with a warning. Returns the number of files copied.
///
/// # Errors
///
/// Returns an error if `src` cannot be read or a copy fails.
pub fn merge_tree(src: &Path, dst: &Path) -> Result<usize> {
    std::fs::create_dir_all(dst).map_err(|e| HarvestError::io(dst, e))?;
    let mut copied = 0;
    for entry in WalkDir::new(src).min_depth(1).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() > 0 && err.io_error().is_some_and(is_dangling) => {
                tracing::warn!("Skipping unreadable entry in checkout: {err}");
                continue;
            }
            Err(err) => {
                let path = err.path().unwrap_or(src).to_path_buf();
                return Err(HarvestError::io(path, err.into()));
            }
        };
        let Ok(rel) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dst.join(rel);
        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target).map_err(|e| HarvestError::io(&target, e))?;
        } else {
            copy_preserving(entry.path(), &target)?;
            copied += 1;
        }
    }
    tracing::debug!("Merged {copied} files from {} into {}", src.display(), dst.display());
    Ok(copied)
}

fn is_dangling(err: &std::io::Error) -> bool {
    err.kind() == std::io::ErrorKind::NotFound
}

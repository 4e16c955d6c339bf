//! Minimal-file extraction.
//!
//! Given a full bug directory (`<bug>/{buggy,fixed}/...`), copy only what a
//! downstream dataset needs into `<out>/{buggy,fixed}/...`: the files named
//! by the patch manifest, the test files named by the bug info, and a fixed
//! set of documentation files. Extraction never deletes, so re-running it
//! is safe.

use std::path::{Component, Path};

use crate::bugs::info::scan_test_files;
use crate::bugs::manifest::read_patchfile_info;
use crate::bugs::{BugRef, Version};
use crate::error::{HarvestError, Result};

/// Patch manifest inside a snapshot.
pub const PATCHFILE_INFO: &str = "bugsinpy_patchfile.info";
/// Bug info inside a snapshot.
pub const SNAPSHOT_BUG_INFO: &str = "bugsinpy_bug.info";

/// Files copied from each snapshot root regardless of the manifest.
pub const SNAPSHOT_DOC_FILES: [&str; 6] = [
    PATCHFILE_INFO,
    SNAPSHOT_BUG_INFO,
    "bugsinpy_requirements.txt",
    "README.rst",
    "README.md",
    "README",
];

/// Files copied from the bug root to the output bug root.
pub const BUG_LEVEL_FILES: [&str; 4] =
    ["bug_description.txt", "requirements.txt", "setup.sh", "run_test.sh"];

/// How [`copy_with_fallback`] wrote a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyMode {
    /// Decoded as UTF-8 and rewritten with `\n` line endings.
    Text,
    /// Not UTF-8; copied byte for byte.
    Binary,
}

/// Copies `src` to `dst`, normalizing text files.
///
/// UTF-8 content has `\r\n` and lone `\r` line endings rewritten to `\n`.
/// Anything that does not decode is copied unchanged. Parent directories of
/// `dst` are created on demand.
///
/// # Errors
///
/// Returns an error if `src` cannot be read or `dst` cannot be written.
pub fn copy_with_fallback(src: &Path, dst: &Path) -> Result<CopyMode> {
    let bytes = std::fs::read(src).map_err(|e| HarvestError::io(src, e))?;
    if let Some(parent) = dst.parent() {
        std::fs::create_dir_all(parent).map_err(|e| HarvestError::io(parent, e))?;
    }
    let (data, mode) = match String::from_utf8(bytes) {
        Ok(text) => (normalize_newlines(&text).into_bytes(), CopyMode::Text),
        Err(err) => (err.into_bytes(), CopyMode::Binary),
    };
    std::fs::write(dst, data).map_err(|e| HarvestError::io(dst, e))?;
    tracing::info!("Copied {} to {} ({mode:?})", src.display(), dst.display());
    Ok(mode)
}

fn normalize_newlines(text: &str) -> String {
    if text.contains('\r') {
        text.replace("\r\n", "\n").replace('\r', "\n")
    } else {
        text.to_string()
    }
}

/// Copies `src` to `dst` with [`copy_with_fallback`] when `src` is a file.
///
/// A missing source is expected (files come and go between versions) and
/// yields `Ok(None)` without logging.
///
/// # Errors
///
/// Returns an error if an existing source cannot be copied.
pub fn copy_if_present(src: &Path, dst: &Path) -> Result<Option<CopyMode>> {
    if src.is_file() {
        copy_with_fallback(src, dst).map(Some)
    } else {
        Ok(None)
    }
}

/// Counts of what one extraction wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractSummary {
    /// Files written under `buggy/`.
    pub buggy: usize,
    /// Files written under `fixed/`.
    pub fixed: usize,
    /// Bug-level files written beside the snapshots.
    pub bug_level: usize,
}

impl ExtractSummary {
    fn bump(&mut self, version: Version) {
        match version {
            Version::Buggy => self.buggy += 1,
            Version::Fixed => self.fixed += 1,
        }
    }

    /// Total files written.
    #[must_use]
    pub fn total(&self) -> usize {
        self.buggy + self.fixed + self.bug_level
    }
}

/// Extracts the minimal file set of `bug` from `bug_dir` into `out_dir`.
///
/// The manifest and bug info are read from the `fixed` snapshot, falling
/// back to `buggy`. Each listed path is copied independently per version.
///
/// # Errors
///
/// Returns [`HarvestError::MissingSnapshot`] unless both `buggy/` and
/// `fixed/` exist, or an error from reading the manifest or copying.
pub fn extract_minimal(bug: &BugRef, bug_dir: &Path, out_dir: &Path) -> Result<ExtractSummary> {
    let snapshot = |v: Version| bug_dir.join(v.dir_name());
    if !Version::ALL.iter().all(|v| snapshot(*v).is_dir()) {
        return Err(HarvestError::MissingSnapshot {
            project: bug.project.clone(),
            bug_id: bug.bug_id.clone(),
        });
    }
    for version in Version::ALL {
        let dir = out_dir.join(version.dir_name());
        std::fs::create_dir_all(&dir).map_err(|e| HarvestError::io(&dir, e))?;
    }

    let mut summary = ExtractSummary::default();

    for name in BUG_LEVEL_FILES {
        if copy_if_present(&bug_dir.join(name), &out_dir.join(name))?.is_some() {
            summary.bug_level += 1;
        }
    }

    let mut paths: Vec<String> = SNAPSHOT_DOC_FILES.iter().map(|s| (*s).to_string()).collect();
    paths.extend(read_patchfile_info(&first_present(bug_dir, PATCHFILE_INFO))?);
    paths.extend(read_test_files(&first_present(bug_dir, SNAPSHOT_BUG_INFO))?);

    for rel in &paths {
        if !is_contained(rel) {
            tracing::warn!("{bug}: ignoring path outside the snapshot: {rel}");
            continue;
        }
        for version in Version::ALL {
            let src = snapshot(version).join(rel);
            let dst = out_dir.join(version.dir_name()).join(rel);
            if copy_if_present(&src, &dst)?.is_some() {
                summary.bump(version);
            }
        }
    }

    tracing::info!(
        "{bug}: extracted {} buggy and {} fixed files",
        summary.buggy,
        summary.fixed
    );
    Ok(summary)
}

/// `<bug>/fixed/<name>` if it exists, else `<bug>/buggy/<name>`.
fn first_present(bug_dir: &Path, name: &str) -> std::path::PathBuf {
    let fixed = bug_dir.join(Version::Fixed.dir_name()).join(name);
    if fixed.is_file() {
        fixed
    } else {
        bug_dir.join(Version::Buggy.dir_name()).join(name)
    }
}

fn read_test_files(path: &Path) -> Result<Vec<String>> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(scan_test_files(&String::from_utf8_lossy(&bytes))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(HarvestError::io(path, e)),
    }
}

/// Relative paths only; no `..` or absolute components.
pub(crate) fn is_contained(rel: &str) -> bool {
    Path::new(rel).components().all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

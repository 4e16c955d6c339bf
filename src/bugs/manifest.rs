//! Patch manifests: the list of files a bug's fix touches.
//!
//! Two encodings exist. `bugsinpy_patchfile.info` holds a `;`-separated
//! list; `bug_patch.txt` is a unified diff whose `diff --git` headers name
//! the files.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use super::info::split_paths;
use crate::error::{HarvestError, Result};

const DIFF_HEADER: &str = "diff --git";

fn diff_target_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"b/(.*?)\s*$").expect("diff target pattern is valid"))
}

/// Parses a `;`-separated manifest, e.g. `"a.py;b/c.py; ;d.py"` into
/// `["a.py", "b/c.py", "d.py"]`.
#[must_use]
pub fn parse_patchfile_info(text: &str) -> Vec<String> {
    split_paths(text.trim())
}

/// Reads a `;`-separated manifest file; a missing file is an empty manifest.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read.
pub fn read_patchfile_info(path: &Path) -> Result<Vec<String>> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(parse_patchfile_info(&text)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(HarvestError::io(path, e)),
    }
}

/// Extracts the post-image path of every `diff --git a/... b/...` header.
#[must_use]
pub fn paths_from_diff(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| line.starts_with(DIFF_HEADER))
        .filter_map(diff_target)
        .collect()
}

/// Reads a unified diff file and extracts its header paths.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn read_patch(path: &Path) -> Result<Vec<String>> {
    let bytes = std::fs::read(path).map_err(|e| HarvestError::io(path, e))?;
    Ok(paths_from_diff(&String::from_utf8_lossy(&bytes)))
}

fn diff_target(line: &str) -> Option<String> {
    if let Some(path) = symmetric_target(line) {
        return Some(path.to_string());
    }
    diff_target_re()
        .captures(line)
        .map(|caps| caps[1].to_string())
        .filter(|path| !path.is_empty())
}

/// For the usual `a/<p> b/<p>` header, splits at the midpoint so a path
/// that itself contains `b/` (e.g. `lib/x.py`) is not cut short.
fn symmetric_target(line: &str) -> Option<&str> {
    let body = line.strip_prefix(DIFF_HEADER)?.trim().strip_prefix("a/")?;
    let half = body.len().checked_sub(3)? / 2;
    if body.len() != half * 2 + 3 {
        return None;
    }
    let (pre, rest) = (body.get(..half)?, body.get(half..)?);
    let post = rest.strip_prefix(" b/")?;
    (pre == post && !pre.is_empty()).then_some(post)
}

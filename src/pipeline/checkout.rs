//! Checkout invocation and the scratch directory it writes into.

use std::path::{Path, PathBuf};

use super::cleanup::remove_tree;
use super::Pipeline;
use crate::bugs::{BugRef, Version};
use crate::error::{HarvestError, Result};
use crate::ports::Invocation;

/// Transient checkout directory, removed when the guard is dropped.
///
/// Acquiring removes any stale tree left by an earlier crashed run, so the
/// checkout tool always starts from a missing directory.
#[derive(Debug)]
pub struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    /// Claims `path` as scratch space.
    ///
    /// # Errors
    ///
    /// Returns an error if a stale tree exists and cannot be removed.
    pub fn acquire(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if path.exists() {
            tracing::debug!("Removing stale scratch directory {}", path.display());
            std::fs::remove_dir_all(&path).map_err(|e| HarvestError::io(&path, e))?;
        }
        Ok(Self { path })
    }

    /// The scratch directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where the checkout tool places `project`'s tree.
    #[must_use]
    pub fn project_dir(&self, project: &str) -> PathBuf {
        self.path.join(project)
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if let Err(e) = remove_tree(&self.path) {
            tracing::error!("Failed to remove scratch directory: {e}");
        }
    }
}

impl Pipeline<'_> {
    /// Builds `<checkout> -p <project> -i <bug> -v <tag> -w <scratch>`.
    #[must_use]
    pub fn checkout_invocation(&self, bug: &BugRef, tag: &str, scratch: &Path) -> Invocation {
        Invocation::new(&self.tools().checkout_bin)
            .args(["-p", bug.project.as_str(), "-i", bug.bug_id.as_str(), "-v", tag, "-w"])
            .arg(scratch.display().to_string())
    }

    /// Checks out `version` of `bug` into `scratch` and returns the project
    /// tree the tool produced.
    ///
    /// # Errors
    ///
    /// Returns an error if the tool fails or leaves no project tree behind.
    pub fn checkout(&self, bug: &BugRef, version: Version, scratch: &ScratchDir) -> Result<PathBuf> {
        self.checkout_tag(bug, version.checkout_tag(), scratch)
    }

    pub(crate) fn checkout_tag(
        &self,
        bug: &BugRef,
        tag: &str,
        scratch: &ScratchDir,
    ) -> Result<PathBuf> {
        self.run_checked(self.checkout_invocation(bug, tag, scratch.path()))?;
        let tree = scratch.project_dir(&bug.project);
        if !tree.is_dir() {
            return Err(HarvestError::MissingCheckout { path: tree });
        }
        Ok(tree)
    }
}

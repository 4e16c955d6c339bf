//! Git working-tree port.

use std::path::Path;

/// Mutates a git working tree.
///
/// Abstracting git access allows deterministic replay and testing
/// without requiring a real repository.
pub trait GitRepo: Send + Sync {
    /// Runs `git reset --hard` in `repo`.
    ///
    /// # Errors
    ///
    /// Returns an error if git cannot be run or exits non-zero.
    fn reset_hard(&self, repo: &Path) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Runs `git checkout <commit>` in `repo`.
    ///
    /// # Errors
    ///
    /// Returns an error if git cannot be run or exits non-zero.
    fn checkout(
        &self,
        repo: &Path,
        commit: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Runs `git clean -fd` in `repo`, removing untracked files and directories.
    ///
    /// # Errors
    ///
    /// Returns an error if git cannot be run or exits non-zero.
    fn clean(&self, repo: &Path) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// Forces the working tree at `repo` to match `commit` exactly.
///
/// Resets tracked changes, checks out the commit, removes untracked files,
/// then checks out again so files the clean step touched are restored.
///
/// # Errors
///
/// Returns the first failing git step's error.
pub fn force_to_commit(
    git: &dyn GitRepo,
    repo: &Path,
    commit: &str,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    git.reset_hard(repo)?;
    git.checkout(repo, commit)?;
    git.clean(repo)?;
    git.checkout(repo, commit)
}

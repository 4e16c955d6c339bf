//! Live git adapter using `git` CLI commands.

use std::path::Path;
use std::process::Command;

use crate::ports::git::GitRepo;

/// Live git adapter that shells out to the `git` CLI.
pub struct LiveGitRepo;

impl LiveGitRepo {
    fn git(repo: &Path, args: &[&str]) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let output = Command::new("git").args(args).current_dir(repo).output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!("git {} failed: {}", args.join(" "), stderr.trim()).into());
        }
        Ok(())
    }
}

impl GitRepo for LiveGitRepo {
    fn reset_hard(&self, repo: &Path) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Self::git(repo, &["reset", "--hard"])
    }

    fn checkout(
        &self,
        repo: &Path,
        commit: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Self::git(repo, &["checkout", commit])
    }

    fn clean(&self, repo: &Path) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Self::git(repo, &["clean", "-fd"])
    }
}

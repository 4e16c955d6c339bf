//! Recording adapter for the `GitRepo` port.

use std::path::Path;
use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::GitRepo;

/// Records git interactions while delegating to an inner implementation.
pub struct RecordingGitRepo {
    inner: Box<dyn GitRepo>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingGitRepo {
    /// Creates a new recording git repo wrapping the given implementation.
    pub fn new(inner: Box<dyn GitRepo>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct RepoInput<'a> {
    repo: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    commit: Option<&'a str>,
}

impl RepoInput<'_> {
    fn new(repo: &Path) -> Self {
        Self { repo: repo.display().to_string(), commit: None }
    }
}

impl GitRepo for RecordingGitRepo {
    fn reset_hard(&self, repo: &Path) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let result = self.inner.reset_hard(repo);
        record_result(&self.recorder, "git", "reset_hard", &RepoInput::new(repo), &result);
        result
    }

    fn checkout(
        &self,
        repo: &Path,
        commit: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let result = self.inner.checkout(repo, commit);
        let input = RepoInput { commit: Some(commit), ..RepoInput::new(repo) };
        record_result(&self.recorder, "git", "checkout", &input, &result);
        result
    }

    fn clean(&self, repo: &Path) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let result = self.inner.clean(repo);
        record_result(&self.recorder, "git", "clean", &RepoInput::new(repo), &result);
        result
    }
}

//! Replaying adapter for the `GitRepo` port.

use std::path::Path;
use std::sync::Mutex;

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::git::GitRepo;

/// Replays recorded git operations from a cassette.
pub struct ReplayingGitRepo {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingGitRepo {
    /// Creates a new replaying git repo from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }

    fn replay(&self, method: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let output = next_output(&self.replayer, "git", method);
        replay_result(&output, &format!("git::{method}"))
    }
}

impl GitRepo for ReplayingGitRepo {
    fn reset_hard(&self, _repo: &Path) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.replay("reset_hard")
    }

    fn checkout(
        &self,
        _repo: &Path,
        _commit: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.replay("checkout")
    }

    fn clean(&self, _repo: &Path) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.replay("clean")
    }
}

//! Service context bundling all port trait objects.

use std::path::Path;

use crate::adapters::live::{LiveClock, LiveGitRepo, LiveShellExecutor};
use crate::adapters::recording::{RecordingClock, RecordingGitRepo, RecordingShellExecutor};
use crate::adapters::replaying::{ReplayingClock, ReplayingGitRepo, ReplayingShellExecutor};
use crate::cassette::format::Cassette;
use crate::cassette::replayer::CassetteReplayer;
use crate::cassette::session::RecordingSession;
use crate::ports::clock::Clock;
use crate::ports::git::GitRepo;
use crate::ports::shell::ShellExecutor;

/// Bundles all port trait objects into a single context.
///
/// Each field provides access to one external boundary. Constructors
/// wire up different adapter implementations (live, recording, replaying).
pub struct ServiceContext {
    /// Clock used to timestamp the run report.
    pub clock: Box<dyn Clock>,
    /// Git working-tree operations.
    pub git: Box<dyn GitRepo>,
    /// External tool execution (checkout and info tools).
    pub shell: Box<dyn ShellExecutor>,
}

impl ServiceContext {
    /// Creates a context from explicit adapters.
    #[must_use]
    pub fn new(
        shell: Box<dyn ShellExecutor>,
        git: Box<dyn GitRepo>,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self { clock, git, shell }
    }

    /// Creates a live context with real adapters.
    #[must_use]
    pub fn live() -> Self {
        Self::new(Box::new(LiveShellExecutor), Box::new(LiveGitRepo), Box::new(LiveClock))
    }

    /// Creates a live context whose interactions are captured by `session`.
    ///
    /// The context must be dropped before [`RecordingSession::finish`] so the
    /// recorders are no longer shared.
    #[must_use]
    pub fn recording(session: &RecordingSession) -> Self {
        Self::new(
            Box::new(RecordingShellExecutor::new(
                Box::new(LiveShellExecutor),
                session.shell.clone(),
            )),
            Box::new(RecordingGitRepo::new(Box::new(LiveGitRepo), session.git.clone())),
            Box::new(RecordingClock::new(Box::new(LiveClock), session.clock.clone())),
        )
    }

    /// Creates a replaying context from a single cassette file.
    ///
    /// Each port gets its own replayer over the same cassette so per-port
    /// queues are independent.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, String> {
        let cassette = Cassette::load(path)?;
        Ok(Self::from_cassette(&cassette))
    }

    /// Creates a replaying context from an already-loaded cassette.
    #[must_use]
    pub fn from_cassette(cassette: &Cassette) -> Self {
        Self::new(
            Box::new(ReplayingShellExecutor::new(CassetteReplayer::new(cassette))),
            Box::new(ReplayingGitRepo::new(CassetteReplayer::new(cassette))),
            Box::new(ReplayingClock::new(CassetteReplayer::new(cassette))),
        )
    }
}

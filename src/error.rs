//! Error type shared by the harvesting pipeline.

use std::io;
use std::path::{Path, PathBuf};

/// Errors that abort processing of a single bug (or, for a few variants,
/// a whole command before any bug is touched).
#[derive(Debug, thiserror::Error)]
pub enum HarvestError {
    /// An external tool exited with a non-zero status.
    #[error("{program} {args} failed (exit code {exit_code:?}): {stderr}")]
    ToolFailed {
        /// Program that was invoked.
        program: String,
        /// Space-joined argument list, for display only.
        args: String,
        /// Exit code, `None` when the process was killed by a signal.
        exit_code: Option<i32>,
        /// Trimmed standard error.
        stderr: String,
    },

    /// An external tool did not finish within the configured timeout.
    #[error("{program} timed out after {secs}s")]
    ToolTimedOut {
        /// Program that was invoked.
        program: String,
        /// Configured timeout.
        secs: u64,
    },

    /// A port adapter reported an error (spawn failure, git failure, ...).
    #[error("{context}: {message}")]
    Port {
        /// What the pipeline was doing.
        context: String,
        /// Message from the adapter.
        message: String,
    },

    /// Filesystem operation failed.
    #[error("{}: {source}", path.display())]
    Io {
        /// Path being read or written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// A bug directory is missing its `buggy/` or `fixed/` snapshot.
    #[error("required snapshot directories not found for {project} bug {bug_id}")]
    MissingSnapshot {
        /// Project name.
        project: String,
        /// Bug identifier.
        bug_id: String,
    },

    /// The checkout tool succeeded but left no project tree behind.
    #[error("checkout produced no tree at {}", path.display())]
    MissingCheckout {
        /// Expected `<scratch>/<project>` path.
        path: PathBuf,
    },

    /// A required bug-info key is absent.
    #[error("{key} not found in {}", path.display())]
    MissingInfoKey {
        /// Missing key.
        key: String,
        /// Info file that was parsed.
        path: PathBuf,
    },

    /// The run report could not be serialized.
    #[error("report serialization failed: {0}")]
    Report(#[from] serde_json::Error),
}

impl HarvestError {
    /// Wraps an I/O error with the path it concerns.
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io { path: path.as_ref().to_path_buf(), source }
    }

    /// Wraps a port error with a short description of the operation.
    pub fn port(
        context: impl Into<String>,
        err: &(dyn std::error::Error + Send + Sync),
    ) -> Self {
        Self::Port { context: context.into(), message: err.to_string() }
    }
}

/// Convenience alias used throughout the pipeline.
pub type Result<T> = std::result::Result<T, HarvestError>;

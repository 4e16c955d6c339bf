//! Per-run outcome ledger.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::bugs::BugRef;
use crate::error::{HarvestError, Result};
use crate::ports::Clock;

/// Result of processing one bug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum BugStatus {
    /// Every step succeeded.
    Ok,
    /// A step failed and the bug was skipped.
    Failed {
        /// Rendered error.
        message: String,
    },
}

/// One line of the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BugOutcome {
    /// Project name.
    pub project: String,
    /// Bug identifier.
    pub bug_id: String,
    /// How processing ended.
    #[serde(flatten)]
    pub status: BugStatus,
}

/// Outcomes of a batch command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Subcommand that produced this report.
    pub command: String,
    /// When the batch started.
    pub started_at: DateTime<Utc>,
    /// When the batch finished; unset until [`RunReport::finish`].
    pub finished_at: Option<DateTime<Utc>>,
    /// One entry per bug, in processing order.
    pub outcomes: Vec<BugOutcome>,
}

impl RunReport {
    /// Starts a report timestamped by `clock`.
    pub fn start(command: impl Into<String>, clock: &dyn Clock) -> Self {
        Self {
            command: command.into(),
            started_at: clock.now(),
            finished_at: None,
            outcomes: Vec::new(),
        }
    }

    /// Records the outcome of `bug`, logging failures.
    pub fn record(&mut self, bug: &BugRef, result: Result<()>) {
        let status = match result {
            Ok(()) => BugStatus::Ok,
            Err(e) => {
                tracing::error!("Error processing {bug}: {e}");
                BugStatus::Failed { message: e.to_string() }
            }
        };
        self.outcomes.push(BugOutcome {
            project: bug.project.clone(),
            bug_id: bug.bug_id.clone(),
            status,
        });
    }

    /// Number of bugs that succeeded.
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.status == BugStatus::Ok).count()
    }

    /// Number of bugs that failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// Stamps the finish time and logs a one-line summary.
    pub fn finish(&mut self, clock: &dyn Clock) {
        self.finished_at = Some(clock.now());
        tracing::info!(
            "{}: {} bugs processed, {} succeeded, {} failed",
            self.command,
            self.outcomes.len(),
            self.succeeded(),
            self.failed()
        );
    }

    /// Writes the report as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn write(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| HarvestError::io(parent, e))?;
        }
        std::fs::write(path, json + "\n").map_err(|e| HarvestError::io(path, e))
    }
}

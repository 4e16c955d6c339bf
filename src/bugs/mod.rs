//! Bug identities and the text formats that describe them.
//!
//! A bug lives at `<projects>/<project>/bugs/<bug-id>/` and carries a patch,
//! a `key=value` info file, and optional sidecar scripts. Everything here is
//! parsing and discovery; nothing writes to disk.

pub mod enumerate;
pub mod info;
pub mod manifest;

use std::fmt;
use std::path::{Path, PathBuf};

pub use enumerate::{discover_bugs, discover_snapshots};
pub use info::{scan_test_files, BugInfo};
pub use manifest::{parse_patchfile_info, paths_from_diff};

/// Name of the per-project directory that holds bug definitions.
pub const BUGS_DIR: &str = "bugs";

/// A (project, bug-id) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BugRef {
    /// Project name (directory under the projects root).
    pub project: String,
    /// Bug identifier (directory under `bugs/`).
    pub bug_id: String,
}

impl BugRef {
    /// Creates a bug reference.
    pub fn new(project: impl Into<String>, bug_id: impl Into<String>) -> Self {
        Self { project: project.into(), bug_id: bug_id.into() }
    }

    /// `<projects_root>/<project>/bugs/<bug_id>`: the bug's source-of-truth directory.
    #[must_use]
    pub fn source_dir(&self, projects_root: &Path) -> PathBuf {
        projects_root.join(&self.project).join(BUGS_DIR).join(&self.bug_id)
    }

    /// `<output_root>/<project>/<bug_id>`: where snapshots for this bug are written.
    #[must_use]
    pub fn output_dir(&self, output_root: &Path) -> PathBuf {
        output_root.join(&self.project).join(&self.bug_id)
    }
}

impl fmt::Display for BugRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} bug {}", self.project, self.bug_id)
    }
}

/// One of the two snapshots recorded for every bug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Version {
    /// The commit before the fix.
    Buggy,
    /// The commit that fixes the bug.
    Fixed,
}

impl Version {
    /// Both versions, in processing order.
    pub const ALL: [Version; 2] = [Version::Buggy, Version::Fixed];

    /// Snapshot directory name.
    #[must_use]
    pub fn dir_name(self) -> &'static str {
        match self {
            Version::Buggy => "buggy",
            Version::Fixed => "fixed",
        }
    }

    /// Value passed to the checkout tool's `-v` flag.
    #[must_use]
    pub fn checkout_tag(self) -> &'static str {
        match self {
            Version::Buggy => "0",
            Version::Fixed => "1",
        }
    }

    /// Bug-info key holding this version's commit id.
    #[must_use]
    pub fn commit_key(self) -> &'static str {
        match self {
            Version::Buggy => "buggy_commit_id",
            Version::Fixed => "fixed_commit_id",
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

//! Bug descriptions and sidecar scripts.

use std::path::Path;

use super::snapshot::copy_preserving;
use super::Pipeline;
use crate::bugs::BugRef;
use crate::error::{HarvestError, Result};
use crate::ports::Invocation;

/// File receiving the info tool's stdout.
pub const DESCRIPTION_FILE: &str = "bug_description.txt";

/// Files copied verbatim from a bug's source directory when present.
pub const SIDECAR_FILES: [&str; 3] = ["requirements.txt", "setup.sh", "run_test.sh"];

impl Pipeline<'_> {
    /// Builds `<info> -p <project> -i <bug>`.
    #[must_use]
    pub fn info_invocation(&self, bug: &BugRef) -> Invocation {
        Invocation::new(&self.tools().info_bin).args([
            "-p",
            bug.project.as_str(),
            "-i",
            bug.bug_id.as_str(),
        ])
    }

    /// Runs the info tool and writes its stdout to
    /// `<out_dir>/bug_description.txt`.
    ///
    /// A non-zero exit only warns; whatever the tool printed is kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the tool cannot be run or the file cannot be written.
    pub fn describe_bug(&self, bug: &BugRef, out_dir: &Path) -> Result<()> {
        let output = self.run_tool(self.info_invocation(bug))?;
        if !output.success() {
            tracing::warn!(
                "{bug}: info tool exited with {}: {}",
                output.exit_code,
                output.stderr.trim()
            );
        }
        std::fs::create_dir_all(out_dir).map_err(|e| HarvestError::io(out_dir, e))?;
        let dest = out_dir.join(DESCRIPTION_FILE);
        std::fs::write(&dest, output.stdout).map_err(|e| HarvestError::io(&dest, e))?;
        Ok(())
    }
}

/// Copies each of [`SIDECAR_FILES`] found in `source_dir` into `out_dir`.
///
/// Returns how many were copied.
///
/// # Errors
///
/// Returns an error if an existing sidecar cannot be copied.
pub fn copy_sidecars(source_dir: &Path, out_dir: &Path) -> Result<usize> {
    let mut copied = 0;
    for name in SIDECAR_FILES {
        let src = source_dir.join(name);
        if src.is_file() {
            copy_preserving(&src, &out_dir.join(name))?;
            copied += 1;
        }
    }
    Ok(copied)
}

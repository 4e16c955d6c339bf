//! Full-snapshot collection: both versions of a bug plus its metadata.

use std::path::Path;

use super::checkout::ScratchDir;
use super::metadata::copy_sidecars;
use super::snapshot::merge_tree;
use super::Pipeline;
use crate::bugs::{BugRef, Version};
use crate::error::{HarvestError, Result};

impl Pipeline<'_> {
    /// Collects `bug` into `<out_root>/<project>/<bug>/`.
    ///
    /// Each version is checked out into a fresh scratch directory and merged
    /// into `buggy/` or `fixed/`; the scratch tree is removed even when a
    /// step fails. Afterwards the bug description and sidecars are written
    /// beside the snapshots. Returns the number of files merged.
    ///
    /// # Errors
    ///
    /// Returns the first checkout, merge, or metadata failure. Snapshots
    /// already written for this bug are left in place.
    pub fn collect_bug(&self, projects_root: &Path, bug: &BugRef, out_root: &Path) -> Result<usize> {
        let out_dir = bug.output_dir(out_root);
        for version in Version::ALL {
            let dir = out_dir.join(version.dir_name());
            std::fs::create_dir_all(&dir).map_err(|e| HarvestError::io(&dir, e))?;
        }

        let mut merged = 0;
        for version in Version::ALL {
            tracing::info!("Checking out {version} version of {bug}");
            let scratch = ScratchDir::acquire(&self.tools().scratch_dir)?;
            let tree = self.checkout(bug, version, &scratch)?;
            merged += merge_tree(&tree, &out_dir.join(version.dir_name()))?;
        }

        self.describe_bug(bug, &out_dir)?;
        copy_sidecars(&bug.source_dir(projects_root), &out_dir)?;
        tracing::info!("Collected {bug} ({merged} files)");
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ToolConfig;
    use crate::pipeline::testing::{context, populate, ScriptedShell, Step};

    fn fixture() -> (tempfile::TempDir, ToolConfig) {
        let root = tempfile::tempdir().unwrap();
        let projects = root.path().join("projects/black/bugs/1");
        std::fs::create_dir_all(&projects).unwrap();
        std::fs::write(projects.join("setup.sh"), "pip install -e .\n").unwrap();
        let tools = ToolConfig { scratch_dir: root.path().join("scratch"), ..ToolConfig::default() };
        (root, tools)
    }

    #[test]
    fn collects_both_versions_and_metadata() {
        let (root, tools) = fixture();
        let ctx = context(ScriptedShell::new(vec![
            Step::ok("").with_effect(populate("black", &[("black.py", "buggy"), ("tests/t.py", "t")])),
            Step::ok("").with_effect(populate("black", &[("black.py", "fixed")])),
            Step::ok("black bug 1\n"),
        ]));
        let bug = BugRef::new("black", "1");
        let out_root = root.path().join("complete_projects");

        let merged = Pipeline::new(&ctx, &tools)
            .collect_bug(&root.path().join("projects"), &bug, &out_root)
            .unwrap();

        let out = out_root.join("black/1");
        assert_eq!(merged, 3);
        assert_eq!(std::fs::read_to_string(out.join("buggy/black.py")).unwrap(), "buggy");
        assert_eq!(std::fs::read_to_string(out.join("fixed/black.py")).unwrap(), "fixed");
        assert!(out.join("buggy/tests/t.py").is_file());
        assert!(!out.join("fixed/tests").exists());
        assert_eq!(std::fs::read_to_string(out.join("bug_description.txt")).unwrap(), "black bug 1\n");
        assert!(out.join("setup.sh").is_file());
        assert!(!tools.scratch_dir.exists());
    }

    #[test]
    fn failed_checkout_aborts_bug_and_clears_scratch() {
        let (root, tools) = fixture();
        let ctx = context(ScriptedShell::new(vec![
            Step::ok("").with_effect(populate("black", &[("black.py", "buggy")])),
            Step::exit(2, "no fixed version").with_effect(populate("black", &[("half.py", "")])),
        ]));
        let bug = BugRef::new("black", "1");

        let err = Pipeline::new(&ctx, &tools)
            .collect_bug(&root.path().join("projects"), &bug, &root.path().join("out"))
            .unwrap_err();

        assert!(matches!(err, HarvestError::ToolFailed { exit_code: Some(2), .. }));
        assert!(!tools.scratch_dir.exists());
        assert!(!root.path().join("out/black/1/bug_description.txt").exists());
    }
}

//! Commit-based extraction: one checkout, then git drives the working tree
//! to each version's commit and the manifest files are copied out.

use std::path::{Path, PathBuf};

use super::checkout::ScratchDir;
use super::extract::{is_contained, SNAPSHOT_DOC_FILES};
use super::script::{write_requirements, write_run_test_script};
use super::snapshot::copy_preserving;
use super::Pipeline;
use crate::bugs::manifest::read_patch;
use crate::bugs::{BugInfo, BugRef, Version};
use crate::error::{HarvestError, Result};
use crate::ports::force_to_commit;

/// Bug-info file names, in lookup order.
pub const BUG_INFO_FILES: [&str; 2] = ["bug.info", "bugsinpy_bug.info"];
/// Unified diff of the fix.
pub const PATCH_FILE: &str = "bug_patch.txt";

/// Locates the bug-info file in a bug source directory.
fn bug_info_path(source_dir: &Path) -> PathBuf {
    BUG_INFO_FILES
        .iter()
        .map(|name| source_dir.join(name))
        .find(|path| path.is_file())
        .unwrap_or_else(|| source_dir.join(BUG_INFO_FILES[0]))
}

impl Pipeline<'_> {
    /// Extracts `bug` into `<out_root>/<project>/<bug>/` by checking out
    /// the project once and moving git between the two commits.
    ///
    /// Returns the number of files copied into both snapshots.
    ///
    /// # Errors
    ///
    /// Fails if the bug info lacks a commit id, the patch cannot be read,
    /// the checkout or any git step fails, or an output cannot be written.
    pub fn extract_at_commits(
        &self,
        projects_root: &Path,
        bug: &BugRef,
        out_root: &Path,
    ) -> Result<usize> {
        let source_dir = bug.source_dir(projects_root);
        let info_path = bug_info_path(&source_dir);
        let info = BugInfo::load(&info_path)?;
        let commits = [
            info.require(Version::Buggy.commit_key(), &info_path)?.to_string(),
            info.require(Version::Fixed.commit_key(), &info_path)?.to_string(),
        ];

        let out_dir = bug.output_dir(out_root);
        for version in Version::ALL {
            let dir = out_dir.join(version.dir_name());
            std::fs::create_dir_all(&dir).map_err(|e| HarvestError::io(&dir, e))?;
        }

        let tests = info.test_files();
        let mut files = read_patch(&source_dir.join(PATCH_FILE))?;
        files.extend(tests.iter().cloned());
        files.retain(|rel| {
            let keep = is_contained(rel);
            if !keep {
                tracing::warn!("{bug}: ignoring path outside the repository: {rel}");
            }
            keep
        });

        let scratch = ScratchDir::acquire(&self.tools().scratch_dir)?;
        let repo = self.checkout_tag(bug, Version::Buggy.checkout_tag(), &scratch)?;

        let mut copied = 0;
        for (version, commit) in Version::ALL.into_iter().zip(&commits) {
            tracing::info!("Moving {bug} to {version} commit {commit}");
            force_to_commit(self.ctx().git.as_ref(), &repo, commit).map_err(|e| {
                HarvestError::port(format!("git checkout {commit} in {}", repo.display()), e.as_ref())
            })?;
            let dest = out_dir.join(version.dir_name());
            for rel in &files {
                let src = repo.join(rel);
                if src.is_file() {
                    copy_preserving(&src, &dest.join(rel))?;
                    copied += 1;
                }
            }
            copied += copy_docs(&source_dir, &repo, &dest)?;
        }
        drop(scratch);

        self.describe_bug(bug, &out_dir)?;
        write_requirements(&out_dir)?;
        write_run_test_script(&out_dir, &tests)?;
        tracing::info!("Extracted {bug} at commits ({copied} files)");
        Ok(copied)
    }
}

/// Copies each documentation file from `source_dir`, else from `repo`.
fn copy_docs(source_dir: &Path, repo: &Path, dest: &Path) -> Result<usize> {
    let mut copied = 0;
    for name in SNAPSHOT_DOC_FILES {
        let found = [source_dir.join(name), repo.join(name)].into_iter().find(|p| p.is_file());
        if let Some(src) = found {
            tracing::debug!("Copying {name} from {}", src.display());
            copy_preserving(&src, &dest.join(name))?;
            copied += 1;
        }
    }
    Ok(copied)
}

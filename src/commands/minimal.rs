//! `bugharvest minimal` command.

use std::path::Path;

use super::{run_batch, unreadable};
use crate::bugs::{discover_bugs, BugRef};
use crate::config::ToolConfig;
use crate::context::ServiceContext;
use crate::error::Result;
use crate::pipeline::{extract_minimal, remove_tree, Pipeline};
use crate::report::RunReport;

/// Directories the `minimal` flow reads and writes.
#[derive(Debug, Clone, Copy)]
pub struct Roots<'a> {
    /// Bug definitions.
    pub projects_dir: &'a Path,
    /// Intermediate full snapshots.
    pub work_dir: &'a Path,
    /// Minimal snapshots.
    pub output_dir: &'a Path,
}

/// Collect every bug into the work tree, extract its minimal files, then
/// discard the full snapshot unless `keep_full` is set.
///
/// # Errors
///
/// Returns an error string if the work and output directories are the same
/// place, or the projects directory cannot be read.
pub fn run(
    ctx: &ServiceContext,
    tools: &ToolConfig,
    roots: &Roots<'_>,
    keep_full: bool,
) -> std::result::Result<RunReport, String> {
    if same_location(roots.work_dir, roots.output_dir) {
        return Err(format!(
            "--work-dir and --output-dir both resolve to {}; discarding the full tree would \
             delete the minimal output",
            roots.output_dir.display()
        ));
    }
    let bugs = discover_bugs(roots.projects_dir).map_err(|e| unreadable(roots.projects_dir, &e))?;
    let pipeline = Pipeline::new(ctx, tools);
    Ok(run_batch("minimal", ctx, bugs, |bug| process(&pipeline, roots, bug, keep_full)))
}

/// Compares resolved paths; paths that do not exist yet are made absolute
/// without touching the filesystem.
fn same_location(a: &Path, b: &Path) -> bool {
    let resolve = |p: &Path| std::fs::canonicalize(p).or_else(|_| std::path::absolute(p)).ok();
    match (resolve(a), resolve(b)) {
        (Some(a), Some(b)) => a == b,
        _ => a == b,
    }
}

fn process(pipeline: &Pipeline<'_>, roots: &Roots<'_>, bug: &BugRef, keep_full: bool) -> Result<()> {
    let full = bug.output_dir(roots.work_dir);
    let result = pipeline
        .collect_bug(roots.projects_dir, bug, roots.work_dir)
        .and_then(|_| extract_minimal(bug, &full, &bug.output_dir(roots.output_dir)))
        .map(drop);
    // The full tree goes even when collection failed halfway.
    let cleanup = if keep_full { Ok(false) } else { remove_tree(&full) };
    result.and(cleanup.map(drop))
}

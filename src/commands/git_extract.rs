//! `bugharvest git-extract` command.

use std::path::Path;

use super::{run_batch, unreadable};
use crate::bugs::discover_bugs;
use crate::config::ToolConfig;
use crate::context::ServiceContext;
use crate::pipeline::Pipeline;
use crate::report::RunReport;

/// Extract manifest files at each bug's commits, for every bug or only
/// those in `projects` when it is non-empty.
///
/// # Errors
///
/// Returns an error string if `projects_dir` cannot be read.
pub fn run(
    ctx: &ServiceContext,
    tools: &ToolConfig,
    projects_dir: &Path,
    output_dir: &Path,
    projects: &[String],
) -> Result<RunReport, String> {
    let bugs = discover_bugs(projects_dir)
        .map_err(|e| unreadable(projects_dir, &e))?
        .filter(|bug| projects.is_empty() || projects.contains(&bug.project));
    let pipeline = Pipeline::new(ctx, tools);
    Ok(run_batch("git-extract", ctx, bugs, |bug| {
        pipeline.extract_at_commits(projects_dir, bug, output_dir).map(drop)
    }))
}

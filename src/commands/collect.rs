//! `bugharvest collect` command.

use std::path::Path;

use super::{run_batch, unreadable};
use crate::bugs::discover_bugs;
use crate::config::ToolConfig;
use crate::context::ServiceContext;
use crate::pipeline::Pipeline;
use crate::report::RunReport;

/// Collect full buggy/fixed snapshots for every bug under `projects_dir`.
///
/// # Errors
///
/// Returns an error string if `projects_dir` cannot be read.
pub fn run(
    ctx: &ServiceContext,
    tools: &ToolConfig,
    projects_dir: &Path,
    output_dir: &Path,
) -> Result<RunReport, String> {
    let bugs = discover_bugs(projects_dir).map_err(|e| unreadable(projects_dir, &e))?;
    let pipeline = Pipeline::new(ctx, tools);
    Ok(run_batch("collect", ctx, bugs, |bug| {
        pipeline.collect_bug(projects_dir, bug, output_dir).map(drop)
    }))
}

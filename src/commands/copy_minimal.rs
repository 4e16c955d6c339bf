//! `bugharvest copy-minimal` command.

use std::path::Path;

use super::{run_batch, unreadable};
use crate::bugs::discover_snapshots;
use crate::context::ServiceContext;
use crate::pipeline::extract_minimal;
use crate::report::RunReport;

/// Extract minimal file sets from every `<project>/<bug>/` in `source_dir`.
///
/// No external tools run; only the clock port is used.
///
/// # Errors
///
/// Returns an error string if `source_dir` cannot be read.
pub fn run(ctx: &ServiceContext, source_dir: &Path, output_dir: &Path) -> Result<RunReport, String> {
    let bugs = discover_snapshots(source_dir).map_err(|e| unreadable(source_dir, &e))?;
    Ok(run_batch("copy-minimal", ctx, bugs, |bug| {
        extract_minimal(bug, &bug.output_dir(source_dir), &bug.output_dir(output_dir)).map(drop)
    }))
}

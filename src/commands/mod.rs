//! Command dispatch and handlers.

pub mod collect;
pub mod copy_minimal;
pub mod git_extract;
pub mod minimal;

use std::env;
use std::path::Path;

use crate::bugs::BugRef;
use crate::cassette::session::RecordingSession;
use crate::cli::{Cli, Command};
use crate::config::ToolConfig;
use crate::context::ServiceContext;
use crate::logging;
use crate::report::RunReport;

/// Directory under which port interactions are recorded, when set.
pub const RECORD_ENV: &str = "BUGHARVEST_RECORD";

/// Dispatch a parsed command line to its handler.
///
/// When `BUGHARVEST_RECORD` is set to a directory path, all port
/// interactions are recorded to per-port cassette files in a timestamped
/// subdirectory.
///
/// # Errors
///
/// Returns an error string if configuration is invalid or the batch cannot
/// run at all. Individual bug failures are logged and reported, not returned.
pub fn dispatch(cli: &Cli) -> Result<(), String> {
    logging::init(cli.global.verbose);
    let tools = ToolConfig::from_env()?.with_overrides(&cli.global.overrides());
    tracing::debug!("Tool configuration: {tools:?}");

    let (ctx, session) = match env::var(RECORD_ENV) {
        Ok(dir) if !dir.trim().is_empty() => {
            let session = RecordingSession::new(Path::new(&dir), cli.command.name())?;
            (ServiceContext::recording(&session), Some(session))
        }
        _ => (ServiceContext::live(), None),
    };

    let result = dispatch_with_context(&cli.command, &ctx, &tools);

    if let Some(session) = session {
        // Recorders are shared with the context until it is gone.
        drop(ctx);
        finish_recording(session)?;
    }

    result
}

/// Dispatch a command with the given service context and tool settings.
///
/// # Errors
///
/// Returns an error string if the command cannot start or its report cannot
/// be written.
pub fn dispatch_with_context(
    command: &Command,
    ctx: &ServiceContext,
    tools: &ToolConfig,
) -> Result<(), String> {
    let (report, report_path) = match command {
        Command::Collect { projects_dir, output_dir, report } => {
            (collect::run(ctx, tools, projects_dir, output_dir)?, report)
        }
        Command::Minimal { projects_dir, work_dir, output_dir, keep_full, report } => (
            minimal::run(
                ctx,
                tools,
                &minimal::Roots {
                    projects_dir: projects_dir.as_path(),
                    work_dir: work_dir.as_path(),
                    output_dir: output_dir.as_path(),
                },
                *keep_full,
            )?,
            report,
        ),
        Command::CopyMinimal { source_dir, output_dir, report } => {
            (copy_minimal::run(ctx, source_dir, output_dir)?, report)
        }
        Command::GitExtract { projects_dir, output_dir, projects, report } => {
            (git_extract::run(ctx, tools, projects_dir, output_dir, projects)?, report)
        }
    };

    if let Some(path) = report_path {
        report.write(path).map_err(|e| format!("failed to write report: {e}"))?;
        tracing::info!("Report written to {}", path.display());
    }
    Ok(())
}

/// Runs `process` for every bug, recording each outcome.
fn run_batch<I, F>(name: &str, ctx: &ServiceContext, bugs: I, mut process: F) -> RunReport
where
    I: IntoIterator<Item = BugRef>,
    F: FnMut(&BugRef) -> crate::error::Result<()>,
{
    let mut report = RunReport::start(name, ctx.clock.as_ref());
    for bug in bugs {
        tracing::info!("Processing {bug}");
        let result = process(&bug);
        report.record(&bug, result);
    }
    report.finish(ctx.clock.as_ref());
    report
}

/// Describes an unreadable input root.
fn unreadable(root: &Path, err: &std::io::Error) -> String {
    format!("cannot read {}: {err}", root.display())
}

/// Finish a recording session and print the output directory.
fn finish_recording(session: RecordingSession) -> Result<(), String> {
    let output_dir = session.finish()?;
    eprintln!("Recording saved to: {}", output_dir.display());
    Ok(())
}

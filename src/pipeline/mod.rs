//! Per-bug processing steps.
//!
//! [`Pipeline`] owns the steps that talk to external tools (checkout, info,
//! git); the pure filesystem steps are free functions in the submodules.
//! Every step returns [`crate::error::Result`]; the batch commands decide
//! whether a failure skips the bug or aborts the run.

pub mod checkout;
pub mod cleanup;
pub mod collect;
pub mod commit;
pub mod extract;
pub mod metadata;
pub mod script;
pub mod snapshot;

use crate::config::ToolConfig;
use crate::context::ServiceContext;
use crate::error::{HarvestError, Result};
use crate::ports::{Invocation, ShellOutput};

pub use checkout::ScratchDir;
pub use cleanup::remove_tree;
pub use extract::{copy_with_fallback, extract_minimal, CopyMode};
pub use snapshot::{copy_preserving, merge_tree};

/// Runs the external-tool steps for one bug at a time.
pub struct Pipeline<'a> {
    ctx: &'a ServiceContext,
    tools: &'a ToolConfig,
}

impl<'a> Pipeline<'a> {
    /// Creates a pipeline over the given ports and tool configuration.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext, tools: &'a ToolConfig) -> Self {
        Self { ctx, tools }
    }

    /// The port bundle this pipeline uses.
    #[must_use]
    pub fn ctx(&self) -> &'a ServiceContext {
        self.ctx
    }

    /// The tool configuration this pipeline uses.
    #[must_use]
    pub fn tools(&self) -> &'a ToolConfig {
        self.tools
    }

    /// Attaches the configured timeout to `invocation`.
    fn with_timeout(&self, invocation: Invocation) -> Invocation {
        invocation.timeout_secs(self.tools.timeout.map(|t| t.as_secs()))
    }

    /// Runs `invocation` and returns its output whatever the exit status.
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be spawned or times out.
    pub fn run_tool(&self, invocation: Invocation) -> Result<ShellOutput> {
        let invocation = self.with_timeout(invocation);
        tracing::info!("Running: {}", invocation.display());
        let output = self
            .ctx
            .shell
            .run(&invocation)
            .map_err(|e| HarvestError::port(invocation.display(), e.as_ref()))?;
        if output.timed_out {
            return Err(HarvestError::ToolTimedOut {
                program: invocation.program,
                secs: invocation.timeout_secs.unwrap_or_default(),
            });
        }
        Ok(output)
    }

    /// Runs `invocation` and fails unless it exits with status zero.
    ///
    /// # Errors
    ///
    /// Returns [`HarvestError::ToolFailed`] on a non-zero exit, or any error
    /// from [`Pipeline::run_tool`].
    pub fn run_checked(&self, invocation: Invocation) -> Result<ShellOutput> {
        let program = invocation.program.clone();
        let args = invocation.args.join(" ");
        let output = self.run_tool(invocation)?;
        if !output.success() {
            return Err(HarvestError::ToolFailed {
                program,
                args,
                exit_code: (output.exit_code >= 0).then_some(output.exit_code),
                stderr: output.stderr.trim().to_string(),
            });
        }
        Ok(output)
    }
}

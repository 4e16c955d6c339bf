//! Shell executor port for running external commands.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A structured external command: program plus an explicit argument vector.
///
/// Commands are never built by splitting a formatted string, so arguments
/// containing spaces reach the program intact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invocation {
    /// Program name or path.
    pub program: String,
    /// Arguments passed verbatim.
    pub args: Vec<String>,
    /// Working directory, `None` for the current directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<PathBuf>,
    /// Kill the process after this many seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Invocation {
    /// Starts an invocation of `program` with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into(), args: Vec::new(), cwd: None, timeout_secs: None }
    }

    /// Appends one argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends several arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Runs the command from `dir`.
    #[must_use]
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Sets a timeout in seconds.
    #[must_use]
    pub fn timeout_secs(mut self, secs: Option<u64>) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Human-readable form used in log lines.
    #[must_use]
    pub fn display(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }
}

/// The output of a command execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellOutput {
    /// The exit code of the process; `-1` when killed by a signal.
    pub exit_code: i32,
    /// The captured standard output.
    pub stdout: String,
    /// The captured standard error.
    pub stderr: String,
    /// Whether the process was killed because it hit its timeout.
    #[serde(default)]
    pub timed_out: bool,
}

impl ShellOutput {
    /// Returns `true` when the process exited with status zero.
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == 0 && !self.timed_out
    }
}

/// Executes external commands.
///
/// Abstracting execution allows deterministic replay by recording and
/// replaying command outputs, and lets tests fake the checkout tool.
pub trait ShellExecutor: Send + Sync {
    /// Runs the invocation to completion and returns its output.
    ///
    /// A non-zero exit is reported through [`ShellOutput::exit_code`], not
    /// as an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be spawned or waited on.
    fn run(
        &self,
        invocation: &Invocation,
    ) -> Result<ShellOutput, Box<dyn std::error::Error + Send + Sync>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_keeps_arguments_with_spaces_whole() {
        let inv = Invocation::new("bugsinpy-checkout")
            .args(["-p", "black", "-i", "3"])
            .arg("-w")
            .arg("/tmp/my scratch")
            .timeout_secs(Some(30));
        assert_eq!(inv.args.len(), 6);
        assert_eq!(inv.args[5], "/tmp/my scratch");
        assert_eq!(inv.timeout_secs, Some(30));
        assert_eq!(inv.display(), "bugsinpy-checkout -p black -i 3 -w /tmp/my scratch");
    }

    #[test]
    fn success_requires_zero_exit_and_no_timeout() {
        let ok = ShellOutput {
            exit_code: 0,
            stdout: String::new(),
            stderr: String::new(),
            timed_out: false,
        };
        assert!(ok.success());
        assert!(!ShellOutput { exit_code: 1, ..ok.clone() }.success());
        assert!(!ShellOutput { timed_out: true, ..ok }.success());
    }
}

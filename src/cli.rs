//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::ToolOverrides;

/// Top-level CLI parser for `bugharvest`.
#[derive(Debug, Parser)]
#[command(
    name = "bugharvest",
    version,
    about = "Collect buggy/fixed snapshots and minimal file sets for bug datasets"
)]
pub struct Cli {
    /// Tool locations and logging.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Flags shared by every subcommand.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalArgs {
    /// Checkout tool to invoke (default: bugsinpy-checkout).
    #[arg(long, global = true, value_name = "PROGRAM")]
    pub checkout_bin: Option<String>,

    /// Info tool to invoke (default: bugsinpy-info).
    #[arg(long, global = true, value_name = "PROGRAM")]
    pub info_bin: Option<String>,

    /// Scratch directory for checkouts (default: /tmp/bugsinpy_temp).
    #[arg(long, global = true, value_name = "DIR")]
    pub scratch_dir: Option<PathBuf>,

    /// Kill an external tool after this many seconds (0 disables).
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl GlobalArgs {
    /// The tool settings given on the command line.
    #[must_use]
    pub fn overrides(&self) -> ToolOverrides {
        ToolOverrides {
            checkout_bin: self.checkout_bin.clone(),
            info_bin: self.info_bin.clone(),
            scratch_dir: self.scratch_dir.clone(),
            timeout_secs: self.timeout_secs,
        }
    }
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check out both versions of every bug and harvest their metadata.
    Collect {
        /// Root holding `<project>/bugs/<bug-id>/`.
        #[arg(long, default_value = "projects")]
        projects_dir: PathBuf,
        /// Where full snapshots are written.
        #[arg(long, default_value = "complete_projects")]
        output_dir: PathBuf,
        /// Write a JSON run report here.
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Collect every bug, keep only its minimal file set, discard the rest.
    Minimal {
        /// Root holding `<project>/bugs/<bug-id>/`.
        #[arg(long, default_value = "projects")]
        projects_dir: PathBuf,
        /// Intermediate full-snapshot tree.
        #[arg(long, default_value = "project_minimal")]
        work_dir: PathBuf,
        /// Where minimal snapshots are written.
        #[arg(long, default_value = "project_minimal_copy")]
        output_dir: PathBuf,
        /// Keep the intermediate full snapshots.
        #[arg(long)]
        keep_full: bool,
        /// Write a JSON run report here.
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Extract minimal file sets from an existing full-snapshot tree.
    CopyMinimal {
        /// Tree holding `<project>/<bug-id>/{buggy,fixed}/`.
        #[arg(long, default_value = "project_minimal")]
        source_dir: PathBuf,
        /// Where minimal snapshots are written.
        #[arg(long, default_value = "project_base_minimal")]
        output_dir: PathBuf,
        /// Write a JSON run report here.
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Check out once per bug, then use git to visit each commit.
    GitExtract {
        /// Root holding `<project>/bugs/<bug-id>/`.
        #[arg(long, default_value = "projects")]
        projects_dir: PathBuf,
        /// Where minimal snapshots are written.
        #[arg(long, default_value = "project_base_minimal")]
        output_dir: PathBuf,
        /// Only process this project (repeatable).
        #[arg(long = "project", value_name = "NAME")]
        projects: Vec<String>,
        /// Write a JSON run report here.
        #[arg(long)]
        report: Option<PathBuf>,
    },
}

impl Command {
    /// Subcommand name as typed on the command line.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Command::Collect { .. } => "collect",
            Command::Minimal { .. } => "minimal",
            Command::CopyMinimal { .. } => "copy-minimal",
            Command::GitExtract { .. } => "git-extract",
        }
    }
}

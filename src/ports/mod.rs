//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the pipeline and an external
//! system (time, git, external tools). Implementations live in
//! `src/adapters/`.

pub mod clock;
pub mod git;
pub mod shell;

pub use clock::Clock;
pub use git::{force_to_commit, GitRepo};
pub use shell::{Invocation, ShellExecutor, ShellOutput};

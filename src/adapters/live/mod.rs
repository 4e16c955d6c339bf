//! Live adapters for real external interactions.

pub mod clock;
pub mod git;
pub mod shell;

pub use clock::LiveClock;
pub use git::LiveGitRepo;
pub use shell::LiveShellExecutor;

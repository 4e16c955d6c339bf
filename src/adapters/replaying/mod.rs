//! Replaying adapters that serve recorded interactions.

pub mod clock;
pub mod git;
pub mod shell;

use std::sync::Mutex;

use crate::cassette::replayer::CassetteReplayer;

pub use clock::ReplayingClock;
pub use git::ReplayingGitRepo;
pub use shell::ReplayingShellExecutor;

/// Pull the next recorded output for `port::method`.
pub(crate) fn next_output(
    replayer: &Mutex<CassetteReplayer>,
    port: &str,
    method: &str,
) -> serde_json::Value {
    let mut guard = replayer.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    guard.next_interaction(port, method).output
}

/// Decode a recorded `{"Ok": v}` / `{"Err": msg}` output.
pub(crate) fn replay_result<T: serde::de::DeserializeOwned>(
    output: &serde_json::Value,
    context: &str,
) -> Result<T, Box<dyn std::error::Error + Send + Sync>> {
    if let Some(err) = output.get("Err") {
        let msg = err.as_str().unwrap_or("unknown error").to_string();
        return Err(msg.into());
    }
    let value = output.get("Ok").unwrap_or(output);
    serde_json::from_value(value.clone())
        .map_err(|e| format!("{context}: failed to deserialize: {e}").into())
}

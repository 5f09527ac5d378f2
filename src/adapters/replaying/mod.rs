//! Replaying adapters that serve recorded interactions from a cassette.

pub mod git;
pub mod shell;

use std::sync::Mutex;

pub use git::ReplayingGitRepo;
pub use shell::ReplayingShellExecutor;

use crate::cassette::replayer::CassetteReplayer;
use crate::error::PortError;

/// Takes the output of the next recorded `port::method` interaction.
pub(crate) fn next_output(
    replayer: &Mutex<CassetteReplayer>,
    port: &str,
    method: &str,
) -> Result<serde_json::Value, PortError> {
    let mut guard = replayer.lock().map_err(|_| "replayer lock poisoned")?;
    Ok(guard.next_interaction(port, method)?.output.clone())
}

/// Extracts a Result from a cassette output JSON value.
///
/// Mirror of `recording::record_result`: expects `{"ok": <value>}` or
/// `{"err": "message"}`.
pub(crate) fn extract_result<T: serde::de::DeserializeOwned>(
    output: &serde_json::Value,
    context: &str,
) -> Result<T, PortError> {
    if let Some(err) = output.get("err") {
        let msg = err.as_str().unwrap_or("unknown error").to_string();
        return Err(msg.into());
    }
    let value = output.get("ok").unwrap_or(output);
    serde_json::from_value(value.clone())
        .map_err(|e| format!("{context}: failed to deserialize: {e}").into())
}

#[cfg(test)]
pub(crate) fn replayer_of(
    interactions: Vec<crate::cassette::format::Interaction>,
) -> CassetteReplayer {
    use crate::cassette::format::Cassette;

    let cassette = Cassette {
        name: "test".into(),
        recorded_at: chrono::Utc::now(),
        interactions,
    };
    CassetteReplayer::new(&cassette)
}

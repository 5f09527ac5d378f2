//! Recording adapters that capture interactions to a cassette.

pub mod git;
pub mod shell;

use std::sync::{Arc, Mutex};

use serde::Serialize;

pub use git::RecordingGitRepo;
pub use shell::RecordingShellExecutor;

use crate::cassette::recorder::CassetteRecorder;

/// Record a `Result<T, E>` interaction using the ok/err JSON convention.
///
/// Mirror of `replaying::extract_result`:
/// - `Ok(v)` is serialized as `{"ok": v}`
/// - `Err(e)` is serialized as `{"err": e.to_string()}`
///
/// Values that fail to serialize are recorded as `null`; a poisoned
/// recorder drops the interaction with a warning.
pub(crate) fn record_result<T, E, I>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: &I,
    result: &Result<T, E>,
) where
    T: Serialize,
    E: std::fmt::Display,
    I: Serialize,
{
    let input_json = serde_json::to_value(input).unwrap_or_default();
    let output_json = match result {
        Ok(v) => serde_json::json!({ "ok": serde_json::to_value(v).unwrap_or_default() }),
        Err(e) => serde_json::json!({ "err": e.to_string() }),
    };

    match recorder.lock() {
        Ok(mut guard) => guard.record(port, method, input_json, output_json),
        Err(_) => tracing::warn!(
            port,
            method,
            "cassette recorder poisoned; interaction dropped"
        ),
    }
}

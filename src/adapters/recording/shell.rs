//! Recording adapter for the `ShellExecutor` port.

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::error::PortError;
use crate::ports::{ShellExecutor, ShellOutput};

/// Records shell interactions while delegating to an inner implementation.
pub struct RecordingShellExecutor {
    inner: Box<dyn ShellExecutor>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingShellExecutor {
    /// Creates a new recording shell executor wrapping the given implementation.
    pub fn new(inner: Box<dyn ShellExecutor>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct CommandInput<'a> {
    command: &'a str,
    cwd: String,
    timeout_secs: u64,
}

impl ShellExecutor for RecordingShellExecutor {
    fn run(&self, command: &str, cwd: &Path, timeout: Duration) -> Result<ShellOutput, PortError> {
        let result = self.inner.run(command, cwd, timeout);
        let input = CommandInput {
            command,
            cwd: cwd.display().to_string(),
            timeout_secs: timeout.as_secs(),
        };
        record_result(&self.recorder, "shell", "run", &input, &result);
        result
    }
}

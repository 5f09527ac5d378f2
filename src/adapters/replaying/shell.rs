//! Replaying adapter for the `ShellExecutor` port.

use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use super::{extract_result, next_output};
use crate::cassette::replayer::CassetteReplayer;
use crate::error::PortError;
use crate::ports::shell::{ShellExecutor, ShellOutput};

/// Replays recorded shell command results from a cassette.
pub struct ReplayingShellExecutor {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingShellExecutor {
    /// Creates a new replaying shell executor from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self {
            replayer: Mutex::new(replayer),
        }
    }
}

impl ShellExecutor for ReplayingShellExecutor {
    fn run(
        &self,
        _command: &str,
        _cwd: &Path,
        _timeout: Duration,
    ) -> Result<ShellOutput, PortError> {
        let output = next_output(&self.replayer, "shell", "run")?;
        extract_result(&output, "shell::run")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::replaying::replayer_of;
    use crate::cassette::format::Interaction;
    use serde_json::json;

    fn run_interaction(output: serde_json::Value) -> Interaction {
        Interaction {
            seq: 0,
            port: "shell".into(),
            method: "run".into(),
            input: json!({"command": "npm install", "cwd": "frontend"}),
            output,
        }
    }

    #[test]
    fn replays_recorded_output() {
        let shell = ReplayingShellExecutor::new(replayer_of(vec![run_interaction(
            json!({"ok": {"exit_code": 1, "stdout": "", "stderr": "npm ERR!"}}),
        )]));

        let result = shell
            .run("npm install", Path::new("frontend"), Duration::ZERO)
            .unwrap();

        assert_eq!(result.exit_code, 1);
        assert_eq!(result.stderr, "npm ERR!");
    }

    #[test]
    fn replays_recorded_error() {
        let shell = ReplayingShellExecutor::new(replayer_of(vec![run_interaction(
            json!({"err": "`npm install`: timed out after 300s"}),
        )]));

        let err = shell
            .run("npm install", Path::new("frontend"), Duration::ZERO)
            .unwrap_err();

        assert!(err.to_string().contains("timed out"));
    }

    #[test]
    fn exhausted_cassette_is_an_error() {
        let shell = ReplayingShellExecutor::new(replayer_of(vec![]));
        assert!(shell.run("ls", Path::new("."), Duration::ZERO).is_err());
    }
}

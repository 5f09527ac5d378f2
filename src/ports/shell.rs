//! Shell executor port for running installer commands.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::PortError;

/// The output of a shell command execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellOutput {
    /// The exit code of the process (`-1` when killed by a signal).
    pub exit_code: i32,
    /// The captured standard output.
    pub stdout: String,
    /// The captured standard error.
    pub stderr: String,
}

impl ShellOutput {
    /// Returns `true` when the command exited with status zero.
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Executes shell commands.
///
/// Abstracting shell execution allows installer steps to be recorded and
/// replayed without running package managers.
pub trait ShellExecutor: Send + Sync {
    /// Runs a command string in the system shell inside `cwd`, waiting at
    /// most `timeout` for it to finish.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be spawned or does not finish
    /// before the timeout (the child is killed in that case).
    fn run(&self, command: &str, cwd: &Path, timeout: Duration) -> Result<ShellOutput, PortError>;
}

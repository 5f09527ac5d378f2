//! Live shell executor using `std::process::Command`.

use std::path::Path;
use std::process::Command;
use std::time::Duration;

use super::process::run_with_timeout;
use crate::error::PortError;
use crate::ports::shell::{ShellExecutor, ShellOutput};

/// Live shell executor that runs commands via the system shell.
pub struct LiveShellExecutor;

impl ShellExecutor for LiveShellExecutor {
    fn run(&self, command: &str, cwd: &Path, timeout: Duration) -> Result<ShellOutput, PortError> {
        tracing::debug!(command, cwd = %cwd.display(), "running shell command");
        let mut cmd = shell_command(command);
        cmd.current_dir(cwd);
        run_with_timeout(&mut cmd, timeout)
            .map_err(|e| format!("`{command}`: {e}").into())
    }
}

#[cfg(windows)]
fn shell_command(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(command);
    cmd
}

#[cfg(not(windows))]
fn shell_command(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    cmd
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(10);

    #[test]
    fn runs_echo_command() {
        let shell = LiveShellExecutor;
        let result = shell.run("echo hello", Path::new("."), TIMEOUT).unwrap();

        assert!(result.success());
        assert_eq!(result.stdout.trim(), "hello");
        assert!(result.stderr.is_empty());
    }

    #[test]
    fn captures_exit_code() {
        let shell = LiveShellExecutor;
        let result = shell.run("exit 42", Path::new("."), TIMEOUT).unwrap();

        assert_eq!(result.exit_code, 42);
    }

    #[test]
    fn runs_inside_working_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("marker.txt"), "x").unwrap();

        let shell = LiveShellExecutor;
        let result = shell.run("ls", dir.path(), TIMEOUT).unwrap();

        assert!(result.stdout.contains("marker.txt"));
    }
}

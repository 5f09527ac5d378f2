//! Live git adapter using `git` CLI commands.

use std::path::Path;
use std::process::Command;
use std::time::Duration;

use super::process::run_with_timeout;
use crate::error::PortError;
use crate::ports::git::GitRepo;

/// Live git adapter that shells out to the `git` CLI.
pub struct LiveGitRepo {
    timeout: Duration,
}

impl LiveGitRepo {
    /// Creates an adapter whose git invocations are killed after `timeout`.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn git(&self, dir: &Path, args: &[&str]) -> Result<String, PortError> {
        let mut cmd = Command::new("git");
        cmd.args(args).current_dir(dir);
        let output = run_with_timeout(&mut cmd, self.timeout)
            .map_err(|e| format!("git {} failed: {e}", args.join(" ")))?;
        if !output.success() {
            let stderr = output.stderr.trim();
            return Err(format!("git {} failed: {stderr}", args.join(" ")).into());
        }
        Ok(output.stdout)
    }
}

impl GitRepo for LiveGitRepo {
    fn init(&self, dir: &Path) -> Result<(), PortError> {
        self.git(dir, &["init", "--quiet"]).map(|_| ())
    }

    fn add_all(&self, dir: &Path) -> Result<(), PortError> {
        self.git(dir, &["add", "--all", "."]).map(|_| ())
    }

    fn commit(&self, dir: &Path, message: &str) -> Result<String, PortError> {
        self.git(dir, &["commit", "--quiet", "-m", message])?;
        Ok(self.git(dir, &["rev-parse", "HEAD"])?.trim().to_string())
    }
}

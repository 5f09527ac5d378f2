//! Replaying adapter for the `GitRepo` port.

use std::path::Path;
use std::sync::Mutex;

use super::{extract_result, next_output};
use crate::cassette::replayer::CassetteReplayer;
use crate::error::PortError;
use crate::ports::git::GitRepo;

/// Replays recorded git operations from a cassette.
pub struct ReplayingGitRepo {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingGitRepo {
    /// Creates a new replaying git repo from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self {
            replayer: Mutex::new(replayer),
        }
    }
}

impl GitRepo for ReplayingGitRepo {
    fn init(&self, _dir: &Path) -> Result<(), PortError> {
        let output = next_output(&self.replayer, "git", "init")?;
        extract_result(&output, "git::init")
    }

    fn add_all(&self, _dir: &Path) -> Result<(), PortError> {
        let output = next_output(&self.replayer, "git", "add_all")?;
        extract_result(&output, "git::add_all")
    }

    fn commit(&self, _dir: &Path, _message: &str) -> Result<String, PortError> {
        let output = next_output(&self.replayer, "git", "commit")?;
        extract_result(&output, "git::commit")
    }
}

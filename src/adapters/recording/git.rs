//! Recording adapter for the `GitRepo` port.

use std::path::Path;
use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::error::PortError;
use crate::ports::GitRepo;

/// Records git interactions while delegating to an inner implementation.
pub struct RecordingGitRepo {
    inner: Box<dyn GitRepo>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingGitRepo {
    /// Creates a new recording git repo wrapping the given implementation.
    pub fn new(inner: Box<dyn GitRepo>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct DirInput {
    dir: String,
}

#[derive(Serialize)]
struct CommitInput<'a> {
    dir: String,
    message: &'a str,
}

impl GitRepo for RecordingGitRepo {
    fn init(&self, dir: &Path) -> Result<(), PortError> {
        let result = self.inner.init(dir);
        let input = DirInput {
            dir: dir.display().to_string(),
        };
        record_result(&self.recorder, "git", "init", &input, &result);
        result
    }

    fn add_all(&self, dir: &Path) -> Result<(), PortError> {
        let result = self.inner.add_all(dir);
        let input = DirInput {
            dir: dir.display().to_string(),
        };
        record_result(&self.recorder, "git", "add_all", &input, &result);
        result
    }

    fn commit(&self, dir: &Path, message: &str) -> Result<String, PortError> {
        let result = self.inner.commit(dir, message);
        let input = CommitInput {
            dir: dir.display().to_string(),
            message,
        };
        record_result(&self.recorder, "git", "commit", &input, &result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::replaying::{replayer_of, ReplayingGitRepo};
    use crate::cassette::format::{Cassette, Interaction};
    use serde_json::json;

    #[test]
    fn records_errors_with_err_key() {
        let dir = tempfile::tempdir().unwrap();
        let cassette_path = dir.path().join("git.cassette.yaml");
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(&cassette_path, "test")));

        let failing = ReplayingGitRepo::new(replayer_of(vec![Interaction {
            seq: 0,
            port: "git".into(),
            method: "init".into(),
            input: json!({}),
            output: json!({"err": "git: command not found"}),
        }]));

        {
            let git = RecordingGitRepo::new(Box::new(failing), Arc::clone(&recorder));
            assert!(git.init(Path::new("/work/app")).is_err());
        }

        let recorder = Arc::try_unwrap(recorder).unwrap().into_inner().unwrap();
        recorder.finish().unwrap();

        let content = std::fs::read_to_string(&cassette_path).unwrap();
        let cassette = Cassette::from_yaml(&content).unwrap();
        assert_eq!(cassette.interactions[0].method, "init");
        assert_eq!(cassette.interactions[0].input["dir"], "/work/app");
        assert_eq!(
            cassette.interactions[0].output["err"],
            "git: command not found"
        );
    }
}

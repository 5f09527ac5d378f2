//! Service context bundling all port trait objects.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::adapters::live::clock::LiveClock;
use crate::adapters::live::filesystem::LiveFileSystem;
use crate::adapters::live::git::LiveGitRepo;
use crate::adapters::live::shell::LiveShellExecutor;
use crate::adapters::recording::{RecordingGitRepo, RecordingShellExecutor};
use crate::adapters::replaying::{ReplayingGitRepo, ReplayingShellExecutor};
use crate::cassette::format::Cassette;
use crate::cassette::recorder::CassetteRecorder;
use crate::cassette::replayer::CassetteReplayer;
use crate::config::DEFAULT_TIMEOUT;
use crate::ports::clock::Clock;
use crate::ports::filesystem::FileSystem;
use crate::ports::git::GitRepo;
use crate::ports::shell::ShellExecutor;

/// Bundles all port trait objects into a single context.
///
/// Each field provides access to one external boundary. Constructors
/// wire up different adapter implementations (live, recording, replaying).
pub struct ServiceContext {
    /// Clock for timestamps.
    pub clock: Box<dyn Clock>,
    /// Filesystem for reading the template and writing the project.
    pub fs: Box<dyn FileSystem>,
    /// Git for initializing the generated repository.
    pub git: Box<dyn GitRepo>,
    /// Shell executor for dependency installers.
    pub shell: Box<dyn ShellExecutor>,
    /// Cassette recorder shared with the recording adapters.
    recorder: Option<Arc<Mutex<CassetteRecorder>>>,
}

impl ServiceContext {
    /// Creates a live context with real adapters for every port.
    #[must_use]
    pub fn live(timeout: Duration) -> Self {
        Self {
            clock: Box::new(LiveClock),
            fs: Box::new(LiveFileSystem),
            git: Box::new(LiveGitRepo::new(timeout)),
            shell: Box::new(LiveShellExecutor),
            recorder: None,
        }
    }

    /// Creates a context from explicit adapters.
    #[must_use]
    pub fn new(
        fs: Box<dyn FileSystem>,
        shell: Box<dyn ShellExecutor>,
        git: Box<dyn GitRepo>,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            clock,
            fs,
            git,
            shell,
            recorder: None,
        }
    }

    /// Creates a live context that also records every git and shell call.
    ///
    /// The cassette is written to `path` when [`ServiceContext::finish`] is
    /// called or the context is dropped. This is the developer-only
    /// mechanism behind the `SCAFFOLD_RECORD` env var.
    #[must_use]
    pub fn recording(path: &Path, timeout: Duration) -> Self {
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(path, "scaffold-session")));
        Self {
            clock: Box::new(LiveClock),
            fs: Box::new(LiveFileSystem),
            git: Box::new(RecordingGitRepo::new(
                Box::new(LiveGitRepo::new(timeout)),
                Arc::clone(&recorder),
            )),
            shell: Box::new(RecordingShellExecutor::new(
                Box::new(LiveShellExecutor),
                Arc::clone(&recorder),
            )),
            recorder: Some(recorder),
        }
    }

    /// Creates a context whose git and shell calls are served from a
    /// cassette file; filesystem and clock stay live.
    ///
    /// Git and shell each get their own replayer so their cursors are
    /// independent.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            format!("Failed to read cassette file {}: {e}", path.display())
        })?;
        let cassette = Cassette::from_yaml(&content).map_err(|e| {
            format!("Failed to parse cassette file {}: {e}", path.display())
        })?;

        let mut ctx = Self::live(DEFAULT_TIMEOUT);
        let git = CassetteReplayer::new(&cassette);
        let shell = CassetteReplayer::new(&cassette);
        ctx.git = Box::new(ReplayingGitRepo::new(git));
        ctx.shell = Box::new(ReplayingShellExecutor::new(shell));
        Ok(ctx)
    }

    /// Replaces the filesystem adapter.
    #[must_use]
    pub fn with_filesystem(mut self, fs: Box<dyn FileSystem>) -> Self {
        self.fs = fs;
        self
    }

    /// Writes the cassette of a recording context and returns its path.
    ///
    /// Returns `Ok(None)` for contexts that are not recording.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette cannot be written.
    pub fn finish(mut self) -> Result<Option<PathBuf>, String> {
        let Some(recorder) = self.recorder.take() else {
            return Ok(None);
        };
        // Release the adapters' references before unwrapping the recorder.
        self.git = Box::new(LiveGitRepo::new(DEFAULT_TIMEOUT));
        self.shell = Box::new(LiveShellExecutor);
        write_cassette(recorder).map(Some)
    }
}

impl Drop for ServiceContext {
    fn drop(&mut self) {
        if let Some(recorder) = self.recorder.take() {
            self.git = Box::new(LiveGitRepo::new(DEFAULT_TIMEOUT));
            self.shell = Box::new(LiveShellExecutor);
            if let Err(e) = write_cassette(recorder) {
                tracing::warn!("failed to write cassette: {e}");
            }
        }
    }
}

fn write_cassette(recorder: Arc<Mutex<CassetteRecorder>>) -> Result<PathBuf, String> {
    let recorder = Arc::try_unwrap(recorder)
        .map_err(|_| "Recording adapters still hold the recorder".to_string())?
        .into_inner()
        .map_err(|e| format!("Recorder lock poisoned: {e}"))?;
    recorder
        .finish()
        .map_err(|e| format!("Failed to write cassette: {e}"))
}

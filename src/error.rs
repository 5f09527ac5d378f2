//! Error taxonomy for a scaffold run.
//!
//! Every variant of [`ScaffoldError`] is fatal. Failures of optional
//! post-generation steps are not errors: they are collected as
//! [`OptionalStepWarning`] values in the run report.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::scaffold::Stage;

/// Boxed error type returned across port boundaries.
pub type PortError = Box<dyn std::error::Error + Send + Sync>;

/// A fatal error that aborts the scaffold run.
#[derive(Debug, Error)]
pub enum ScaffoldError {
    /// The template root does not exist or is not a directory.
    #[error("template source not found: {} is not a directory", path.display())]
    SourceNotFound {
        /// The path that was expected to be the template root.
        path: PathBuf,
    },

    /// The project name is still invalid after sanitization.
    #[error("invalid project name {name:?}: {reason}")]
    InvalidName {
        /// The name that failed validation.
        name: String,
        /// Why the name was rejected.
        reason: String,
    },

    /// The target directory exists and already contains files.
    #[error("target directory is not empty: {} (pass --force to write into it anyway)", path.display())]
    TargetConflict {
        /// The target directory.
        path: PathBuf,
    },

    /// The target directory is the template root or lies inside it.
    #[error(
        "target directory {} is inside the template source {}; choose a target outside it",
        path.display(),
        template.display()
    )]
    TargetInsideSource {
        /// The target directory.
        path: PathBuf,
        /// The template root.
        template: PathBuf,
    },

    /// A template file could not be read while collecting.
    #[error("failed to read template file {}: {source}", path.display())]
    ReadFailure {
        /// The file that could not be read.
        path: PathBuf,
        /// The underlying port error.
        source: PortError,
    },

    /// A file could not be written into the target.
    #[error(
        "failed to write {}: {source}; the target directory may be partially populated and should be removed by hand",
        path.display()
    )]
    WriteFailure {
        /// The target file that could not be written.
        path: PathBuf,
        /// The underlying port error.
        source: PortError,
    },

    /// The template manifest could not be read or parsed.
    #[error("invalid template manifest {}: {message}", path.display())]
    Manifest {
        /// Path of the manifest file.
        path: PathBuf,
        /// Parser or I/O message.
        message: String,
    },

    /// Reading an answer from the terminal failed.
    #[error("failed to read from the terminal: {0}")]
    Prompt(#[from] std::io::Error),
}

/// A fatal error together with the pipeline stage it stopped.
#[derive(Debug, Error)]
#[error("scaffold failed while {stage}: {source}")]
pub struct StageError {
    /// Stage the run was in.
    pub stage: Stage,
    /// What went wrong.
    pub source: ScaffoldError,
}

/// A non-fatal failure of an optional post-generation step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionalStepWarning {
    /// Short name of the step (e.g. `git`, `install:frontend`).
    pub step: String,
    /// What went wrong.
    pub message: String,
}

impl OptionalStepWarning {
    /// Creates a warning for the given step.
    pub fn new(step: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            step: step.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for OptionalStepWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.step, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_failure_mentions_manual_cleanup() {
        let err = ScaffoldError::WriteFailure {
            path: PathBuf::from("/tmp/out/README.md"),
            source: "disk full".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/tmp/out/README.md"));
        assert!(msg.contains("disk full"));
        assert!(msg.contains("removed by hand"));
    }

    #[test]
    fn stage_error_names_stage_and_cause() {
        let err = StageError {
            stage: Stage::Materializing,
            source: ScaffoldError::TargetConflict {
                path: PathBuf::from("blog"),
            },
        };
        assert_eq!(
            err.to_string(),
            "scaffold failed while materializing: target directory is not empty: blog \
             (pass --force to write into it anyway)"
        );
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn warning_display_includes_step() {
        let warning = OptionalStepWarning::new("install:frontend", "npm exited with 1");
        assert_eq!(warning.to_string(), "install:frontend: npm exited with 1");
    }
}

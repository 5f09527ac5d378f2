//! Pipeline stages of a scaffold run.

use std::fmt;

/// Where a scaffold run is. Runs move forward through the stages in order;
/// `Failed` is reachable from any stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Reading the template tree.
    Collecting,
    /// Replacing the template name in text files.
    Substituting,
    /// Building the write plan.
    Planning,
    /// Writing files into the target.
    Materializing,
    /// Running the optional post-generation steps.
    Initializing,
    /// Finished successfully.
    Done,
    /// Aborted by a fatal error.
    Failed,
}

impl Stage {
    /// The stage that follows this one on success.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Collecting => Self::Substituting,
            Self::Substituting => Self::Planning,
            Self::Planning => Self::Materializing,
            Self::Materializing => Self::Initializing,
            Self::Initializing | Self::Done => Self::Done,
            Self::Failed => Self::Failed,
        }
    }

    /// Progress line shown when the stage starts.
    #[must_use]
    pub fn headline(self) -> &'static str {
        match self {
            Self::Collecting => "Collecting template files",
            Self::Substituting => "Renaming project references",
            Self::Planning => "Planning output",
            Self::Materializing => "Writing project files",
            Self::Initializing => "Initializing project",
            Self::Done => "Project created",
            Self::Failed => "Scaffolding failed",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Collecting => "collecting",
            Self::Substituting => "substituting",
            Self::Planning => "planning",
            Self::Materializing => "materializing",
            Self::Initializing => "initializing",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

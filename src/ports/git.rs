//! Git repository port for initializing the generated project.

use std::path::Path;

use crate::error::PortError;

/// Creates a repository and its first commit.
///
/// Abstracting git access allows the initializer to be tested and replayed
/// without a `git` binary.
pub trait GitRepo: Send + Sync {
    /// Runs `git init` in `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if git is missing or the command fails.
    fn init(&self, dir: &Path) -> Result<(), PortError>;

    /// Stages every file in the working tree of `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if staging fails.
    fn add_all(&self, dir: &Path) -> Result<(), PortError>;

    /// Creates a commit with `message` and returns its hash.
    ///
    /// # Errors
    ///
    /// Returns an error if the commit fails (e.g. no author identity).
    fn commit(&self, dir: &Path, message: &str) -> Result<String, PortError>;
}

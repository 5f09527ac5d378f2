//! Filesystem port for reading the template and writing the generated project.

use std::path::{Path, PathBuf};

use crate::error::PortError;

/// One entry produced while walking a directory tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkEntry {
    /// Path relative to the walk root.
    pub relative: PathBuf,
    /// Whether the entry is a directory.
    pub is_dir: bool,
    /// Unix permission bits, when the platform reports them.
    pub mode: Option<u32>,
}

/// Predicate deciding whether a walk entry is kept. Rejected directories
/// are not descended into.
pub type WalkFilter<'a> = &'a dyn Fn(&WalkEntry) -> bool;

/// Iterator over the files found by [`FileSystem::walk`].
pub type WalkIter<'a> = Box<dyn Iterator<Item = Result<WalkEntry, PortError>> + 'a>;

/// Provides filesystem access for the scaffold pipeline.
///
/// Abstracting the filesystem lets the whole pipeline run against an
/// in-memory tree in tests and dry runs.
pub trait FileSystem: Send + Sync {
    /// Reads the entire contents of a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or cannot be read.
    fn read(&self, path: &Path) -> Result<Vec<u8>, PortError>;

    /// Reads the entire contents of a file as a UTF-8 string.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or is not valid UTF-8.
    fn read_to_string(&self, path: &Path) -> Result<String, PortError> {
        let bytes = self.read(path)?;
        Ok(String::from_utf8(bytes)?)
    }

    /// Writes `contents` to `path` so that a reader never observes a
    /// partially written file. Parent directories are created as needed and
    /// `mode` is applied when given.
    ///
    /// # Errors
    ///
    /// Returns an error if the write or the final rename fails.
    fn write_atomic(&self, path: &Path, contents: &[u8], mode: Option<u32>)
        -> Result<(), PortError>;

    /// Creates a directory and any missing ancestors.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    fn create_dir_all(&self, path: &Path) -> Result<(), PortError>;

    /// Returns `true` if the path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Returns `true` if the path exists and is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Lists the entry names of a directory, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not a directory or cannot be read.
    fn list_dir(&self, path: &Path) -> Result<Vec<String>, PortError>;

    /// Walks `root` recursively in sorted order, yielding the files whose
    /// entries (and ancestor directories) pass `keep`.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` cannot be opened; per-entry failures are
    /// yielded by the iterator.
    fn walk<'a>(&'a self, root: &Path, keep: WalkFilter<'a>) -> Result<WalkIter<'a>, PortError>;
}

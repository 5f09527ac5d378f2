//! Collecting the files of a template directory.

pub mod exclude;

use std::path::PathBuf;

pub use exclude::{ExclusionSet, DEFAULT_EXCLUDES};

use crate::context::ServiceContext;
use crate::error::ScaffoldError;
use crate::ports::filesystem::WalkEntry;

/// One file read from the template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFile {
    /// Path relative to the template root.
    pub relative_path: PathBuf,
    /// Raw file contents.
    pub contents: Vec<u8>,
    /// Whether the contents are treated as opaque bytes.
    pub binary: bool,
    /// Unix permission bits of the source file.
    pub mode: Option<u32>,
}

impl TemplateFile {
    /// Builds a file, classifying it as binary or text from its contents.
    #[must_use]
    pub fn new(relative_path: impl Into<PathBuf>, contents: Vec<u8>, mode: Option<u32>) -> Self {
        let binary = is_binary(&contents);
        Self {
            relative_path: relative_path.into(),
            contents,
            binary,
            mode,
        }
    }

    /// The contents as text, or `None` for binary files.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        if self.binary {
            return None;
        }
        std::str::from_utf8(&self.contents).ok()
    }
}

/// Returns `true` if `bytes` contain a NUL byte or are not valid UTF-8.
#[must_use]
pub fn is_binary(bytes: &[u8]) -> bool {
    bytes.contains(&0) || std::str::from_utf8(bytes).is_err()
}

type KeepFn = Box<dyn Fn(&WalkEntry) -> bool + Send + Sync>;

/// Walks a template root and yields every non-excluded file.
pub struct Collector<'a> {
    ctx: &'a ServiceContext,
    root: PathBuf,
    keep: KeepFn,
}

impl<'a> Collector<'a> {
    /// Creates a collector over `root`.
    #[must_use]
    pub fn new(
        ctx: &'a ServiceContext,
        root: impl Into<PathBuf>,
        exclusions: ExclusionSet,
    ) -> Self {
        let keep: KeepFn = Box::new(move |entry: &WalkEntry| {
            !exclusions.is_excluded(&entry.relative)
        });
        Self {
            ctx,
            root: root.into(),
            keep,
        }
    }

    /// Lazily yields the template's files in sorted path order.
    ///
    /// Each file is read when the iterator reaches it, so memory use is
    /// bounded by the largest file rather than the whole template.
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::SourceNotFound`] if the root is not a
    /// directory. Unreadable files are yielded as
    /// [`ScaffoldError::ReadFailure`].
    pub fn files(
        &self,
    ) -> Result<impl Iterator<Item = Result<TemplateFile, ScaffoldError>> + '_, ScaffoldError> {
        if !self.ctx.fs.is_dir(&self.root) {
            return Err(ScaffoldError::SourceNotFound {
                path: self.root.clone(),
            });
        }
        let walk = self
            .ctx
            .fs
            .walk(&self.root, &*self.keep)
            .map_err(|source| ScaffoldError::ReadFailure {
                path: self.root.clone(),
                source,
            })?;

        Ok(walk.map(move |entry| -> Result<TemplateFile, ScaffoldError> {
            let entry = entry.map_err(|source| ScaffoldError::ReadFailure {
                path: self.root.clone(),
                source,
            })?;
            let path = self.root.join(&entry.relative);
            let contents = self
                .ctx
                .fs
                .read(&path)
                .map_err(|source| ScaffoldError::ReadFailure {
                    path: path.clone(),
                    source,
                })?;
            let file = TemplateFile::new(entry.relative, contents, entry.mode);
            tracing::debug!(
                path = %file.relative_path.display(),
                bytes = file.contents.len(),
                binary = file.binary,
                "collected"
            );
            Ok(file)
        }))
    }
}

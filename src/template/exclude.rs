//! Paths never copied from the template.

use std::path::Path;

use globset::{Glob, GlobBuilder, GlobSet, GlobSetBuilder};

use crate::config::MANIFEST_FILE;

/// Development artifacts that never belong in a generated project.
pub const DEFAULT_EXCLUDES: &[&str] = &[
    "__pycache__",
    "*.pyc",
    "*.pyo",
    ".git",
    "venv",
    ".venv",
    "node_modules",
    ".env",
    "*.db",
    "dist",
    ".vite",
    "target",
    "temp.tmp",
    MANIFEST_FILE,
];

/// A set of glob patterns matched against template paths.
///
/// Patterns without a `/` match any single path component, so `dist`
/// excludes `dist/` at every depth. Patterns with a `/` match the whole
/// relative path.
#[derive(Debug, Clone)]
pub struct ExclusionSet {
    components: GlobSet,
    paths: GlobSet,
}

impl ExclusionSet {
    /// Builds the default exclusions plus `extra` patterns.
    ///
    /// # Errors
    ///
    /// Returns the offending pattern and parser message if any pattern is not
    /// a valid glob.
    pub fn with_extra<S: AsRef<str>>(extra: &[S]) -> Result<Self, String> {
        let mut components = GlobSetBuilder::new();
        let mut paths = GlobSetBuilder::new();

        let all = DEFAULT_EXCLUDES
            .iter()
            .copied()
            .chain(extra.iter().map(AsRef::<str>::as_ref));
        for pattern in all {
            let trimmed = pattern.trim_matches('/');
            if trimmed.is_empty() {
                continue;
            }
            if trimmed.contains('/') {
                paths.add(compile(trimmed, true)?);
            } else {
                components.add(compile(trimmed, false)?);
            }
        }

        Ok(Self {
            components: components.build().map_err(|e| e.to_string())?,
            paths: paths.build().map_err(|e| e.to_string())?,
        })
    }

    /// Returns `true` if `relative` (a path inside the template) is excluded.
    #[must_use]
    pub fn is_excluded(&self, relative: &Path) -> bool {
        if relative.as_os_str().is_empty() {
            return false;
        }
        self.paths.is_match(relative)
            || relative
                .components()
                .any(|c| self.components.is_match(c.as_os_str()))
    }
}

fn compile(pattern: &str, literal_separator: bool) -> Result<Glob, String> {
    GlobBuilder::new(pattern)
        .literal_separator(literal_separator)
        .build()
        .map_err(|e| format!("invalid exclude pattern {pattern:?}: {e}"))
}

//! In-memory filesystem, a test double for the `FileSystem` port.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Component, Path, PathBuf};
use std::sync::Mutex;

use crate::error::PortError;
use crate::ports::filesystem::{FileSystem, WalkEntry, WalkFilter, WalkIter};

#[derive(Debug, Clone)]
struct MemFile {
    contents: Vec<u8>,
    mode: Option<u32>,
}

/// A filesystem held entirely in memory.
///
/// Directories exist implicitly as ancestors of files, or explicitly via
/// [`MemoryFileSystem::add_dir`].
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    files: Mutex<BTreeMap<PathBuf, MemFile>>,
    dirs: Mutex<BTreeSet<PathBuf>>,
}

impl MemoryFileSystem {
    /// Creates an empty filesystem.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a file.
    pub fn add_file(&self, path: impl AsRef<Path>, contents: impl Into<Vec<u8>>) {
        self.insert(path.as_ref(), contents.into(), None);
    }

    /// Adds (or replaces) a file with explicit permission bits.
    pub fn add_file_with_mode(
        &self,
        path: impl AsRef<Path>,
        contents: impl Into<Vec<u8>>,
        mode: u32,
    ) {
        self.insert(path.as_ref(), contents.into(), Some(mode));
    }

    /// Adds an empty directory.
    pub fn add_dir(&self, path: impl AsRef<Path>) {
        self.lock_dirs().insert(normalize(path.as_ref()));
    }

    /// Returns the contents of a file, if present.
    #[must_use]
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        self.lock_files()
            .get(&normalize(path.as_ref()))
            .map(|f| f.contents.clone())
    }

    /// Returns the permission bits recorded for a file, if any.
    #[must_use]
    pub fn mode(&self, path: impl AsRef<Path>) -> Option<u32> {
        self.lock_files()
            .get(&normalize(path.as_ref()))
            .and_then(|f| f.mode)
    }

    fn insert(&self, path: &Path, contents: Vec<u8>, mode: Option<u32>) {
        self.lock_files()
            .insert(normalize(path), MemFile { contents, mode });
    }

    fn lock_files(&self) -> std::sync::MutexGuard<'_, BTreeMap<PathBuf, MemFile>> {
        self.files
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn lock_dirs(&self) -> std::sync::MutexGuard<'_, BTreeSet<PathBuf>> {
        self.dirs
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Immediate children of `dir` as (name, `is_dir`) pairs, sorted by name.
    fn children(&self, dir: &Path) -> BTreeMap<String, bool> {
        let mut out = BTreeMap::new();
        let mut note = |path: &Path, leaf_is_dir: bool| {
            if let Ok(rest) = path.strip_prefix(dir) {
                let mut parts = rest.components();
                if let Some(first) = parts.next() {
                    let name = first.as_os_str().to_string_lossy().into_owned();
                    let is_dir = leaf_is_dir || parts.next().is_some();
                    let slot = out.entry(name).or_insert(is_dir);
                    *slot |= is_dir;
                }
            }
        };
        for path in self.lock_files().keys() {
            note(path, false);
        }
        for path in self.lock_dirs().iter() {
            note(path, true);
        }
        out
    }

    fn collect_walk(
        &self,
        root: &Path,
        dir: &Path,
        keep: WalkFilter<'_>,
        out: &mut Vec<WalkEntry>,
    ) {
        for (name, is_dir) in self.children(dir) {
            let path = dir.join(&name);
            let relative = path.strip_prefix(root).unwrap_or(&path).to_path_buf();
            let entry = WalkEntry {
                relative,
                is_dir,
                mode: self.mode(&path),
            };
            if !keep(&entry) {
                continue;
            }
            if is_dir {
                self.collect_walk(root, &path, keep, out);
            } else {
                out.push(entry);
            }
        }
    }
}

impl FileSystem for MemoryFileSystem {
    fn read(&self, path: &Path) -> Result<Vec<u8>, PortError> {
        self.contents(path)
            .ok_or_else(|| format!("{}: no such file", path.display()).into())
    }

    fn write_atomic(
        &self,
        path: &Path,
        contents: &[u8],
        mode: Option<u32>,
    ) -> Result<(), PortError> {
        let path = normalize(path);
        if self.is_dir(&path) {
            return Err(format!("{}: is a directory", path.display()).into());
        }
        self.insert(&path, contents.to_vec(), mode);
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), PortError> {
        let path = normalize(path);
        if self.lock_files().contains_key(&path) {
            return Err(format!("{}: file exists", path.display()).into());
        }
        self.lock_dirs().insert(path);
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let path = normalize(path);
        let is_file = self.lock_files().contains_key(&path);
        is_file || self.is_dir(&path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        let path = normalize(path);
        if self.lock_dirs().iter().any(|d| d.starts_with(&path)) {
            return true;
        }
        let files = self.lock_files();
        files.keys().any(|f| f != &path && f.starts_with(&path))
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<String>, PortError> {
        let path = normalize(path);
        if !self.is_dir(&path) {
            return Err(format!("{}: not a directory", path.display()).into());
        }
        Ok(self.children(&path).into_keys().collect())
    }

    fn walk<'a>(&'a self, root: &Path, keep: WalkFilter<'a>) -> Result<WalkIter<'a>, PortError> {
        let root = normalize(root);
        if !self.is_dir(&root) {
            return Err(format!("{} is not a directory", root.display()).into());
        }
        let mut entries = Vec::new();
        self.collect_walk(&root, &root, keep, &mut entries);
        Ok(Box::new(entries.into_iter().map(Ok)))
    }
}

/// Resolves `.` and `..` lexically so lookups agree on one spelling.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directories_exist_implicitly() {
        let fs = MemoryFileSystem::new();
        fs.add_file("/tpl/backend/app/main.py", "print()");

        assert!(fs.is_dir(Path::new("/tpl/backend")));
        assert!(!fs.is_dir(Path::new("/tpl/backend/app/main.py")));
        assert!(fs.exists(Path::new("/tpl/./backend/app/main.py")));
        assert_eq!(
            fs.list_dir(Path::new("/tpl")).unwrap(),
            vec!["backend".to_string()]
        );
    }

    #[test]
    fn walk_prunes_rejected_directories() {
        let fs = MemoryFileSystem::new();
        fs.add_file("/tpl/README.md", "readme");
        fs.add_file("/tpl/frontend/node_modules/x/index.js", "x");
        fs.add_file("/tpl/frontend/src/App.jsx", "app");

        let keep = |e: &WalkEntry| !e.relative.ends_with("node_modules");
        let files: Vec<PathBuf> = fs
            .walk(Path::new("/tpl"), &keep)
            .unwrap()
            .map(|e| e.unwrap().relative)
            .collect();

        assert_eq!(
            files,
            vec![
                PathBuf::from("README.md"),
                PathBuf::from("frontend/src/App.jsx")
            ]
        );
    }

    #[test]
    fn writing_over_a_directory_fails() {
        let fs = MemoryFileSystem::new();
        fs.add_file("/out/dir/file", "x");

        assert!(fs.write_atomic(Path::new("/out/dir"), b"y", None).is_err());
    }

    #[test]
    fn empty_directory_lists_nothing() {
        let fs = MemoryFileSystem::new();
        fs.add_dir("/out");

        assert!(fs.is_dir(Path::new("/out")));
        assert!(fs.list_dir(Path::new("/out")).unwrap().is_empty());
    }
}

//! Live filesystem adapter using `std::fs` and `walkdir`.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use uuid::Uuid;
use walkdir::WalkDir;

use crate::error::PortError;
use crate::ports::filesystem::{FileSystem, WalkEntry, WalkFilter, WalkIter};

/// Live filesystem adapter backed by real disk I/O.
pub struct LiveFileSystem;

impl FileSystem for LiveFileSystem {
    fn read(&self, path: &Path) -> Result<Vec<u8>, PortError> {
        Ok(fs::read(path)?)
    }

    fn write_atomic(
        &self,
        path: &Path,
        contents: &[u8],
        mode: Option<u32>,
    ) -> Result<(), PortError> {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent)?;

        let tmp = temp_sibling(path);
        let result = write_then_rename(&tmp, path, contents, mode);
        if result.is_err() {
            let _ = fs::remove_file(&tmp);
        }
        result
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), PortError> {
        Ok(fs::create_dir_all(path)?)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<String>, PortError> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            entries.push(entry.file_name().to_string_lossy().into_owned());
        }
        entries.sort();
        Ok(entries)
    }

    fn walk<'a>(&'a self, root: &Path, keep: WalkFilter<'a>) -> Result<WalkIter<'a>, PortError> {
        if !root.is_dir() {
            return Err(format!("{} is not a directory", root.display()).into());
        }
        let base = root.to_path_buf();
        let filter_base = base.clone();

        let iter = WalkDir::new(root)
            .min_depth(1)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| keep(&to_walk_entry(&filter_base, entry)))
            .filter_map(move |entry| match entry {
                Ok(entry) if entry.file_type().is_dir() => None,
                Ok(entry) => Some(Ok(to_walk_entry(&base, &entry))),
                Err(err) => Some(Err(PortError::from(err))),
            });
        Ok(Box::new(iter))
    }
}

fn to_walk_entry(base: &Path, entry: &walkdir::DirEntry) -> WalkEntry {
    let relative = entry
        .path()
        .strip_prefix(base)
        .unwrap_or(entry.path())
        .to_path_buf();
    WalkEntry {
        relative,
        is_dir: entry.file_type().is_dir(),
        mode: mode_of(entry),
    }
}

#[cfg(unix)]
fn mode_of(entry: &walkdir::DirEntry) -> Option<u32> {
    use std::os::unix::fs::PermissionsExt;
    entry
        .metadata()
        .ok()
        .map(|m| m.permissions().mode() & 0o7777)
}

#[cfg(not(unix))]
fn mode_of(_entry: &walkdir::DirEntry) -> Option<u32> {
    None
}

fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map_or_else(|| "file".into(), |n| n.to_string_lossy());
    path.with_file_name(format!(".{name}.{}.tmp", Uuid::new_v4().simple()))
}

fn write_then_rename(
    tmp: &Path,
    path: &Path,
    contents: &[u8],
    mode: Option<u32>,
) -> Result<(), PortError> {
    let mut file = fs::File::create(tmp)?;
    file.write_all(contents)?;
    file.sync_all()?;
    drop(file);
    if let Some(mode) = mode {
        set_mode(tmp, mode)?;
    }
    fs::rename(tmp, path)?;
    Ok(())
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> std::io::Result<()> {
    Ok(())
}

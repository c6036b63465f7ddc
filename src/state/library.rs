use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::data::{ArchiveRef, FolderEntry};
use crate::archive::inspector::is_archive;
use crate::error::{KioskError, Result};
use crate::natural_sort::{natural_cmp, natural_cmp_paths};

/// The Library is the directory tree the kiosk browses.
/// It holds nothing but the root path; listings are recomputed from the
/// filesystem every time a screen asks for them.
#[derive(Debug, Clone)]
pub struct Library {
    root: PathBuf,
}

impl Library {
    /// Open the library at `root`, which must be an existing directory.
    pub fn open(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            return Err(KioskError::EmptyLibrary(root.to_path_buf()));
        }

        let root = root.canonicalize()?;
        log::info!("📁 Library root: {}", root.display());

        Ok(Library { root })
    }

    /// Get the library root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether `dir` is the library root itself
    pub fn is_root(&self, dir: &Path) -> bool {
        dir == self.root || dir.canonicalize().map_or(false, |d| d == self.root)
    }
}

/// Immediate, non-hidden subdirectories of `dir` in natural order.
///
/// An unreadable directory lists as empty.
pub fn list_subfolders(dir: &Path) -> Vec<FolderEntry> {
    let mut folders: Vec<FolderEntry> = read_visible(dir)
        .into_iter()
        .filter(|(_, path)| path.is_dir())
        .map(|(name, path)| FolderEntry { name, path })
        .collect();

    folders.sort_by(|a, b| natural_cmp(&a.name, &b.name));
    folders
}

/// Archive files directly inside `dir` in natural order of file name
pub fn list_chapter_archives(dir: &Path) -> Vec<ArchiveRef> {
    let mut archives: Vec<ArchiveRef> = read_visible(dir)
        .into_iter()
        .map(|(_, path)| path)
        .filter(|path| path.is_file() && is_archive(path))
        .collect();

    archives.sort_by(|a, b| natural_cmp_paths(a, b));
    archives
}

/// First archive found walking the whole subtree of `dir` depth-first.
///
/// Inside each directory, archives are considered before subdirectories,
/// both in natural order. Hidden entries are skipped. Symlinks are
/// followed; walkdir reports link cycles as errors, which are skipped.
pub fn find_first_nested_archive(dir: &Path) -> Option<ArchiveRef> {
    WalkDir::new(dir)
        .follow_links(true)
        .sort_by(|a, b| {
            a.file_type()
                .is_dir()
                .cmp(&b.file_type().is_dir())
                .then_with(|| {
                    natural_cmp(&a.file_name().to_string_lossy(), &b.file_name().to_string_lossy())
                })
        })
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(&e.file_name().to_string_lossy()))
        .filter_map(|e| e.ok())
        .find(|e| e.file_type().is_file() && is_archive(e.path()))
        .map(|e| e.into_path())
}

/// Names starting with a dot are hidden
pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// Non-hidden children of `dir` as (name, path) pairs, unordered
fn read_visible(dir: &Path) -> Vec<(String, PathBuf)> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("⚠️  Cannot list {}: {}", dir.display(), e);
            return Vec::new();
        }
    };

    entries
        .filter_map(|e| e.ok())
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().to_string();
            if is_hidden(&name) {
                None
            } else {
                Some((name, entry.path()))
            }
        })
        .collect()
}

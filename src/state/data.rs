/// Shared data structures for the browsing state
///
/// These structs describe what the scanner finds on disk and flow
/// between the navigator and the UI layer. None of them are persisted;
/// every screen recomputes them from the filesystem.
use std::path::{Path, PathBuf};

/// A chapter archive on disk (.cbz / .zip)
pub type ArchiveRef = PathBuf;

/// An immediate subfolder of a browsed directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderEntry {
    /// Directory name only (e.g., "One Piece")
    pub name: String,
    /// Full path to the directory
    pub path: PathBuf,
}

/// Label shown under a chapter thumbnail: the file name without extension
pub fn chapter_label(archive: &Path) -> String {
    archive
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chapter_label_strips_extension() {
        assert_eq!(chapter_label(Path::new("/lib/book/Chapter 10.cbz")), "Chapter 10");
        assert_eq!(chapter_label(Path::new("v1.5.zip")), "v1.5");
    }
}

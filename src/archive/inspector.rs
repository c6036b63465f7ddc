/// Comic archive inspection
///
/// Opens a zip-compatible archive, lists its page images and decodes
/// single entries on demand. Every call opens and closes the archive;
/// no file handle outlives the call.
use image::DynamicImage;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};
use zip::ZipArchive;

use crate::error::{KioskError, Result};

/// Entry name suffixes treated as pages (compared lowercased)
pub const SUPPORTED_IMAGE_EXTENSIONS: [&str; 5] = [".jpg", ".jpeg", ".png", ".bmp", ".gif"];

/// File extensions recognized as chapter archives (compared lowercased)
pub const ARCHIVE_EXTENSIONS: [&str; 2] = ["cbz", "zip"];

/// Largest entry that will be read; a bigger declared size means a
/// corrupt or hostile header
const MAX_ENTRY_BYTES: u64 = 256 * 1024 * 1024;

/// The ordered page list of one opened archive
///
/// Never empty: [`ArchiveIndex::open`] refuses archives without pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveIndex {
    archive: PathBuf,
    entries: Vec<String>,
}

impl ArchiveIndex {
    /// Open an archive for reading. Unlike [`list_image_entries`], an
    /// unreadable archive or one without images is an error here.
    pub fn open(archive: &Path) -> Result<Self> {
        let entries = try_list_image_entries(archive)?;
        if entries.is_empty() {
            return Err(KioskError::NoPages(archive.to_path_buf()));
        }

        log::debug!("📖 Indexed {} pages in {}", entries.len(), archive.display());

        Ok(Self {
            archive: archive.to_path_buf(),
            entries,
        })
    }

    pub fn archive(&self) -> &Path {
        &self.archive
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn last_index(&self) -> usize {
        self.entries.len() - 1
    }

    pub fn entry(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }
}

/// Whether a path names a chapter archive, judged by extension only
pub fn is_archive(path: &Path) -> bool {
    match path.extension() {
        Some(ext) => {
            let ext = ext.to_string_lossy().to_lowercase();
            ARCHIVE_EXTENSIONS.contains(&ext.as_str())
        }
        None => false,
    }
}

/// Whether an archive entry name is a supported page image
pub fn is_image_entry(name: &str) -> bool {
    let name = name.to_lowercase();
    SUPPORTED_IMAGE_EXTENSIONS
        .iter()
        .any(|ext| name.ends_with(ext))
}

/// List the page images of an archive in plain ascending name order.
///
/// Corrupt or unreadable archives yield an empty list; browse-time
/// callers treat that as "nothing to show".
pub fn list_image_entries(archive: &Path) -> Vec<String> {
    match try_list_image_entries(archive) {
        Ok(entries) => entries,
        Err(e) => {
            log::debug!("⚠️  Skipping {}: {}", archive.display(), e);
            Vec::new()
        }
    }
}

/// Fallible version of [`list_image_entries`]
pub fn try_list_image_entries(archive: &Path) -> Result<Vec<String>> {
    let zip = open_archive(archive)?;

    let mut entries: Vec<String> = zip
        .file_names()
        .filter(|name| is_image_entry(name))
        .map(str::to_owned)
        .collect();

    // Pages inside one archive are assumed zero-padded
    entries.sort();

    Ok(entries)
}

/// Read and decode one entry.
///
/// Any failure (archive replaced on disk, entry gone, bad image data)
/// is reported as [`KioskError::PageUnavailable`].
pub fn read_entry(archive: &Path, entry: &str) -> Result<DynamicImage> {
    decode_entry(archive, entry).map_err(|e| {
        log::warn!("⚠️  Cannot read {} from {}: {}", entry, archive.display(), e);
        KioskError::PageUnavailable {
            archive: archive.to_path_buf(),
            entry: entry.to_string(),
        }
    })
}

/// Decode the first page of an archive, or None if there is nothing
/// readable. Used for thumbnails only; never fails.
pub fn first_image(archive: &Path) -> Option<DynamicImage> {
    let entries = list_image_entries(archive);
    let first = entries.first()?;
    decode_entry(archive, first).ok()
}

fn open_archive(archive: &Path) -> Result<ZipArchive<BufReader<File>>> {
    let unreadable = |source| KioskError::ArchiveUnreadable {
        path: archive.to_path_buf(),
        source,
    };

    let file = File::open(archive).map_err(|e| unreadable(zip::result::ZipError::Io(e)))?;
    ZipArchive::new(BufReader::new(file)).map_err(unreadable)
}

fn decode_entry(archive: &Path, entry: &str) -> Result<DynamicImage> {
    let mut zip = open_archive(archive)?;
    let file = zip.by_name(entry)?;

    let declared = file.size();
    if declared > MAX_ENTRY_BYTES {
        return Err(KioskError::Io(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("entry {} declares {} bytes", entry, declared),
        )));
    }

    // The declared size is only a hint; the read itself is capped too
    let mut data = Vec::with_capacity(declared as usize);
    file.take(MAX_ENTRY_BYTES).read_to_end(&mut data)?;

    Ok(image::load_from_memory(&data)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{png_bytes, write_archive, write_comic};
    use tempfile::tempdir;

    #[test]
    fn test_entries_in_ascending_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ch1.cbz");
        write_comic(&path, &["b.png", "a.jpg", "c.gif"]);

        assert_eq!(list_image_entries(&path), vec!["a.jpg", "b.png", "c.gif"]);
    }

    #[test]
    fn test_non_images_are_filtered() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ch1.cbz");
        write_archive(
            &path,
            &[
                ("ComicInfo.xml", b"<xml/>".to_vec()),
                ("pages/", Vec::new()),
                ("pages/001.PNG", png_bytes(2, 2)),
            ],
        );

        assert_eq!(list_image_entries(&path), vec!["pages/001.PNG"]);
    }

    #[test]
    fn test_archive_without_images_is_empty_not_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.cbz");
        write_archive(&path, &[("readme.txt", b"hello".to_vec())]);

        assert!(list_image_entries(&path).is_empty());
        assert!(first_image(&path).is_none());
    }

    #[test]
    fn test_corrupt_archive_fails_softly() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.cbz");
        std::fs::write(&path, b"definitely not a zip").unwrap();

        assert!(list_image_entries(&path).is_empty());
        assert!(first_image(&path).is_none());
        assert!(matches!(
            ArchiveIndex::open(&path),
            Err(KioskError::ArchiveUnreadable { .. })
        ));
    }

    #[test]
    fn test_index_requires_pages() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.cbz");
        write_archive(&path, &[("readme.txt", b"hello".to_vec())]);

        assert!(matches!(ArchiveIndex::open(&path), Err(KioskError::NoPages(_))));
    }

    #[test]
    fn test_read_entry_decodes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ch1.cbz");
        write_archive(&path, &[("001.png", png_bytes(3, 5))]);

        let img = read_entry(&path, "001.png").unwrap();
        assert_eq!((img.width(), img.height()), (3, 5));

        let first = first_image(&path).unwrap();
        assert_eq!((first.width(), first.height()), (3, 5));
    }

    #[test]
    fn test_read_after_archive_changed_is_page_unavailable() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ch1.cbz");
        write_comic(&path, &["001.png", "002.png"]);
        let index = ArchiveIndex::open(&path).unwrap();

        // Replace the archive behind the index's back
        write_comic(&path, &["001.png"]);

        let err = read_entry(&path, index.entry(1).unwrap()).unwrap_err();
        assert!(matches!(err, KioskError::PageUnavailable { .. }));
    }

    /// Rewrite the uncompressed size in the first central directory
    /// record of a stored archive
    fn patch_declared_size(path: &Path, size: u32) {
        let mut bytes = std::fs::read(path).unwrap();
        let header = bytes
            .windows(4)
            .rposition(|w| w == b"PK\x01\x02")
            .unwrap();
        bytes[header + 24..header + 28].copy_from_slice(&size.to_le_bytes());
        std::fs::write(path, bytes).unwrap();
    }

    #[test]
    fn test_oversized_entry_header_fails_softly() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("huge.cbz");
        write_archive(&path, &[("001.png", png_bytes(2, 2))]);
        patch_declared_size(&path, 0x7fff_fff0);

        assert!(first_image(&path).is_none());
        assert!(matches!(
            read_entry(&path, "001.png"),
            Err(KioskError::PageUnavailable { .. })
        ));
    }

    #[test]
    fn test_archive_extension_check() {
        assert!(is_archive(Path::new("/x/Chapter 1.CBZ")));
        assert!(is_archive(Path::new("/x/Chapter 1.zip")));
        assert!(!is_archive(Path::new("/x/cover.jpg")));
        assert!(!is_archive(Path::new("/x/noext")));
    }
}

/// Error types for the kiosk
///
/// Two kinds of failure matter to the navigator:
/// - content errors, raised when a screen has nothing valid to show
///   (empty library, folder without chapters, archive without pages)
/// - soft errors, which browse-time callers swallow and turn into
///   placeholders or "page unavailable"
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum KioskError {
    /// No folders or chapters under the library root on the first screen
    #[error("no books or chapters found in the library folder {0}")]
    EmptyLibrary(PathBuf),

    /// A folder entered as a chapter list contains no archives
    #[error("no chapter archives found in {0}")]
    NoChapters(PathBuf),

    /// The archive could not be opened as a zip container
    #[error("cannot open archive {path}: {source}")]
    ArchiveUnreadable {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    /// The archive opened but holds no supported images
    #[error("no supported images in {0}")]
    NoPages(PathBuf),

    /// A single page failed to read or decode during a reading session
    #[error("page unavailable: {entry} in {archive}")]
    PageUnavailable { archive: PathBuf, entry: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("image decode error: {0}")]
    Image(#[from] image::ImageError),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("user interface error: {0}")]
    Ui(#[from] iced::Error),
}

impl KioskError {
    /// Content errors stop the construction of a screen. At the first
    /// screen they stop the whole process.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            KioskError::EmptyLibrary(_)
                | KioskError::NoChapters(_)
                | KioskError::ArchiveUnreadable { .. }
                | KioskError::NoPages(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, KioskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_errors_are_fatal() {
        assert!(KioskError::EmptyLibrary(PathBuf::from("/lib")).is_fatal());
        assert!(KioskError::NoChapters(PathBuf::from("/lib/a")).is_fatal());
        assert!(KioskError::NoPages(PathBuf::from("/lib/a/1.cbz")).is_fatal());
    }

    #[test]
    fn test_page_errors_are_soft() {
        let err = KioskError::PageUnavailable {
            archive: PathBuf::from("/lib/a/1.cbz"),
            entry: "001.png".to_string(),
        };
        assert!(!err.is_fatal());
        assert!(err.to_string().contains("001.png"));
    }
}

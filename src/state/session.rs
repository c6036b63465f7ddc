/// Reading session: the page cursor of the reader screen
///
/// A session walks an ordered list of chapter archives as one virtual
/// page sequence. Moving past the last page of an archive loads the next
/// archive's index and starts at its first page; moving back before the
/// first page loads the previous archive and starts at its last page.
/// Rotation is kept across page turns and reset whenever the archive
/// changes.
use std::path::Path;

use super::data::{chapter_label, ArchiveRef};
use crate::archive::inspector::ArchiveIndex;
use crate::error::{KioskError, Result};

/// Clockwise rotation applied to the displayed page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    #[default]
    Upright,
    Quarter,
    Half,
    ThreeQuarters,
}

impl Rotation {
    pub fn clockwise(self) -> Self {
        match self {
            Rotation::Upright => Rotation::Quarter,
            Rotation::Quarter => Rotation::Half,
            Rotation::Half => Rotation::ThreeQuarters,
            Rotation::ThreeQuarters => Rotation::Upright,
        }
    }

    pub fn counterclockwise(self) -> Self {
        match self {
            Rotation::Upright => Rotation::ThreeQuarters,
            Rotation::Quarter => Rotation::Upright,
            Rotation::Half => Rotation::Quarter,
            Rotation::ThreeQuarters => Rotation::Half,
        }
    }

    /// Angle in degrees, one of 0, 90, 180, 270
    pub fn degrees(self) -> u16 {
        match self {
            Rotation::Upright => 0,
            Rotation::Quarter => 90,
            Rotation::Half => 180,
            Rotation::ThreeQuarters => 270,
        }
    }
}

/// Outcome of a cursor operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// State changed; the current page must be drawn again
    Redraw,
    /// Already at the boundary; nothing changed
    Unchanged,
}

/// The reader's mutable state, owned by the live reader screen
#[derive(Debug, Clone)]
pub struct ReadingSession {
    chapters: Vec<ArchiveRef>,
    archive: usize,
    index: ArchiveIndex,
    page: usize,
    rotation: Rotation,
}

impl ReadingSession {
    /// Start reading `chapters[start]` at its first page.
    ///
    /// The opened archive must have pages: an unreadable or empty archive
    /// is an error, since the reader never opens without content. A
    /// `start` outside the list is reported as [`KioskError::NoChapters`].
    pub fn open(chapters: Vec<ArchiveRef>, start: usize) -> Result<Self> {
        let Some(first) = chapters.get(start) else {
            let dir = chapters
                .first()
                .and_then(|p| p.parent())
                .map(Path::to_path_buf)
                .unwrap_or_default();
            return Err(KioskError::NoChapters(dir));
        };

        let index = ArchiveIndex::open(first)?;
        log::info!("📖 Reading {} ({} pages)", first.display(), index.len());

        Ok(Self {
            chapters,
            archive: start,
            index,
            page: 0,
            rotation: Rotation::Upright,
        })
    }

    /// Advance one page, crossing into the next archive when needed.
    ///
    /// If the next archive cannot be indexed the error is returned and the
    /// cursor stays where it was.
    pub fn next(&mut self) -> Result<Transition> {
        if self.page < self.index.last_index() {
            self.page += 1;
            return Ok(Transition::Redraw);
        }

        if self.archive + 1 >= self.chapters.len() {
            return Ok(Transition::Unchanged);
        }

        let index = ArchiveIndex::open(&self.chapters[self.archive + 1])?;
        self.archive += 1;
        self.index = index;
        self.page = 0;
        self.rotation = Rotation::Upright;
        log::info!("➡️  Next chapter: {}", self.chapter_name());

        Ok(Transition::Redraw)
    }

    /// Go back one page, crossing into the previous archive's last page
    /// when needed.
    pub fn prev(&mut self) -> Result<Transition> {
        if self.page > 0 {
            self.page -= 1;
            return Ok(Transition::Redraw);
        }

        if self.archive == 0 {
            return Ok(Transition::Unchanged);
        }

        let index = ArchiveIndex::open(&self.chapters[self.archive - 1])?;
        self.archive -= 1;
        self.page = index.last_index();
        self.index = index;
        self.rotation = Rotation::Upright;
        log::info!("⬅️  Previous chapter: {}", self.chapter_name());

        Ok(Transition::Redraw)
    }

    pub fn rotate_clockwise(&mut self) -> Transition {
        self.rotation = self.rotation.clockwise();
        Transition::Redraw
    }

    pub fn rotate_counterclockwise(&mut self) -> Transition {
        self.rotation = self.rotation.counterclockwise();
        Transition::Redraw
    }

    /// (archive index, page index)
    pub fn position(&self) -> (usize, usize) {
        (self.archive, self.page)
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn current_archive(&self) -> &Path {
        self.index.archive()
    }

    pub fn current_entry(&self) -> &str {
        self.index.entry(self.page).unwrap_or_default()
    }

    pub fn page_count(&self) -> usize {
        self.index.len()
    }

    /// Directory holding the archive being read
    pub fn chapter_dir(&self) -> Option<&Path> {
        self.current_archive().parent()
    }

    pub fn chapter_name(&self) -> String {
        chapter_label(self.current_archive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::write_comic;
    use tempfile::{tempdir, TempDir};

    /// Chapter list [A (3 pages), B (2 pages)]
    fn two_chapters() -> (TempDir, Vec<ArchiveRef>) {
        let dir = tempdir().unwrap();
        let a = dir.path().join("A.cbz");
        let b = dir.path().join("B.cbz");
        write_comic(&a, &["01.png", "02.png", "03.png"]);
        write_comic(&b, &["01.png", "02.png"]);
        (dir, vec![a, b])
    }

    #[test]
    fn test_next_crosses_archives_and_stops_at_end() {
        let (_dir, chapters) = two_chapters();
        let mut session = ReadingSession::open(chapters, 0).unwrap();

        for _ in 0..3 {
            assert_eq!(session.next().unwrap(), Transition::Redraw);
        }
        assert_eq!(session.position(), (1, 0));
        assert_eq!(session.chapter_name(), "B");

        assert_eq!(session.next().unwrap(), Transition::Redraw);
        assert_eq!(session.position(), (1, 1));

        assert_eq!(session.next().unwrap(), Transition::Unchanged);
        assert_eq!(session.position(), (1, 1));
    }

    #[test]
    fn test_prev_lands_on_last_page_and_resets_rotation() {
        let (_dir, chapters) = two_chapters();
        let mut session = ReadingSession::open(chapters, 1).unwrap();
        session.rotate_clockwise();
        assert_eq!(session.rotation().degrees(), 90);

        assert_eq!(session.prev().unwrap(), Transition::Redraw);
        assert_eq!(session.position(), (0, 2));
        assert_eq!(session.current_entry(), "03.png");
        assert_eq!(session.rotation(), Rotation::Upright);
    }

    #[test]
    fn test_prev_at_very_first_page_is_noop() {
        let (_dir, chapters) = two_chapters();
        let mut session = ReadingSession::open(chapters, 0).unwrap();

        assert_eq!(session.prev().unwrap(), Transition::Unchanged);
        assert_eq!(session.position(), (0, 0));
    }

    #[test]
    fn test_rotation_survives_page_turns_within_archive() {
        let (_dir, chapters) = two_chapters();
        let mut session = ReadingSession::open(chapters, 0).unwrap();

        session.rotate_counterclockwise();
        session.next().unwrap();
        assert_eq!(session.rotation().degrees(), 270);
    }

    #[test]
    fn test_four_clockwise_turns_return_upright() {
        let (_dir, chapters) = two_chapters();
        let mut session = ReadingSession::open(chapters, 0).unwrap();

        let degrees: Vec<u16> = (0..4)
            .map(|_| {
                session.rotate_clockwise();
                session.rotation().degrees()
            })
            .collect();

        assert_eq!(degrees, vec![90, 180, 270, 0]);
        assert_eq!(session.position(), (0, 0));
    }

    #[test]
    fn test_open_empty_archive_is_an_error() {
        let dir = tempdir().unwrap();
        let empty = dir.path().join("empty.cbz");
        crate::test_support::write_archive(&empty, &[("notes.txt", b"x".to_vec())]);

        let err = ReadingSession::open(vec![empty], 0).unwrap_err();
        assert!(matches!(err, KioskError::NoPages(_)));
    }

    #[test]
    fn test_unreadable_neighbour_keeps_position() {
        let (dir, mut chapters) = two_chapters();
        let broken = dir.path().join("C.cbz");
        std::fs::write(&broken, b"garbage").unwrap();
        chapters.push(broken);

        let mut session = ReadingSession::open(chapters, 1).unwrap();
        session.next().unwrap();
        session.rotate_clockwise();

        assert!(session.next().is_err());
        assert_eq!(session.position(), (1, 1));
        assert_eq!(session.rotation(), Rotation::Quarter);
    }

    #[test]
    fn test_start_out_of_range_is_no_chapters() {
        let (dir, chapters) = two_chapters();

        let err = ReadingSession::open(chapters, 2).unwrap_err();
        assert!(matches!(err, KioskError::NoChapters(ref d) if d == dir.path()));

        let err = ReadingSession::open(Vec::new(), 0).unwrap_err();
        assert!(matches!(err, KioskError::NoChapters(_)));
    }

    #[test]
    fn test_chapter_dir_is_archive_parent() {
        let (dir, chapters) = two_chapters();
        let session = ReadingSession::open(chapters, 0).unwrap();
        assert_eq!(session.chapter_dir(), Some(dir.path()));
    }
}

/// Screen navigation
///
/// The kiosk shows exactly one screen at a time. Leaving a screen, forward
/// or back, produces a [`ScreenRequest`]; the app drops the live screen and
/// asks the [`Navigator`] to build the requested one from scratch. There
/// is no history stack: "back" is computed from the current directory,
/// and every screen re-reads its contents from the filesystem.
use iced::widget::image::Handle;
use std::path::{Path, PathBuf};

use super::data::{ArchiveRef, FolderEntry};
use super::library::{list_chapter_archives, list_subfolders, Library};
use super::session::{ReadingSession, Rotation, Transition};
use super::thumbnails::ThumbnailCache;
use crate::archive::thumbnail::{archive_thumbnail, placeholder};
use crate::config::{Config, EntryMode, ThumbSize};
use crate::error::{KioskError, Result};

/// Identity of one constructed screen. Never reused within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScreenId(pub u64);

/// How a chapter list was reached, which decides where "back" leads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChapterOrigin {
    /// From the folder picker (or routed there from an archive-only folder)
    Folder,
    /// From the book picker at the library root
    Book,
}

/// The screen to show next
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenRequest {
    /// Folder picker for a directory
    Folders(PathBuf),
    /// Book picker over the library root
    Books,
    /// Chapter picker for a directory of archives
    Chapters { dir: PathBuf, origin: ChapterOrigin },
    /// Reader starting at `chapters[start]`
    Reader {
        chapters: Vec<ArchiveRef>,
        start: usize,
        origin: ChapterOrigin,
    },
    /// Close the kiosk
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridKind {
    Folders,
    Books,
}

/// Folder or book grid; thumbnails arrive in the background
#[derive(Debug, Clone)]
pub struct FolderScreen {
    pub id: ScreenId,
    pub dir: PathBuf,
    pub kind: GridKind,
    pub entries: Vec<FolderEntry>,
    pub thumbnails: ThumbnailCache,
    pub thumb_size: ThumbSize,
}

impl FolderScreen {
    /// Folders the background task should resolve, in grid order
    pub fn thumbnail_targets(&self) -> Vec<PathBuf> {
        self.entries.iter().map(|e| e.path.clone()).collect()
    }
}

/// Chapter grid; thumbnails are loaded while the screen is built
#[derive(Debug, Clone)]
pub struct ChapterScreen {
    pub id: ScreenId,
    pub dir: PathBuf,
    pub origin: ChapterOrigin,
    pub chapters: Vec<ArchiveRef>,
    pub thumbnails: Vec<Handle>,
    pub thumb_size: ThumbSize,
}

/// What the reader currently displays
#[derive(Debug, Clone)]
pub enum PageView {
    Loading,
    Shown(Handle),
    Unavailable(String),
}

/// A page render the app should run in the background
#[derive(Debug, Clone)]
pub struct PageRequest {
    pub screen: ScreenId,
    pub token: u64,
    pub archive: PathBuf,
    pub entry: String,
    pub rotation: Rotation,
}

/// Full-screen page reader
#[derive(Debug, Clone)]
pub struct ReaderScreen {
    pub id: ScreenId,
    pub origin: ChapterOrigin,
    pub session: ReadingSession,
    pub page: PageView,
    /// Message from the last failed chapter change, cleared on success
    pub status: Option<String>,
    token: u64,
}

impl ReaderScreen {
    /// Describe a render of the current page. Only the most recent
    /// request's result will be accepted by [`ReaderScreen::finish_render`].
    pub fn begin_render(&mut self) -> PageRequest {
        self.token += 1;
        PageRequest {
            screen: self.id,
            token: self.token,
            archive: self.session.current_archive().to_path_buf(),
            entry: self.session.current_entry().to_string(),
            rotation: self.session.rotation(),
        }
    }

    /// Apply a finished render. Stale results are dropped.
    pub fn finish_render(&mut self, token: u64, result: std::result::Result<Handle, String>) -> bool {
        if token != self.token {
            return false;
        }

        self.page = match result {
            Ok(handle) => PageView::Shown(handle),
            Err(message) => PageView::Unavailable(message),
        };
        true
    }

    /// Next page; true when the page must be redrawn
    pub fn next(&mut self) -> bool {
        let result = self.session.next();
        self.record(result)
    }

    /// Previous page; true when the page must be redrawn
    pub fn prev(&mut self) -> bool {
        let result = self.session.prev();
        self.record(result)
    }

    pub fn rotate_clockwise(&mut self) -> bool {
        self.session.rotate_clockwise() == Transition::Redraw
    }

    pub fn rotate_counterclockwise(&mut self) -> bool {
        self.session.rotate_counterclockwise() == Transition::Redraw
    }

    /// "Chapter 3 - page 4 / 20"
    pub fn status_line(&self) -> String {
        let (_, page) = self.session.position();
        format!(
            "{} - page {} / {}",
            self.session.chapter_name(),
            page + 1,
            self.session.page_count()
        )
    }

    fn record(&mut self, result: Result<Transition>) -> bool {
        match result {
            Ok(transition) => {
                self.status = None;
                transition == Transition::Redraw
            }
            Err(e) => {
                log::warn!("⚠️  Cannot change chapter: {}", e);
                self.status = Some(e.to_string());
                false
            }
        }
    }
}

/// Shown when a screen could not be built
#[derive(Debug, Clone)]
pub struct NoticeScreen {
    pub id: ScreenId,
    pub message: String,
    pub back: ScreenRequest,
}

/// The single live screen
#[derive(Debug, Clone)]
pub enum Screen {
    Folders(FolderScreen),
    Chapters(ChapterScreen),
    Reader(ReaderScreen),
    Notice(NoticeScreen),
}

impl Screen {
    pub fn id(&self) -> ScreenId {
        match self {
            Screen::Folders(s) => s.id,
            Screen::Chapters(s) => s.id,
            Screen::Reader(s) => s.id,
            Screen::Notice(s) => s.id,
        }
    }

    /// Window title for this screen
    pub fn title(&self) -> String {
        match self {
            Screen::Folders(s) if s.kind == GridKind::Books => "Select Book".to_string(),
            Screen::Folders(_) => "Select Folder".to_string(),
            Screen::Chapters(s) => format!("Select Chapter - {}", display_name(&s.dir)),
            Screen::Reader(s) => s.session.chapter_name(),
            Screen::Notice(_) => "Comic Kiosk".to_string(),
        }
    }
}

/// Builds screens from requests and computes where they lead
#[derive(Debug)]
pub struct Navigator {
    library: Library,
    entry: EntryMode,
    folder_thumb: ThumbSize,
    chapter_thumb: ThumbSize,
    next_id: u64,
}

impl Navigator {
    pub fn new(library: Library, config: &Config) -> Self {
        Self {
            library,
            entry: config.entry,
            folder_thumb: config.folder_thumb,
            chapter_thumb: config.chapter_thumb,
            next_id: 0,
        }
    }

    /// The first screen, depending on the configured entry mode
    pub fn initial_request(&self) -> ScreenRequest {
        match self.entry {
            EntryMode::Folders => ScreenRequest::Folders(self.library.root().to_path_buf()),
            EntryMode::Books => ScreenRequest::Books,
        }
    }

    /// Build the screen for `request`; `Ok(None)` means quit.
    ///
    /// Screens without valid content fail with a content error
    /// ([`KioskError::is_fatal`]).
    pub fn open(&mut self, request: ScreenRequest) -> Result<Option<Screen>> {
        let screen = match request {
            ScreenRequest::Quit => return Ok(None),
            ScreenRequest::Folders(dir) => self.open_folders(dir)?,
            ScreenRequest::Books => self.open_books()?,
            ScreenRequest::Chapters { dir, origin } => self.open_chapters(dir, origin)?,
            ScreenRequest::Reader {
                chapters,
                start,
                origin,
            } => self.open_reader(chapters, start, origin)?,
        };

        log::info!("🖼️  {}", screen.title());
        Ok(Some(screen))
    }

    /// Screen that follows activating grid cell `index`
    pub fn activate(&self, screen: &Screen, index: usize) -> Option<ScreenRequest> {
        match screen {
            Screen::Folders(s) => {
                let entry = s.entries.get(index)?;
                Some(match s.kind {
                    GridKind::Folders => ScreenRequest::Folders(entry.path.clone()),
                    GridKind::Books => ScreenRequest::Chapters {
                        dir: entry.path.clone(),
                        origin: ChapterOrigin::Book,
                    },
                })
            }
            Screen::Chapters(s) => {
                if index >= s.chapters.len() {
                    return None;
                }
                Some(ScreenRequest::Reader {
                    chapters: s.chapters.clone(),
                    start: index,
                    origin: s.origin,
                })
            }
            Screen::Reader(_) | Screen::Notice(_) => None,
        }
    }

    /// Screen that follows a back gesture on `screen`
    pub fn back(&self, screen: &Screen) -> ScreenRequest {
        match screen {
            Screen::Folders(s) => match s.kind {
                GridKind::Folders => self.back_from_folders(&s.dir),
                GridKind::Books => ScreenRequest::Quit,
            },
            Screen::Chapters(s) => self.back_from_chapters(&s.dir, s.origin),
            Screen::Reader(s) => match s.session.chapter_dir() {
                Some(dir) => ScreenRequest::Chapters {
                    dir: dir.to_path_buf(),
                    origin: s.origin,
                },
                None => ScreenRequest::Quit,
            },
            Screen::Notice(s) => s.back.clone(),
        }
    }

    /// Where "back" leads from a request that failed to open
    pub fn fallback(&self, request: &ScreenRequest) -> ScreenRequest {
        match request {
            ScreenRequest::Folders(dir) => self.back_from_folders(dir),
            ScreenRequest::Books | ScreenRequest::Quit => ScreenRequest::Quit,
            ScreenRequest::Chapters { dir, origin } => self.back_from_chapters(dir, *origin),
            ScreenRequest::Reader {
                chapters,
                start,
                origin,
            } => match chapters.get(*start).and_then(|c| c.parent()) {
                Some(dir) => ScreenRequest::Chapters {
                    dir: dir.to_path_buf(),
                    origin: *origin,
                },
                None => ScreenRequest::Quit,
            },
        }
    }

    /// A notice screen explaining `error`
    pub fn notice(&mut self, error: &KioskError, back: ScreenRequest) -> Screen {
        Screen::Notice(NoticeScreen {
            id: self.fresh_id(),
            message: error.to_string(),
            back,
        })
    }

    fn open_folders(&mut self, dir: PathBuf) -> Result<Screen> {
        let entries = list_subfolders(&dir);

        if entries.is_empty() {
            // Folders holding only archives go straight to the chapter view
            if self.library.is_root(&dir) && list_chapter_archives(&dir).is_empty() {
                return Err(KioskError::EmptyLibrary(dir));
            }
            return self.open_chapters(dir, ChapterOrigin::Folder);
        }

        Ok(self.folder_grid(dir, GridKind::Folders, entries))
    }

    fn open_books(&mut self) -> Result<Screen> {
        let root = self.library.root().to_path_buf();
        let entries = list_subfolders(&root);

        if entries.is_empty() {
            return Err(KioskError::EmptyLibrary(root));
        }

        Ok(self.folder_grid(root, GridKind::Books, entries))
    }

    fn open_chapters(&mut self, dir: PathBuf, origin: ChapterOrigin) -> Result<Screen> {
        let chapters = list_chapter_archives(&dir);
        if chapters.is_empty() {
            return Err(KioskError::NoChapters(dir));
        }

        let size = self.chapter_thumb;
        let thumbnails = chapters
            .iter()
            .map(|chapter| archive_thumbnail(chapter, size).unwrap_or_else(|| placeholder(size)))
            .collect();

        Ok(Screen::Chapters(ChapterScreen {
            id: self.fresh_id(),
            dir,
            origin,
            chapters,
            thumbnails,
            thumb_size: size,
        }))
    }

    fn open_reader(
        &mut self,
        chapters: Vec<ArchiveRef>,
        start: usize,
        origin: ChapterOrigin,
    ) -> Result<Screen> {
        let session = ReadingSession::open(chapters, start)?;

        Ok(Screen::Reader(ReaderScreen {
            id: self.fresh_id(),
            origin,
            session,
            page: PageView::Loading,
            status: None,
            token: 0,
        }))
    }

    fn folder_grid(&mut self, dir: PathBuf, kind: GridKind, entries: Vec<FolderEntry>) -> Screen {
        let id = self.fresh_id();
        let thumbnails = ThumbnailCache::new(id, entries.len(), self.folder_thumb);

        Screen::Folders(FolderScreen {
            id,
            dir,
            kind,
            entries,
            thumbnails,
            thumb_size: self.folder_thumb,
        })
    }

    fn back_from_folders(&self, dir: &Path) -> ScreenRequest {
        if self.library.is_root(dir) {
            return ScreenRequest::Quit;
        }
        match dir.parent() {
            Some(parent) => ScreenRequest::Folders(parent.to_path_buf()),
            None => ScreenRequest::Quit,
        }
    }

    fn back_from_chapters(&self, dir: &Path, origin: ChapterOrigin) -> ScreenRequest {
        match origin {
            ChapterOrigin::Book => ScreenRequest::Books,
            ChapterOrigin::Folder => self.back_from_folders(dir),
        }
    }

    fn fresh_id(&mut self) -> ScreenId {
        self.next_id += 1;
        ScreenId(self.next_id)
    }
}

fn display_name(dir: &Path) -> String {
    dir.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}

#[cfg(test)]
impl Navigator {
    pub fn library(&self) -> &Library {
        &self.library
    }
}

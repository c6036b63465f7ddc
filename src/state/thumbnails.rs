/// Session-scoped thumbnail cache for folder and book grids
///
/// Every cell starts with a gray placeholder. A single background task
/// resolves the real thumbnails in list order and sends immutable
/// [`ThumbnailUpdate`]s back; the UI thread applies them here. Updates
/// addressed to a screen that has since been replaced, or to a cell that
/// does not exist, are ignored.
use iced::futures::channel::mpsc;
use iced::futures::{SinkExt, Stream};
use iced::widget::image::Handle;
use std::path::PathBuf;

use super::navigator::ScreenId;
use crate::archive::thumbnail::{folder_thumbnail, placeholder};
use crate::config::ThumbSize;

/// One grid cell's bitmap
#[derive(Debug, Clone)]
pub enum ThumbnailEntry {
    Placeholder(Handle),
    Loaded(Handle),
}

impl ThumbnailEntry {
    pub fn handle(&self) -> &Handle {
        match self {
            ThumbnailEntry::Placeholder(handle) | ThumbnailEntry::Loaded(handle) => handle,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, ThumbnailEntry::Loaded(_))
    }
}

/// A resolved thumbnail produced by the background task
#[derive(Debug, Clone)]
pub struct ThumbnailUpdate {
    pub screen: ScreenId,
    pub index: usize,
    pub handle: Handle,
}

/// Thumbnails of one grid screen, indexed like its item list
#[derive(Debug, Clone)]
pub struct ThumbnailCache {
    screen: ScreenId,
    entries: Vec<ThumbnailEntry>,
}

impl ThumbnailCache {
    /// A cache of `len` placeholders owned by `screen`
    pub fn new(screen: ScreenId, len: usize, size: ThumbSize) -> Self {
        let gray = placeholder(size);
        Self {
            screen,
            entries: vec![ThumbnailEntry::Placeholder(gray); len],
        }
    }

    /// Swap a placeholder for its resolved bitmap.
    ///
    /// Returns false, changing nothing, for updates meant for another
    /// screen or for an index outside the grid.
    pub fn apply(&mut self, update: ThumbnailUpdate) -> bool {
        if update.screen != self.screen {
            return false;
        }

        match self.entries.get_mut(update.index) {
            Some(entry) => {
                *entry = ThumbnailEntry::Loaded(update.handle);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, index: usize) -> Option<&ThumbnailEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn loaded_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_loaded()).count()
    }
}

#[cfg(test)]
impl ThumbnailCache {
    pub fn screen(&self) -> ScreenId {
        self.screen
    }
}

/// Stream of resolved thumbnails for `folders`, in list order.
///
/// Folders without any readable archive produce nothing and keep their
/// placeholder. The stream ends after the last folder, or early if the
/// receiving side goes away.
pub fn load_in_background(
    screen: ScreenId,
    folders: Vec<PathBuf>,
    size: ThumbSize,
) -> impl Stream<Item = ThumbnailUpdate> {
    iced::stream::channel(16, move |mut output: mpsc::Sender<ThumbnailUpdate>| async move {
        log::debug!("🔍 Resolving {} folder thumbnails", folders.len());

        for (index, folder) in folders.into_iter().enumerate() {
            let resolved =
                tokio::task::spawn_blocking(move || folder_thumbnail(&folder, size)).await;

            match resolved {
                Ok(Some(handle)) => {
                    let update = ThumbnailUpdate { screen, index, handle };
                    if output.send(update).await.is_err() {
                        break;
                    }
                }
                Ok(None) => {}
                Err(e) => log::warn!("⚠️  Thumbnail task failed: {}", e),
            }
        }
    })
}

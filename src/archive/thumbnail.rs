use iced::widget::image::Handle;
use image::{imageops::FilterType, DynamicImage, Rgba, RgbaImage};
use std::path::Path;

use super::inspector::first_image;
use crate::config::ThumbSize;
use crate::state::library::find_first_nested_archive;

/// Fill color of a thumbnail that has not (or could not) be loaded
const PLACEHOLDER_GRAY: Rgba<u8> = Rgba([128, 128, 128, 255]);

/// Gray bitmap shown until a real thumbnail is available
pub fn placeholder(size: ThumbSize) -> Handle {
    let img = RgbaImage::from_pixel(size.width, size.height, PLACEHOLDER_GRAY);
    Handle::from_rgba(size.width, size.height, img.into_raw())
}

/// Shrink an image to fit within `size`, keeping its aspect ratio.
/// Images already small enough are left alone.
pub fn shrink(img: &DynamicImage, size: ThumbSize) -> DynamicImage {
    if img.width() <= size.width && img.height() <= size.height {
        return img.clone();
    }
    img.resize(size.width, size.height, FilterType::Lanczos3)
}

/// Convert a decoded image into a bitmap the view layer can draw
pub fn to_handle(img: &DynamicImage) -> Handle {
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Handle::from_rgba(width, height, rgba.into_raw())
}

/// Thumbnail of an archive's first page, or None if it has none
pub fn archive_thumbnail(archive: &Path, size: ThumbSize) -> Option<Handle> {
    let img = first_image(archive)?;
    Some(to_handle(&shrink(&img, size)))
}

/// Thumbnail of a folder: the first page of the first archive found
/// anywhere beneath it.
///
/// Walks the directory tree and decodes an image, so callers run it off
/// the UI thread.
pub fn folder_thumbnail(dir: &Path, size: ThumbSize) -> Option<Handle> {
    let archive = find_first_nested_archive(dir)?;
    let thumbnail = archive_thumbnail(&archive, size);

    if thumbnail.is_some() {
        log::debug!("📸 Thumbnail for {} from {}", dir.display(), archive.display());
    }
    thumbnail
}

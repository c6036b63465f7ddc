/// Reader page rendering
///
/// Decodes one archive entry, applies the session's rotation and caps
/// the result to the display size. Decoding is CPU-bound, so the async
/// entry point hands the work to tokio's blocking pool.
use iced::widget::image::Handle;
use image::DynamicImage;
use std::path::{Path, PathBuf};
use tokio::task;

use super::inspector::read_entry;
use super::thumbnail::{shrink, to_handle};
use crate::config::ThumbSize;
use crate::error::Result;
use crate::state::session::Rotation;

/// Render a page in the background.
///
/// # Returns
/// * `Ok(handle)` - Bitmap ready for the reader view
/// * `Err(String)` - "page unavailable" message to show instead
pub async fn render_page(
    archive: PathBuf,
    entry: String,
    rotation: Rotation,
    max: ThumbSize,
) -> std::result::Result<Handle, String> {
    task::spawn_blocking(move || {
        render_page_blocking(&archive, &entry, rotation, max).map_err(|e| e.to_string())
    })
    .await
    .map_err(|e| format!("Task join error: {}", e))?
}

/// Blocking implementation of page rendering
pub fn render_page_blocking(
    archive: &Path,
    entry: &str,
    rotation: Rotation,
    max: ThumbSize,
) -> Result<Handle> {
    let img = read_entry(archive, entry)?;
    log::debug!("🖼️  Rendering {} at {}°", entry, rotation.degrees());
    let img = rotate(img, rotation);
    Ok(to_handle(&shrink(&img, max)))
}

/// Rotate clockwise; quarter turns swap width and height
pub fn rotate(img: DynamicImage, rotation: Rotation) -> DynamicImage {
    match rotation {
        Rotation::Upright => img,
        Rotation::Quarter => img.rotate90(),
        Rotation::Half => img.rotate180(),
        Rotation::ThreeQuarters => img.rotate270(),
    }
}

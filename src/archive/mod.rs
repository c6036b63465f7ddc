/// Comic archive module
///
/// This module handles:
/// - Listing and decoding the pages of .cbz/.zip archives
/// - Generating grid thumbnails (and gray placeholders)
/// - Rendering reader pages off the UI thread

pub mod inspector;
pub mod thumbnail;
pub mod page;

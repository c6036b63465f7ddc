/// State management module
///
/// This module handles all browsing and reading state:
/// - Library root and directory scanning (library.rs)
/// - Shared data structures (data.rs)
/// - The reading session / page cursor (session.rs)
/// - Screen construction and back/forward routing (navigator.rs)
/// - Background-loaded grid thumbnails (thumbnails.rs)

pub mod library;
pub mod data;
pub mod session;
pub mod navigator;
pub mod thumbnails;

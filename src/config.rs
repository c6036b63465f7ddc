/// Kiosk configuration
///
/// A single JSON file holds the library root and a handful of display
/// settings. The kiosk never writes it; it is edited by hand when the
/// device is set up.
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::Result;

/// Width/height cap for a generated bitmap
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbSize {
    pub width: u32,
    pub height: u32,
}

impl ThumbSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// How the first screen is chosen
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EntryMode {
    /// Recursive folder picker starting at the library root
    #[default]
    Folders,
    /// Book picker over the library root's folders
    Books,
}

/// All kiosk settings
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Root of the browsing tree (must exist and be a directory)
    pub library_root: PathBuf,

    /// Which screen the kiosk starts on
    pub entry: EntryMode,

    /// Delay before a freshly opened screen switches to fullscreen
    pub fullscreen_delay_ms: u64,

    /// Thumbnail cap for folder and book grids (smaller for slow boards)
    pub folder_thumb: ThumbSize,

    /// Thumbnail cap for chapter grids
    pub chapter_thumb: ThumbSize,

    /// Largest bitmap handed to the reader view
    pub page_max: ThumbSize,
}

impl Default for Config {
    fn default() -> Self {
        let library_root = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("Comics");

        Self {
            library_root,
            entry: EntryMode::Folders,
            fullscreen_delay_ms: 5000,
            folder_thumb: ThumbSize::new(160, 240),
            chapter_thumb: ThumbSize::new(200, 300),
            page_max: ThumbSize::new(1920, 1080),
        }
    }
}

impl Config {
    /// Load the configuration file, falling back to defaults when absent.
    ///
    /// The file lives in the user's config directory:
    /// - Linux: ~/.config/comic-kiosk/config.json
    /// - macOS: ~/Library/Application Support/comic-kiosk/config.json
    /// - Windows: %APPDATA%\comic-kiosk\config.json
    pub fn load() -> Result<Self> {
        let Some(path) = Self::config_path() else {
            return Ok(Self::default());
        };

        if !path.exists() {
            log::info!("⚙️  No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let json = fs::read_to_string(&path)?;
        let config = Self::from_json(&json)?;
        log::info!("⚙️  Loaded config from {}", path.display());
        Ok(config)
    }

    /// Get the path where the configuration file is expected
    pub fn config_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir()?;
        path.push("comic-kiosk");
        path.push("config.json");
        Some(path)
    }

    pub fn fullscreen_delay(&self) -> Duration {
        Duration::from_millis(self.fullscreen_delay_ms)
    }

    /// Convert to a JSON string
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse from a JSON string; missing fields take their defaults
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.entry, EntryMode::Folders);
        assert_eq!(config.fullscreen_delay(), Duration::from_secs(5));
        assert!(config.library_root.ends_with("Comics"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::from_json(r#"{ "library_root": "/srv/comics", "entry": "books" }"#)
            .unwrap();

        assert_eq!(config.library_root, PathBuf::from("/srv/comics"));
        assert_eq!(config.entry, EntryMode::Books);
        assert_eq!(config.chapter_thumb, ThumbSize::new(200, 300));
    }

    #[test]
    fn test_serialization() {
        let mut config = Config::default();
        config.fullscreen_delay_ms = 0;
        config.page_max = ThumbSize::new(800, 480);

        let json = config.to_json().unwrap();
        let restored = Config::from_json(&json).unwrap();

        assert_eq!(config, restored);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        assert!(Config::from_json("{ library_root: ").is_err());
    }
}

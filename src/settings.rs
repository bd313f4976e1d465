//! User settings stored as settings.json in the app data directory

use crate::constants::{DEFAULT_LANGUAGE, DEFAULT_PAGE_COUNT, DEFAULT_SHOP_ID};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Window geometry
    pub window_x: Option<f32>,
    pub window_y: Option<f32>,
    pub window_w: Option<f32>,
    pub window_h: Option<f32>,

    // Catalog source
    pub shop_id: String,
    pub language: String,
    pub page_count: u32,
    pub request_timeout_secs: u64,
    pub max_image_downloads: usize,

    // View
    pub large_cards: bool,

    // Fall back to the cached catalog instead of the error panel
    pub show_cached_on_error: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_x: None,
            window_y: None,
            window_w: None,
            window_h: None,
            shop_id: DEFAULT_SHOP_ID.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            page_count: DEFAULT_PAGE_COUNT,
            request_timeout_secs: 20,
            max_image_downloads: 8,
            large_cards: true,
            show_cached_on_error: false,
        }
    }
}

impl Settings {
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join("settings.json");
        match std::fs::read_to_string(&path) {
            Ok(s) => match serde_json::from_str(&s) {
                Ok(settings) => {
                    debug!(path = %path.display(), "Settings loaded");
                    settings
                }
                Err(e) => {
                    warn!(error = %e, "Failed to parse settings, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                debug!("No settings file found, using defaults");
                Self::default()
            }
        }
    }

    pub fn save(&self, data_dir: &Path) {
        let path = data_dir.join("settings.json");
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&path, json) {
                    warn!(error = %e, "Failed to save settings");
                }
            }
            Err(e) => warn!(error = %e, "Failed to serialize settings"),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(dir.path());
        assert_eq!(settings.shop_id, "68237358");
        assert_eq!(settings.page_count, 9);
        assert_eq!(settings.language, "en");
        assert!(!settings.show_cached_on_error);
    }

    #[test]
    fn test_corrupt_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("settings.json"), "{ not json").unwrap();
        let settings = Settings::load(dir.path());
        assert_eq!(settings.page_count, 9);
    }

    #[test]
    fn test_partial_file_fills_missing_fields() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{"shop_id": "12345", "page_count": 3}"#,
        )
        .unwrap();
        let settings = Settings::load(dir.path());
        assert_eq!(settings.shop_id, "12345");
        assert_eq!(settings.page_count, 3);
        assert_eq!(settings.max_image_downloads, 8);
        assert!(settings.large_cards);
    }

    #[test]
    fn test_saved_settings_are_reloaded() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            show_cached_on_error: true,
            large_cards: false,
            ..Settings::default()
        };
        settings.save(dir.path());

        let loaded = Settings::load(dir.path());
        assert!(loaded.show_cached_on_error);
        assert!(!loaded.large_cards);
    }

    #[test]
    fn test_zero_timeout_is_clamped() {
        let settings = Settings {
            request_timeout_secs: 0,
            ..Settings::default()
        };
        assert_eq!(settings.request_timeout(), Duration::from_secs(1));
    }
}

//! Host settings with persistence
//!
//! Settings are saved to `~/.config/relic/settings.toml`

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use relic_core::Color;
use relic_viewer::ViewerConfig;

/// All host settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    pub backend: BackendSettings,
    pub viewer: ViewerSettings,
}

/// Where the scan backend lives
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendSettings {
    pub base_url: String,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".into(),
        }
    }
}

/// Viewer tunables the host exposes, with palette overrides as hex strings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerSettings {
    /// Maximum number of pickable faces
    pub face_cap: usize,
    /// Vertical field of view in degrees
    pub fov: f32,
    /// Default face color, hex
    pub default_color: String,
    /// Selection highlight, hex
    pub selected_color: String,
    /// Hover highlight, hex
    pub hovered_color: String,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        let defaults = ViewerConfig::default();
        Self {
            face_cap: defaults.face_cap,
            fov: defaults.fov_degrees,
            default_color: defaults.default_color.to_hex_string(),
            selected_color: defaults.selected_color.to_hex_string(),
            hovered_color: defaults.hovered_color.to_hex_string(),
        }
    }
}

impl Settings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("relic"))
    }

    /// Get the settings file path
    fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.toml"))
    }

    /// Load settings, writing the defaults to disk on first run so the
    /// file exists for hand-editing.
    pub fn load_or_init() -> Self {
        let settings = Self::load();
        if let Some(path) = Self::settings_path() {
            if !path.exists() {
                if let Err(e) = settings.save() {
                    warn!("Failed to write default settings: {}", e);
                }
            }
        }
        settings
    }

    /// Load settings from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            warn!("Could not determine config directory");
            return Self::default();
        };

        if !path.exists() {
            info!("No settings file found, using defaults");
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(settings) => {
                    info!("Loaded settings from {:?}", path);
                    settings
                }
                Err(e) => {
                    warn!("Failed to parse settings: {}, using defaults", e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read settings file: {}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Save settings to disk
    pub fn save(&self) -> anyhow::Result<()> {
        let Some(dir) = Self::config_dir() else {
            anyhow::bail!("Could not determine config directory");
        };
        self.save_to(&dir)
    }

    fn save_to(&self, dir: &Path) -> anyhow::Result<()> {
        let path = dir.join("settings.toml");

        if !dir.exists() {
            fs::create_dir_all(dir)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        info!("Saved settings to {:?}", path);
        Ok(())
    }

    /// Build a [`ViewerConfig`], keeping built-in colors for any override
    /// that fails to parse.
    pub fn viewer_config(&self) -> ViewerConfig {
        let mut config = ViewerConfig {
            face_cap: self.viewer.face_cap,
            fov_degrees: self.viewer.fov,
            ..Default::default()
        };
        config.default_color = parse_or(&self.viewer.default_color, config.default_color);
        config.selected_color = parse_or(&self.viewer.selected_color, config.selected_color);
        config.hovered_color = parse_or(&self.viewer.hovered_color, config.hovered_color);
        config
    }
}

fn parse_or(hex: &str, fallback: Color) -> Color {
    match Color::from_hex_str(hex) {
        Ok(color) => color,
        Err(e) => {
            warn!("Invalid color override {:?}: {}, keeping default", hex, e);
            fallback
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_round_trip_through_viewer_config() {
        let settings = Settings::default();
        let config = settings.viewer_config();
        let reference = ViewerConfig::default();
        assert_eq!(config.face_cap, reference.face_cap);
        assert_eq!(config.default_color, reference.default_color);
        assert_eq!(config.selected_color, reference.selected_color);
    }

    #[test]
    fn bad_color_override_keeps_default() {
        let mut settings = Settings::default();
        settings.viewer.hovered_color = "not-a-color".into();
        let config = settings.viewer_config();
        assert_eq!(config.hovered_color, ViewerConfig::default().hovered_color);
    }

    #[test]
    fn save_writes_readable_settings_file() {
        let dir = std::env::temp_dir().join("relic-settings-test");
        fs::remove_dir_all(&dir).ok();

        let settings = Settings::default();
        settings.save_to(&dir).unwrap();

        let content = fs::read_to_string(dir.join("settings.toml")).unwrap();
        let back: Settings = toml::from_str(&content).unwrap();
        assert_eq!(back.backend.base_url, settings.backend.base_url);
        assert_eq!(back.viewer.face_cap, settings.viewer.face_cap);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn settings_serialize_as_toml() {
        let settings = Settings::default();
        let toml = toml::to_string_pretty(&settings).unwrap();
        assert!(toml.contains("base_url"));
        assert!(toml.contains("face_cap"));
        let back: Settings = toml::from_str(&toml).unwrap();
        assert_eq!(back.viewer.face_cap, settings.viewer.face_cap);
    }
}

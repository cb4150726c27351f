use std::path::{Path, PathBuf};

use gridforge_core::GridSpec;
use serde::{Deserialize, Serialize};

const CONFIG_DIR_NAME: &str = "gridforge";
const CONFIG_FILE_NAME: &str = "viewer.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read viewer config: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed viewer config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Viewer settings, stored as JSON next to the other per-user config files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub window_size: [f32; 2],
    /// Snap radius around the pointer, in screen pixels.
    pub snap_tolerance_px: f64,
    /// Artboard origins closer than this on screen share one grid.
    pub origin_epsilon_px: f64,
    /// Grid spacing is doubled until it is at least this wide on screen.
    pub min_grid_spacing_px: f64,
    pub grid: GridSpec,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            window_size: [1280.0, 800.0],
            snap_tolerance_px: 8.0,
            origin_epsilon_px: 1.0,
            min_grid_spacing_px: 12.0,
            grid: GridSpec::default(),
        }
    }
}

impl ViewerConfig {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Config from the first command-line argument, or the per-user config
    /// file. Problems are logged and fall back to the defaults.
    pub fn load(arg: Option<PathBuf>) -> Self {
        let Some(path) = arg.or_else(Self::default_path) else {
            log::warn!("No config directory available, using default viewer settings");
            return Self::default();
        };
        match Self::load_from_file(&path) {
            Ok(config) => {
                log::info!("Viewer settings from {}", path.display());
                config
            }
            Err(err) => {
                log::warn!("Ignoring {}: {}", path.display(), err);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridforge_core::GridOriginMode;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("gridforge-test-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = ViewerConfig::load_from_file(&scratch_path("missing.json")).unwrap();
        assert_eq!(config, ViewerConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let path = scratch_path("saved/viewer.json");
        let config = ViewerConfig {
            snap_tolerance_px: 4.0,
            grid: GridSpec::isometric(20.0, 30.0).with_origin_mode(GridOriginMode::Artboard),
            ..ViewerConfig::default()
        };
        config.save_to_file(&path).unwrap();

        assert_eq!(ViewerConfig::load_from_file(&path).unwrap(), config);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_partial_file_fills_in_defaults() {
        let path = scratch_path("partial.json");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, r#"{ "snap_tolerance_px": 3.5 }"#).unwrap();

        let config = ViewerConfig::load_from_file(&path).unwrap();
        assert_eq!(config.snap_tolerance_px, 3.5);
        assert_eq!(config.grid, GridSpec::default());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_malformed_file() {
        let path = scratch_path("malformed.json");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(ViewerConfig::load_from_file(&path), Err(ConfigError::Parse(_))));
        assert_eq!(ViewerConfig::load(Some(path.clone())), ViewerConfig::default());
        let _ = std::fs::remove_file(&path);
    }
}

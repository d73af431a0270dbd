//! Configuration and settings management for PlanoKit
//!
//! Provides configuration file handling and validation. Supports JSON and
//! TOML file formats stored in platform-specific directories.
//!
//! Configuration is organized into logical sections:
//! - Editor settings (grid, snapping, display units, wall tolerance)
//! - Planogram defaults (facing quantities)
//! - Scene settings (store room size)
//! - Storage settings (data directory)

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub use planokit_core::UnitSystem;
use planokit_designer::canvas::{CanvasSettings, DEFAULT_GRID_SIZE};
use planokit_designer::designer_state::DEFAULT_HISTORY_LIMIT;
use planokit_designer::planogram::{DEFAULT_QUANTITY, MAX_QUANTITY};
use planokit_designer::validity::WALL_ADJACENCY_TOLERANCE;
use planokit_designer::DesignerSettings;

use crate::error::{SettingsError, SettingsResult};

/// Upper bound accepted for the facing quantity limit.
const QUANTITY_CEILING: u32 = 99;

/// 2D editor preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Snap grid spacing in plan units
    pub grid_size: f64,
    pub snap_enabled: bool,
    /// Units used when displaying dimensions
    pub unit_system: UnitSystem,
    pub show_dimensions: bool,
    /// Maximum gap between a door or window and its wall
    pub wall_tolerance: f64,
    /// Number of undo steps kept
    pub history_limit: usize,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            snap_enabled: true,
            unit_system: UnitSystem::Centimeters,
            show_dimensions: true,
            wall_tolerance: WALL_ADJACENCY_TOLERANCE,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

/// Planogram defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanogramSettings {
    /// Quantity given to a freshly dropped product
    pub default_quantity: u32,
    pub max_quantity: u32,
}

impl Default for PlanogramSettings {
    fn default() -> Self {
        Self {
            default_quantity: DEFAULT_QUANTITY,
            max_quantity: MAX_QUANTITY,
        }
    }
}

/// Store scene settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSettings {
    /// Room width in metres
    pub room_width: f64,
    /// Room depth in metres
    pub room_depth: f64,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            room_width: 20.0,
            room_depth: 20.0,
        }
    }
}

/// Where plans, furniture and layouts are stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub data_dir: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_dir: dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("planokit"),
        }
    }
}

/// Complete application configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub editor: EditorSettings,
    pub planogram: PlanogramSettings,
    pub scene: SceneSettings,
    pub storage: StorageSettings,
}

enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> SettingsResult<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        other => Err(SettingsError::UnsupportedFormat(
            other.unwrap_or("none").to_string(),
        )),
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Default config file location: `<config dir>/planokit/config.toml`.
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("planokit").join("config.toml"))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("no configuration directory on this platform".to_string())
            })
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = format_of(path)?;
        let content = std::fs::read_to_string(path)?;
        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };
        config.validate()?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Loads `path` when it exists, defaults otherwise.
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            tracing::info!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;
        let content = match format_of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        let editor = &self.editor;
        if !(editor.grid_size.is_finite() && editor.grid_size > 0.0) {
            return Err(SettingsError::invalid("editor.grid_size", "must be > 0"));
        }
        if !(editor.wall_tolerance.is_finite() && editor.wall_tolerance >= 0.0) {
            return Err(SettingsError::invalid("editor.wall_tolerance", "must be >= 0"));
        }
        if editor.history_limit == 0 {
            return Err(SettingsError::invalid("editor.history_limit", "must be > 0"));
        }

        let planogram = &self.planogram;
        if planogram.max_quantity == 0 || planogram.max_quantity > QUANTITY_CEILING {
            return Err(SettingsError::invalid(
                "planogram.max_quantity",
                format!("must be between 1 and {}", QUANTITY_CEILING),
            ));
        }
        if planogram.default_quantity == 0 || planogram.default_quantity > planogram.max_quantity {
            return Err(SettingsError::invalid(
                "planogram.default_quantity",
                "must be between 1 and max_quantity",
            ));
        }

        if !(self.scene.room_width > 0.0 && self.scene.room_depth > 0.0) {
            return Err(SettingsError::invalid("scene", "room size must be > 0"));
        }
        Ok(())
    }

    /// Settings an editor state is created with.
    pub fn designer_settings(&self) -> DesignerSettings {
        DesignerSettings {
            canvas: CanvasSettings {
                snap_enabled: self.editor.snap_enabled,
                grid_size: self.editor.grid_size,
                wall_tolerance: self.editor.wall_tolerance,
            },
            default_quantity: self.planogram.default_quantity,
            max_quantity: self.planogram.max_quantity,
            room_width: self.scene.room_width,
            room_depth: self.scene.room_depth,
            history_limit: self.editor.history_limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.editor.grid_size, 20.0);
        assert!(config.editor.snap_enabled);
        assert_eq!(config.editor.unit_system, UnitSystem::Centimeters);
        assert_eq!(config.editor.wall_tolerance, 10.0);
        assert_eq!(config.planogram.max_quantity, 20);
        assert!(config.validate().is_ok());
        assert_eq!(config.designer_settings(), DesignerSettings::default());
    }

    #[test]
    fn test_validation() {
        let mut config = Config::default();
        config.editor.grid_size = 0.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.planogram.default_quantity = 25;
        assert!(matches!(
            config.validate(),
            Err(SettingsError::InvalidSetting { ref key, .. }) if key == "planogram.default_quantity"
        ));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [editor]
            grid_size = 10.0
            unit_system = "m"
            "#,
        )
        .unwrap();
        assert_eq!(config.editor.grid_size, 10.0);
        assert_eq!(config.editor.unit_system, UnitSystem::Meters);
        assert!(config.editor.snap_enabled);
        assert_eq!(config.scene, SceneSettings::default());
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        assert!(matches!(
            Config::default().save_to_file(&path),
            Err(SettingsError::UnsupportedFormat(_))
        ));
    }
}

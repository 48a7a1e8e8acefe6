//! Shop configuration
//!
//! Provides configuration file handling and validation for shop-wide
//! defaults. Stored as JSON, organized into logical sections:
//! - Cut defaults (kerf, separation behavior)
//! - Stock defaults (grade, grain, thickness floor)
//! - Project file handling
//! - Display preferences

use crate::constants::{BOARD_THICKNESS_FLOOR_IN, DEFAULT_KERF_IN};
use crate::data::{Grade, Grain, SeparationMode};
use crate::units::MeasurementSystem;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Saw and cut defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CutSettings {
    /// Kerf applied when a cut does not specify one, in inches
    pub default_kerf: f64,
    /// How cut pieces are parted in world space
    #[serde(default)]
    pub separation: SeparationMode,
}

impl Default for CutSettings {
    fn default() -> Self {
        Self {
            default_kerf: DEFAULT_KERF_IN,
            separation: SeparationMode::KerfCentered,
        }
    }
}

/// Fresh-stock defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockSettings {
    /// Grade assigned to new boards when none is given
    #[serde(default)]
    pub default_grade: Grade,
    /// Grain orientation assigned to new boards when none is given
    #[serde(default)]
    pub default_grain: Grain,
    /// Minimum board thickness in inches
    pub thickness_floor: f64,
}

impl Default for StockSettings {
    fn default() -> Self {
        Self {
            default_grade: Grade::Select,
            default_grain: Grain::Vertical,
            thickness_floor: BOARD_THICKNESS_FLOOR_IN,
        }
    }
}

/// Project file handling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSettings {
    /// Directory where project files are kept
    pub projects_dir: PathBuf,
    /// Write project JSON pretty-printed
    pub pretty_json: bool,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            projects_dir: PathBuf::from("projects"),
            pretty_json: true,
        }
    }
}

/// Display preferences
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplaySettings {
    /// Measurement system for report labeling
    #[serde(default)]
    pub measurement_system: MeasurementSystem,
}

/// Complete shop configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ShopConfig {
    /// Cut defaults
    pub cut: CutSettings,
    /// Stock defaults
    pub stock: StockSettings,
    /// Project file handling
    pub project: ProjectSettings,
    /// Display preferences
    pub display: DisplaySettings,
}

impl ShopConfig {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::other(format!("Failed to read config file: {}", e)))?;

        let config: Self = serde_json::from_str(&content)
            .map_err(|e| Error::other(format!("Invalid JSON config: {}", e)))?;

        config.validate()?;
        tracing::debug!(path = %path.display(), "Loaded shop config");
        Ok(config)
    }

    /// Save config to a JSON file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        self.validate()?;

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| Error::other(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| Error::other(format!("Failed to write config file: {}", e)))?;

        tracing::debug!(path = %path.display(), "Saved shop config");
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.cut.default_kerf <= 0.0 {
            return Err(Error::other("Default kerf must be > 0".to_string()));
        }

        if let SeparationMode::FixedGap { gap } = self.cut.separation {
            if gap <= 0.0 {
                return Err(Error::other("Fixed separation gap must be > 0".to_string()));
            }
        }

        // Parts reject anything thinner than the hard floor, so a laxer
        // configured value would be a promise the store cannot keep.
        if self.stock.thickness_floor < BOARD_THICKNESS_FLOOR_IN {
            return Err(Error::other(format!(
                "Thickness floor must be at least {} in",
                BOARD_THICKNESS_FLOOR_IN
            )));
        }

        Ok(())
    }
}

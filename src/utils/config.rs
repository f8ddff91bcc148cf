//! JSON configuration for scale, board placement, glasses and wands

use crate::core::constants::{MAX_FOV_DEG, MIN_FOV_DEG};
use crate::core::gameboard::{GameboardDimensions, GameboardType};
use crate::core::settings::{
    euler_zxy_degrees, GameboardSettings, GlassesMirrorMode, GlassesSettings, ScaleSettings, WandSettings,
};
use crate::core::types::{ControllerIndex, Pose, WorldSpace};
use crate::core::units::LengthUnit;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Content scale section
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleConfig {
    pub content_scale_ratio: f64,
    pub content_scale_unit: LengthUnit,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        let scale = ScaleSettings::default();
        Self {
            content_scale_ratio: scale.content_scale_ratio,
            content_scale_unit: scale.content_scale_unit,
        }
    }
}

/// Board placement section
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameboardConfig {
    pub center: [f64; 3],
    /// Euler angles in degrees, applied z, x, y
    pub rotation_euler_deg: [f64; 3],
    pub scale: f64,
    pub board_type: GameboardType,
    pub dimensions: GameboardDimensions,
}

impl Default for GameboardConfig {
    fn default() -> Self {
        Self {
            center: [0.0; 3],
            rotation_euler_deg: [0.0; 3],
            scale: 1.0,
            board_type: GameboardType::Le,
            dimensions: GameboardDimensions::default(),
        }
    }
}

/// World-space preview head pose
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PreviewPoseConfig {
    pub position: [f64; 3],
    pub rotation_euler_deg: [f64; 3],
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlassesConfig {
    pub override_fov: bool,
    pub custom_fov_deg: f64,
    pub mirror_mode: GlassesMirrorMode,
    pub use_preview_pose: bool,
    pub preview_pose: Option<PreviewPoseConfig>,
}

impl Default for GlassesConfig {
    fn default() -> Self {
        let glasses = GlassesSettings::default();
        Self {
            override_fov: glasses.override_fov,
            custom_fov_deg: glasses.custom_fov_deg,
            mirror_mode: glasses.mirror_mode,
            use_preview_pose: glasses.use_preview_pose,
            preview_pose: None,
        }
    }
}

/// Complete configuration file contents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    pub scale: ScaleConfig,
    pub gameboard: GameboardConfig,
    pub glasses: GlassesConfig,
    pub wands: Vec<WandSettings>,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            scale: ScaleConfig::default(),
            gameboard: GameboardConfig::default(),
            glasses: GlassesConfig::default(),
            wands: ControllerIndex::ALL.iter().map(|&index| WandSettings::new(index)).collect(),
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("invalid parameter {parameter} = {value}: {reason}")]
    InvalidParameter { parameter: String, value: String, reason: String },
    #[error("wand controller index {index} configured more than once")]
    DuplicateController { index: ControllerIndex },
    #[error("I/O error: {message}")]
    IoError { message: String },
    #[error("serialization error: {message}")]
    SerializationError { message: String },
}

/// Configuration validation result
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ConfigError>,
    /// Accepted but adjusted at runtime
    pub warnings: Vec<String>,
}

/// Owns the active configuration and its file
#[derive(Debug, Clone, Default)]
pub struct ConfigurationManager {
    config: TrackingConfig,
    config_file_path: Option<PathBuf>,
    is_modified: bool,
}

impl ConfigurationManager {
    /// Create a configuration manager with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create configuration manager and load from file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut manager = Self::new();
        manager.load_from_file(path)?;
        Ok(manager)
    }

    pub fn config(&self) -> &TrackingConfig {
        &self.config
    }

    /// Replace the configuration; rejected if validation reports any error.
    pub fn update_config(&mut self, config: TrackingConfig) -> Result<(), ConfigError> {
        Self::accept(&config)?;
        self.config = config;
        self.is_modified = true;
        Ok(())
    }

    pub fn set_content_scale(&mut self, ratio: f64, unit: LengthUnit) -> Result<(), ConfigError> {
        let mut config = self.config.clone();
        config.scale = ScaleConfig {
            content_scale_ratio: ratio,
            content_scale_unit: unit,
        };
        self.update_config(config)
    }

    pub fn set_gameboard_type(&mut self, board_type: GameboardType) {
        self.config.gameboard.board_type = board_type;
        self.is_modified = true;
    }

    /// Load configuration from JSON file
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            message: format!("Failed to read config file '{}': {}", path.display(), e),
        })?;

        let config: TrackingConfig = serde_json::from_str(&content).map_err(|e| ConfigError::SerializationError {
            message: format!("Failed to parse config file '{}': {}", path.display(), e),
        })?;

        Self::accept(&config)?;
        info!(path = %path.display(), wands = config.wands.len(), "loaded tracking configuration");

        self.config = config;
        self.config_file_path = Some(path.to_path_buf());
        self.is_modified = false;
        Ok(())
    }

    /// Save configuration to JSON file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(&self.config).map_err(|e| ConfigError::SerializationError {
            message: format!("Failed to serialize config: {}", e),
        })?;

        fs::write(path, content).map_err(|e| ConfigError::IoError {
            message: format!("Failed to write config file '{}': {}", path.display(), e),
        })?;

        self.config_file_path = Some(path.to_path_buf());
        self.is_modified = false;
        Ok(())
    }

    /// Save to the currently loaded file path
    pub fn save(&mut self) -> Result<(), ConfigError> {
        match self.config_file_path.clone() {
            Some(path) => self.save_to_file(path),
            None => Err(ConfigError::IoError {
                message: "No file path set for saving configuration".to_string(),
            }),
        }
    }

    /// Check if configuration has been modified since last save
    pub fn is_modified(&self) -> bool {
        self.is_modified
    }

    pub fn validate(&self) -> ValidationResult {
        Self::validate_config(&self.config)
    }

    pub fn validate_config(config: &TrackingConfig) -> ValidationResult {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        let ratio = config.scale.content_scale_ratio;
        if !(ratio.is_finite() && ratio > 0.0) {
            errors.push(ConfigError::InvalidParameter {
                parameter: "scale.content_scale_ratio".to_string(),
                value: ratio.to_string(),
                reason: "must be a positive finite number".to_string(),
            });
        }

        let board_scale = config.gameboard.scale;
        if !(board_scale.is_finite() && board_scale > 0.0) {
            errors.push(ConfigError::InvalidParameter {
                parameter: "gameboard.scale".to_string(),
                value: board_scale.to_string(),
                reason: "must be a positive finite number".to_string(),
            });
        }

        if config.gameboard.center.iter().any(|c| !c.is_finite()) {
            errors.push(ConfigError::InvalidParameter {
                parameter: "gameboard.center".to_string(),
                value: format!("{:?}", config.gameboard.center),
                reason: "must be finite".to_string(),
            });
        }

        if !config.gameboard.dimensions.is_valid() {
            errors.push(ConfigError::InvalidParameter {
                parameter: "gameboard.dimensions".to_string(),
                value: format!(
                    "{} x {} (border {})",
                    config.gameboard.dimensions.playable_x,
                    config.gameboard.dimensions.playable_y,
                    config.gameboard.dimensions.border_width
                ),
                reason: "playable size must be positive and border non-negative".to_string(),
            });
        }

        let fov = config.glasses.custom_fov_deg;
        if config.glasses.override_fov && !(MIN_FOV_DEG..=MAX_FOV_DEG).contains(&fov) {
            warnings.push(format!(
                "custom field of view {}° is outside [{}°, {}°] and will be clamped",
                fov, MIN_FOV_DEG, MAX_FOV_DEG
            ));
        }

        if config.glasses.use_preview_pose && config.glasses.preview_pose.is_none() {
            warnings.push("use_preview_pose is set but no preview pose is configured".to_string());
        }

        let mut seen = Vec::new();
        for wand in &config.wands {
            if seen.contains(&wand.controller_index) {
                errors.push(ConfigError::DuplicateController {
                    index: wand.controller_index,
                });
            } else {
                seen.push(wand.controller_index);
            }
        }

        if config.wands.is_empty() {
            warnings.push("no wands configured".to_string());
        }

        ValidationResult {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    /// Validate, log warnings and fail on the first error
    fn accept(config: &TrackingConfig) -> Result<(), ConfigError> {
        let validation = Self::validate_config(config);
        for warning in &validation.warnings {
            warn!("{}", warning);
        }
        match validation.errors.into_iter().next() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    pub fn scale_settings(&self) -> ScaleSettings {
        ScaleSettings::new(self.config.scale.content_scale_ratio, self.config.scale.content_scale_unit)
    }

    pub fn gameboard_settings(&self) -> GameboardSettings {
        let board = &self.config.gameboard;
        let [x, y, z] = board.center;
        let mut settings = GameboardSettings::from_euler_degrees(Point3::new(x, y, z), board.rotation_euler_deg, board.scale)
            .with_board_type(board.board_type);
        settings.dimensions = board.dimensions;
        settings
    }

    pub fn glasses_settings(&self) -> GlassesSettings {
        let glasses = &self.config.glasses;
        GlassesSettings {
            override_fov: glasses.override_fov,
            custom_fov_deg: glasses.custom_fov_deg,
            mirror_mode: glasses.mirror_mode,
            use_preview_pose: glasses.use_preview_pose,
            preview_pose: glasses.preview_pose.map(|preview| {
                let [x, y, z] = preview.position;
                Pose::<WorldSpace>::new(Point3::new(x, y, z), euler_zxy_degrees(preview.rotation_euler_deg))
            }),
        }
    }

    pub fn wand_settings(&self) -> &[WandSettings] {
        &self.config.wands
    }
}

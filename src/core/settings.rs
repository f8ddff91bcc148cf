//! Host-supplied settings read by the tracking core each cycle
//!
//! These are plain value objects. The host mutates them between cycles;
//! the tracking core only ever borrows them for the duration of one update.

use crate::algorithms::frame_conversion::ConversionError;
use crate::core::constants::*;
use crate::core::gameboard::{GameboardDimensions, GameboardType};
use crate::core::types::{ControllerIndex, Pose, WorldSpace};
use crate::core::units::{Length, LengthUnit};
use nalgebra::{Point3, Unit, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

/// Smallest rotation axis length accepted by [`GameboardSettings::from_axis_angle`]
const MIN_AXIS_NORM: f64 = 1.0e-9;

/// Physical-to-virtual content scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleSettings {
    /// How many `content_scale_unit`s one world unit spans
    pub content_scale_ratio: f64,
    pub content_scale_unit: LengthUnit,
}

impl Default for ScaleSettings {
    fn default() -> Self {
        Self {
            content_scale_ratio: DEFAULT_CONTENT_SCALE_RATIO,
            content_scale_unit: LengthUnit::Centimeters,
        }
    }
}

impl ScaleSettings {
    pub fn new(content_scale_ratio: f64, content_scale_unit: LengthUnit) -> Self {
        Self {
            content_scale_ratio,
            content_scale_unit,
        }
    }

    /// One world unit equals one physical meter
    pub fn meters() -> Self {
        Self::new(1.0, LengthUnit::Meters)
    }

    pub fn physical_meters_per_world_unit(&self) -> f64 {
        Length::new(self.content_scale_ratio, self.content_scale_unit).to_meters()
    }

    pub fn world_units_per_physical_meter(&self) -> f64 {
        1.0 / self.physical_meters_per_world_unit()
    }

    pub fn one_unit_length_in_meters(&self) -> f64 {
        self.physical_meters_per_world_unit()
    }

    /// Physical meters covered by one world unit once the board scale is applied.
    ///
    /// Gameboard-space lengths are divided by this factor to get world units.
    pub fn content_scale_factor(&self, gameboard_scale: f64) -> Result<f64, ConversionError> {
        let factor = self.physical_meters_per_world_unit() * gameboard_scale;
        if factor.is_finite() && factor > 0.0 {
            Ok(factor)
        } else {
            Err(ConversionError::DegenerateScale { factor })
        }
    }
}

/// Placement of the physical board in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameboardSettings {
    pub center: Point3<f64>,
    pub rotation: UnitQuaternion<f64>,
    pub scale: f64,
    /// Board currently reported as active
    pub board_type: GameboardType,
    pub dimensions: GameboardDimensions,
}

impl Default for GameboardSettings {
    fn default() -> Self {
        Self {
            center: Point3::origin(),
            rotation: UnitQuaternion::identity(),
            scale: 1.0,
            board_type: GameboardType::Le,
            dimensions: GameboardDimensions::default(),
        }
    }
}

impl GameboardSettings {
    pub fn new(center: Point3<f64>, rotation: UnitQuaternion<f64>, scale: f64) -> Self {
        Self {
            center,
            rotation,
            scale,
            ..Default::default()
        }
    }

    /// Rotation from engine Euler angles in degrees (applied z, then x, then y).
    pub fn from_euler_degrees(center: Point3<f64>, euler_deg: [f64; 3], scale: f64) -> Self {
        Self::new(center, euler_zxy_degrees(euler_deg), scale)
    }

    /// Rotation from an axis and an angle in degrees; a zero-length axis is rejected.
    pub fn from_axis_angle(
        center: Point3<f64>,
        axis: Vector3<f64>,
        angle_deg: f64,
        scale: f64,
    ) -> Result<Self, ConversionError> {
        let axis = Unit::try_new(axis, MIN_AXIS_NORM).ok_or(ConversionError::DegenerateAxis)?;
        Ok(Self::new(
            center,
            UnitQuaternion::from_axis_angle(&axis, angle_deg.to_radians()),
            scale,
        ))
    }

    pub fn with_board_type(mut self, board_type: GameboardType) -> Self {
        self.board_type = board_type;
        self
    }
}

/// Engine-convention Euler rotation: z first, then x, then y.
pub fn euler_zxy_degrees(euler_deg: [f64; 3]) -> UnitQuaternion<f64> {
    let [x, y, z] = euler_deg;
    UnitQuaternion::from_axis_angle(&Vector3::y_axis(), y.to_radians())
        * UnitQuaternion::from_axis_angle(&Vector3::x_axis(), x.to_radians())
        * UnitQuaternion::from_axis_angle(&Vector3::z_axis(), z.to_radians())
}

/// How the glasses' view is mirrored to the host display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GlassesMirrorMode {
    None,
    #[default]
    LeftEye,
    RightEye,
    Stereoscopic,
}

/// Configuration for the glasses trackable
#[derive(Debug, Clone, PartialEq)]
pub struct GlassesSettings {
    pub override_fov: bool,
    pub custom_fov_deg: f64,
    pub mirror_mode: GlassesMirrorMode,
    /// Use `preview_pose` as the fallback head pose while the glasses are unavailable
    pub use_preview_pose: bool,
    pub preview_pose: Option<Pose<WorldSpace>>,
}

impl Default for GlassesSettings {
    fn default() -> Self {
        Self {
            override_fov: false,
            custom_fov_deg: DEFAULT_FOV_DEG,
            mirror_mode: GlassesMirrorMode::default(),
            use_preview_pose: true,
            preview_pose: None,
        }
    }
}

impl GlassesSettings {
    pub fn field_of_view(&self) -> f64 {
        if self.override_fov {
            self.custom_fov_deg.clamp(MIN_FOV_DEG, MAX_FOV_DEG)
        } else {
            DEFAULT_FOV_DEG
        }
    }

    pub fn interpupillary_distance(&self) -> f64 {
        DEFAULT_IPD_GAMEBOARD
    }

    /// Preview pose to fall back on, if enabled and set
    pub fn active_preview_pose(&self) -> Option<&Pose<WorldSpace>> {
        if self.use_preview_pose {
            self.preview_pose.as_ref()
        } else {
            None
        }
    }
}

/// Configuration for one wand trackable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WandSettings {
    pub controller_index: ControllerIndex,
}

impl WandSettings {
    pub fn new(controller_index: ControllerIndex) -> Self {
        Self { controller_index }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scale_is_five_centimeters() {
        let scale = ScaleSettings::default();
        assert!((scale.physical_meters_per_world_unit() - 0.05).abs() < 1e-12);
        assert!((scale.world_units_per_physical_meter() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_content_scale_factor_guards_zero() {
        let scale = ScaleSettings::meters();
        assert!((scale.content_scale_factor(2.0).unwrap() - 2.0).abs() < 1e-12);
        assert!(matches!(
            scale.content_scale_factor(0.0),
            Err(ConversionError::DegenerateScale { .. })
        ));
        assert!(ScaleSettings::new(f64::NAN, LengthUnit::Meters)
            .content_scale_factor(1.0)
            .is_err());
    }

    #[test]
    fn test_zero_axis_rejected() {
        let result = GameboardSettings::from_axis_angle(Point3::origin(), Vector3::zeros(), 90.0, 1.0);
        assert!(matches!(result, Err(ConversionError::DegenerateAxis)));

        let ok = GameboardSettings::from_axis_angle(Point3::origin(), Vector3::new(0.0, 2.0, 0.0), 90.0, 1.0);
        assert!(ok.is_ok());
    }

    #[test]
    fn test_euler_order_matches_engine() {
        // Yaw of 90 degrees turns +z (forward) into +x (right)
        let q = euler_zxy_degrees([0.0, 90.0, 0.0]);
        let forward = q * Vector3::z();
        assert!((forward - Vector3::x()).norm() < 1e-12);

        // Pitch is applied before yaw
        let q = euler_zxy_degrees([90.0, 90.0, 0.0]);
        let up = q * Vector3::y();
        assert!((up - Vector3::x()).norm() < 1e-12);
    }

    #[test]
    fn test_field_of_view_clamped_only_when_overridden() {
        let mut glasses = GlassesSettings {
            custom_fov_deg: 90.0,
            ..Default::default()
        };
        assert_eq!(glasses.field_of_view(), DEFAULT_FOV_DEG);

        glasses.override_fov = true;
        assert_eq!(glasses.field_of_view(), MAX_FOV_DEG);

        glasses.custom_fov_deg = 10.0;
        assert_eq!(glasses.field_of_view(), MIN_FOV_DEG);
    }

    #[test]
    fn test_preview_pose_requires_flag() {
        let mut glasses = GlassesSettings {
            preview_pose: Some(Pose::identity()),
            ..Default::default()
        };
        assert!(glasses.active_preview_pose().is_some());
        glasses.use_preview_pose = false;
        assert!(glasses.active_preview_pose().is_none());
    }
}

//! Coordinate-frame conversion between the device, gameboard and world frames
//!
//! Frames involved:
//! - GBD (device):   +x right, +y forward, +z up, right-handed
//! - DW (device wand/head local): +x right, +y down, +z forward
//! - UGBD (gameboard): +x right, +y up, +z forward, engine-handed
//! - UWRLD (world):  UGBD placed by the gameboard settings
//!
//! Every function here is a pure function of its inputs. The gameboard to
//! world step is a single similarity transform (uniform scale, rotation,
//! translation) built once per cycle from the current settings.

use crate::core::settings::{GameboardSettings, ScaleSettings};
use crate::core::types::{DeviceFrame, GameboardSpace, Pose, WorldSpace};
use nalgebra::{Point3, Quaternion, Similarity3, Translation3, UnitQuaternion, Vector3};
use std::f64::consts::FRAC_PI_2;
use thiserror::Error;

/// Errors raised while building a frame transform
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ConversionError {
    /// Content scale factor is zero, negative or not finite
    #[error("content scale factor {factor} must be finite and positive")]
    DegenerateScale { factor: f64 },
    /// Rotation axis had zero length
    #[error("rotation axis has zero length")]
    DegenerateAxis,
    /// Input contained NaN or infinity
    #[error("non-finite value in {what}")]
    NonFinite { what: &'static str },
}

/// Pre-rotation expressing the device's "down" axis as the engine's "up" axis.
fn device_axes_correction() -> UnitQuaternion<f64> {
    UnitQuaternion::from_axis_angle(&Vector3::x_axis(), FRAC_PI_2)
}

/// Handedness flip: negate the x and z components.
///
/// This is its own inverse and preserves the quaternion norm.
fn flip_handedness(q: &UnitQuaternion<f64>) -> UnitQuaternion<f64> {
    UnitQuaternion::new_unchecked(Quaternion::new(q.w, -q.i, q.j, -q.k))
}

pub fn device_to_gameboard_rotation(rot_gbd: &UnitQuaternion<f64>) -> UnitQuaternion<f64> {
    let rot_dw = rot_gbd * device_axes_correction().inverse();
    flip_handedness(&rot_dw)
}

pub fn gameboard_to_device_rotation(rot_ugbd: &UnitQuaternion<f64>) -> UnitQuaternion<f64> {
    flip_handedness(rot_ugbd) * device_axes_correction()
}

/// GBD stores height and depth swapped relative to UGBD.
pub fn device_to_gameboard_position(pos_gbd: &Point3<f64>) -> Point3<f64> {
    Point3::new(pos_gbd.x, pos_gbd.z, pos_gbd.y)
}

pub fn gameboard_to_device_position(pos_ugbd: &Point3<f64>) -> Point3<f64> {
    Point3::new(pos_ugbd.x, pos_ugbd.z, pos_ugbd.y)
}

pub fn device_to_gameboard(pose: &Pose<DeviceFrame>) -> Pose<GameboardSpace> {
    Pose::new(
        device_to_gameboard_position(&pose.position),
        device_to_gameboard_rotation(&pose.rotation),
    )
}

pub fn gameboard_to_device(pose: &Pose<GameboardSpace>) -> Pose<DeviceFrame> {
    Pose::new(
        gameboard_to_device_position(&pose.position),
        gameboard_to_device_rotation(&pose.rotation),
    )
}

/// Gameboard to world transform for one set of scale and board settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameboardToWorld {
    similarity: Similarity3<f64>,
}

impl GameboardToWorld {
    pub fn new(scale: &ScaleSettings, board: &GameboardSettings) -> Result<Self, ConversionError> {
        let factor = scale.content_scale_factor(board.scale)?;
        let world_units_per_meter = 1.0 / factor;
        if !world_units_per_meter.is_finite() {
            return Err(ConversionError::DegenerateScale { factor });
        }
        if !board.center.coords.iter().all(|c| c.is_finite()) {
            return Err(ConversionError::NonFinite { what: "gameboard center" });
        }
        if !board.rotation.coords.iter().all(|c| c.is_finite()) {
            return Err(ConversionError::NonFinite { what: "gameboard rotation" });
        }

        Ok(Self {
            similarity: Similarity3::from_parts(
                Translation3::from(board.center.coords),
                board.rotation,
                world_units_per_meter,
            ),
        })
    }

    /// World units per gameboard meter
    pub fn scaling(&self) -> f64 {
        self.similarity.scaling()
    }

    pub fn apply(&self, pose: &Pose<GameboardSpace>) -> Pose<WorldSpace> {
        Pose::new(
            self.similarity.transform_point(&pose.position),
            self.similarity.isometry.rotation * pose.rotation,
        )
    }

    pub fn invert(&self, pose: &Pose<WorldSpace>) -> Pose<GameboardSpace> {
        Pose::new(
            self.similarity.inverse_transform_point(&pose.position),
            self.similarity.isometry.rotation.inverse() * pose.rotation,
        )
    }
}

pub fn gameboard_to_world(
    pose: &Pose<GameboardSpace>,
    scale: &ScaleSettings,
    board: &GameboardSettings,
) -> Result<Pose<WorldSpace>, ConversionError> {
    Ok(GameboardToWorld::new(scale, board)?.apply(pose))
}

pub fn world_to_gameboard(
    pose: &Pose<WorldSpace>,
    scale: &ScaleSettings,
    board: &GameboardSettings,
) -> Result<Pose<GameboardSpace>, ConversionError> {
    Ok(GameboardToWorld::new(scale, board)?.invert(pose))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::units::LengthUnit;

    const TOLERANCE: f64 = 1e-9;

    fn assert_points_close(a: &Point3<f64>, b: &Point3<f64>) {
        assert!((a - b).norm() < TOLERANCE, "{:?} != {:?}", a, b);
    }

    fn assert_rotations_close(a: &UnitQuaternion<f64>, b: &UnitQuaternion<f64>) {
        assert!(a.angle_to(b) < 1e-6, "{:?} != {:?}", a, b);
    }

    fn rotated_board() -> GameboardSettings {
        GameboardSettings::from_euler_degrees(Point3::new(1.5, -0.25, 4.0), [10.0, 35.0, -5.0], 2.5)
    }

    #[test]
    fn test_device_position_swaps_height_and_depth() {
        let device = Pose::<DeviceFrame>::from_position(Point3::new(1.0, 2.0, 3.0));
        let gameboard = device_to_gameboard(&device);
        assert_points_close(&gameboard.position, &Point3::new(1.0, 3.0, 2.0));
    }

    #[test]
    fn test_identity_device_rotation_maps_to_quarter_turn() {
        let converted = device_to_gameboard_rotation(&UnitQuaternion::identity());
        let expected = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), FRAC_PI_2);
        assert_rotations_close(&converted, &expected);
    }

    #[test]
    fn test_handedness_flip_negates_x_and_z() {
        let q = UnitQuaternion::from_quaternion(Quaternion::new(0.5, 0.1, 0.2, 0.3));
        let flipped = flip_handedness(&q);
        assert!((flipped.i + q.i).abs() < TOLERANCE);
        assert!((flipped.j - q.j).abs() < TOLERANCE);
        assert!((flipped.k + q.k).abs() < TOLERANCE);
        assert!((flipped.w - q.w).abs() < TOLERANCE);
    }

    #[test]
    fn test_device_round_trip() {
        let rotation = UnitQuaternion::from_euler_angles(0.3, -1.1, 2.0);
        let device = Pose::<DeviceFrame>::new(Point3::new(0.1, -0.2, 0.35), rotation);
        let back = gameboard_to_device(&device_to_gameboard(&device));
        assert_points_close(&back.position, &device.position);
        assert_rotations_close(&back.rotation, &device.rotation);
    }

    #[test]
    fn test_identity_board_at_meter_scale_is_identity() {
        let pose = Pose::<GameboardSpace>::new(
            Point3::new(0.125, 0.25, -0.25),
            UnitQuaternion::from_euler_angles(0.2, 0.0, 0.0),
        );
        let world = gameboard_to_world(&pose, &ScaleSettings::meters(), &GameboardSettings::default()).unwrap();
        assert_points_close(&world.position, &pose.position);
        assert_rotations_close(&world.rotation, &pose.rotation);
    }

    #[test]
    fn test_content_scale_divides_physical_lengths() {
        // 5 cm per world unit: 5 cm on the board is one world unit
        let scale = ScaleSettings::new(5.0, LengthUnit::Centimeters);
        let pose = Pose::<GameboardSpace>::from_position(Point3::new(0.05, 0.0, 0.0));
        let world = gameboard_to_world(&pose, &scale, &GameboardSettings::default()).unwrap();
        assert_points_close(&world.position, &Point3::new(1.0, 0.0, 0.0));

        // Doubling the board scale halves world-space distances
        let board = GameboardSettings::new(Point3::origin(), UnitQuaternion::identity(), 2.0);
        let world = gameboard_to_world(&pose, &scale, &board).unwrap();
        assert_points_close(&world.position, &Point3::new(0.5, 0.0, 0.0));
    }

    #[test]
    fn test_scale_rotate_translate_order() {
        let board = GameboardSettings::from_axis_angle(
            Point3::new(10.0, 0.0, 0.0),
            Vector3::y(),
            90.0,
            1.0,
        )
        .unwrap();
        let scale = ScaleSettings::new(0.5, LengthUnit::Meters);
        let pose = Pose::<GameboardSpace>::from_position(Point3::new(0.0, 0.0, 1.0));
        let world = gameboard_to_world(&pose, &scale, &board).unwrap();
        // scale: (0, 0, 2); rotate +90 about y: (2, 0, 0); translate: (12, 0, 0)
        assert_points_close(&world.position, &Point3::new(12.0, 0.0, 0.0));
        assert_rotations_close(&world.rotation, &board.rotation);
    }

    #[test]
    fn test_full_chain_round_trip() {
        let scale = ScaleSettings::new(2.0, LengthUnit::Inches);
        let board = rotated_board();
        let device = Pose::<DeviceFrame>::new(
            Point3::new(-0.3, 0.15, 0.42),
            UnitQuaternion::from_euler_angles(-0.4, 0.9, 0.1),
        );

        let world = gameboard_to_world(&device_to_gameboard(&device), &scale, &board).unwrap();
        let back = gameboard_to_device(&world_to_gameboard(&world, &scale, &board).unwrap());

        assert_points_close(&back.position, &device.position);
        assert_rotations_close(&back.rotation, &device.rotation);
    }

    #[test]
    fn test_degenerate_scale_rejected() {
        let board = GameboardSettings::new(Point3::origin(), UnitQuaternion::identity(), 0.0);
        let result = GameboardToWorld::new(&ScaleSettings::default(), &board);
        assert!(matches!(result, Err(ConversionError::DegenerateScale { .. })));

        let tiny = ScaleSettings::new(f64::MIN_POSITIVE * 1e-10, LengthUnit::Meters);
        assert!(GameboardToWorld::new(&tiny, &GameboardSettings::default()).is_err());
    }

    #[test]
    fn test_non_finite_center_rejected() {
        let board = GameboardSettings::new(Point3::new(f64::INFINITY, 0.0, 0.0), UnitQuaternion::identity(), 1.0);
        let result = GameboardToWorld::new(&ScaleSettings::meters(), &board);
        assert!(matches!(result, Err(ConversionError::NonFinite { .. })));
    }
}

//! Core data types for the tracking system

use nalgebra::{Point3, UnitQuaternion};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use crate::api::types::ApiError;

/// Marker for a coordinate frame a [`Pose`] can be expressed in.
pub trait ReferenceFrame: Copy + fmt::Debug + Default + PartialEq {
    /// Short frame tag used in logs and reports
    const NAME: &'static str;
}

/// Native Tilt Five gameboard frame (GBD): +x right, +y forward, +z up.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DeviceFrame;

/// Host engine gameboard frame (UGBD): +x right, +y up, +z forward.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GameboardSpace;

/// Host engine world frame (UWRLD).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WorldSpace;

impl ReferenceFrame for DeviceFrame {
    const NAME: &'static str = "GBD";
}

impl ReferenceFrame for GameboardSpace {
    const NAME: &'static str = "UGBD";
}

impl ReferenceFrame for WorldSpace {
    const NAME: &'static str = "UWRLD";
}

/// Position and orientation tagged with the frame they are expressed in.
///
/// Only the converters in [`crate::algorithms::frame_conversion`] change the
/// frame tag, so a gameboard pose can never be handed to code expecting a
/// world pose.
#[derive(Clone, Copy, PartialEq)]
pub struct Pose<F: ReferenceFrame> {
    pub position: Point3<f64>,
    pub rotation: UnitQuaternion<f64>,
    frame: PhantomData<F>,
}

impl<F: ReferenceFrame> Pose<F> {
    pub fn new(position: Point3<f64>, rotation: UnitQuaternion<f64>) -> Self {
        Self {
            position,
            rotation,
            frame: PhantomData,
        }
    }

    pub fn identity() -> Self {
        Self::new(Point3::origin(), UnitQuaternion::identity())
    }

    pub fn from_position(position: Point3<f64>) -> Self {
        Self::new(position, UnitQuaternion::identity())
    }

    pub fn frame_name(&self) -> &'static str {
        F::NAME
    }

    pub fn is_finite(&self) -> bool {
        self.position.coords.iter().all(|c| c.is_finite())
            && self.rotation.coords.iter().all(|c| c.is_finite())
    }

    /// Same pose with a different position, rotation kept.
    pub fn with_position(self, position: Point3<f64>) -> Self {
        Self::new(position, self.rotation)
    }
}

impl<F: ReferenceFrame> Default for Pose<F> {
    fn default() -> Self {
        Self::identity()
    }
}

impl<F: ReferenceFrame> fmt::Debug for Pose<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pose")
            .field("frame", &F::NAME)
            .field("position", &self.position)
            .field("rotation", &self.rotation)
            .finish()
    }
}

/// Which wand a query or update refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControllerIndex {
    Primary = 0,
    Secondary = 1,
}

impl ControllerIndex {
    pub const ALL: [ControllerIndex; 2] = [ControllerIndex::Primary, ControllerIndex::Secondary];

    pub fn as_usize(self) -> usize {
        self as usize
    }

    /// Sign of the left/right handedness offset used for default poses.
    pub fn handedness_sign(self) -> f64 {
        match self {
            ControllerIndex::Primary => 1.0,
            ControllerIndex::Secondary => -1.0,
        }
    }
}

impl fmt::Display for ControllerIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControllerIndex::Primary => write!(f, "primary"),
            ControllerIndex::Secondary => write!(f, "secondary"),
        }
    }
}

impl TryFrom<i32> for ControllerIndex {
    type Error = ApiError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(ControllerIndex::Primary),
            1 => Ok(ControllerIndex::Secondary),
            _ => Err(ApiError::InvalidArgument {
                argument: "controller_index",
                value: code.to_string(),
            }),
        }
    }
}

impl FromStr for ControllerIndex {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "primary" => Ok(ControllerIndex::Primary),
            "secondary" => Ok(ControllerIndex::Secondary),
            _ => Err(ApiError::InvalidArgument {
                argument: "controller_index",
                value: s.to_string(),
            }),
        }
    }
}

/// Semantic point on a tracked wand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControllerReferencePoint {
    Grip = 0,
    Fingertip = 1,
    Aim = 2,
}

impl ControllerReferencePoint {
    pub const ALL: [ControllerReferencePoint; 3] = [
        ControllerReferencePoint::Grip,
        ControllerReferencePoint::Fingertip,
        ControllerReferencePoint::Aim,
    ];
}

impl fmt::Display for ControllerReferencePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControllerReferencePoint::Grip => write!(f, "grip"),
            ControllerReferencePoint::Fingertip => write!(f, "fingertip"),
            ControllerReferencePoint::Aim => write!(f, "aim"),
        }
    }
}

impl TryFrom<i32> for ControllerReferencePoint {
    type Error = ApiError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(ControllerReferencePoint::Grip),
            1 => Ok(ControllerReferencePoint::Fingertip),
            2 => Ok(ControllerReferencePoint::Aim),
            _ => Err(ApiError::InvalidArgument {
                argument: "reference_point",
                value: code.to_string(),
            }),
        }
    }
}

impl FromStr for ControllerReferencePoint {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "grip" => Ok(ControllerReferencePoint::Grip),
            "fingertip" | "fingertips" => Ok(ControllerReferencePoint::Fingertip),
            "aim" => Ok(ControllerReferencePoint::Aim),
            _ => Err(ApiError::InvalidArgument {
                argument: "reference_point",
                value: s.to_string(),
            }),
        }
    }
}

/// Per-cycle tracking state of a trackable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackingState {
    /// Device reported availability and a valid pose this cycle
    Tracked,
    /// Device unavailable or the pose query failed; default pose in use
    Fallback,
}

impl TrackingState {
    pub fn is_tracked(&self) -> bool {
        matches!(self, TrackingState::Tracked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pose_frame_names() {
        let device: Pose<DeviceFrame> = Pose::identity();
        let world: Pose<WorldSpace> = Pose::identity();
        assert_eq!(device.frame_name(), "GBD");
        assert_eq!(world.frame_name(), "UWRLD");
    }

    #[test]
    fn test_non_finite_pose_detected() {
        let pose: Pose<GameboardSpace> = Pose::from_position(Point3::new(f64::NAN, 0.0, 0.0));
        assert!(!pose.is_finite());
        assert!(Pose::<GameboardSpace>::identity().is_finite());
    }

    #[test]
    fn test_reference_point_codes() {
        assert_eq!(ControllerReferencePoint::try_from(2).unwrap(), ControllerReferencePoint::Aim);
        assert_eq!("Fingertips".parse::<ControllerReferencePoint>().unwrap(), ControllerReferencePoint::Fingertip);

        let err = ControllerReferencePoint::try_from(7).unwrap_err();
        assert!(matches!(err, ApiError::InvalidArgument { argument: "reference_point", .. }));
    }

    #[test]
    fn test_controller_index_parsing() {
        assert_eq!(ControllerIndex::try_from(1).unwrap(), ControllerIndex::Secondary);
        assert_eq!("PRIMARY".parse::<ControllerIndex>().unwrap(), ControllerIndex::Primary);
        assert!(ControllerIndex::try_from(-1).is_err());
        assert_eq!(ControllerIndex::Secondary.handedness_sign(), -1.0);
    }
}

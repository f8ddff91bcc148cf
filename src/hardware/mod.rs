//! Device abstraction layer for the glasses and wand service
//!
//! This module defines the pose source the tracking core polls, the raw
//! samples it returns in the native GBD frame, and a scriptable mock.

pub mod device;
pub mod mock;
pub mod error;

pub use device::{guarded_query, install_panic_logging, DevicePoseSource, DeviceStatus};
pub use mock::MockDeviceSource;
pub use error::{DeviceError, DeviceResult};

use crate::core::constants::MIN_QUATERNION_NORM;
use crate::core::{DeviceFrame, Pose};
use nalgebra::{Point3, Quaternion, UnitQuaternion};

/// Raw wand state as reported by the device, in GBD.
///
/// Rotation is `[x, y, z, w]`. Grip, fingertips and aim share the rotation.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeControllerState {
    pub rot_to_wnd_gbd: [f64; 4],
    pub grip_pos_gbd: [f64; 3],
    pub fingertips_pos_gbd: [f64; 3],
    pub aim_pos_gbd: [f64; 3],
    pub timestamp_ms: u64,
}

/// Device-frame poses for the three wand reference points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WandDevicePoses {
    pub grip: Pose<DeviceFrame>,
    pub fingertips: Pose<DeviceFrame>,
    pub aim: Pose<DeviceFrame>,
}

impl Default for NativeControllerState {
    fn default() -> Self {
        Self {
            rot_to_wnd_gbd: [0.0, 0.0, 0.0, 1.0],
            grip_pos_gbd: [0.0; 3],
            fingertips_pos_gbd: [0.0; 3],
            aim_pos_gbd: [0.0; 3],
            timestamp_ms: 0,
        }
    }
}

impl NativeControllerState {
    pub fn new(rot_to_wnd_gbd: [f64; 4]) -> Self {
        Self {
            rot_to_wnd_gbd,
            ..Default::default()
        }
    }

    pub fn with_grip(mut self, pos_gbd: [f64; 3]) -> Self {
        self.grip_pos_gbd = pos_gbd;
        self
    }

    pub fn with_fingertips(mut self, pos_gbd: [f64; 3]) -> Self {
        self.fingertips_pos_gbd = pos_gbd;
        self
    }

    pub fn with_aim(mut self, pos_gbd: [f64; 3]) -> Self {
        self.aim_pos_gbd = pos_gbd;
        self
    }

    pub fn with_timestamp(mut self, timestamp_ms: u64) -> Self {
        self.timestamp_ms = timestamp_ms;
        self
    }

    /// Validate the sample and express it as device-frame poses.
    pub fn to_device_poses(&self) -> DeviceResult<WandDevicePoses> {
        let rotation = native_rotation(&self.rot_to_wnd_gbd)?;
        Ok(WandDevicePoses {
            grip: Pose::new(native_position(&self.grip_pos_gbd, "grip")?, rotation),
            fingertips: Pose::new(native_position(&self.fingertips_pos_gbd, "fingertips")?, rotation),
            aim: Pose::new(native_position(&self.aim_pos_gbd, "aim")?, rotation),
        })
    }
}

/// Raw head pose as reported by the device, in GBD
#[derive(Debug, Clone, PartialEq)]
pub struct NativeGlassesPose {
    pub rot_to_gls_gbd: [f64; 4],
    pub pos_of_gls_gbd: [f64; 3],
    pub timestamp_ms: u64,
}

impl Default for NativeGlassesPose {
    fn default() -> Self {
        Self {
            rot_to_gls_gbd: [0.0, 0.0, 0.0, 1.0],
            pos_of_gls_gbd: [0.0; 3],
            timestamp_ms: 0,
        }
    }
}

impl NativeGlassesPose {
    pub fn new(rot_to_gls_gbd: [f64; 4], pos_of_gls_gbd: [f64; 3]) -> Self {
        Self {
            rot_to_gls_gbd,
            pos_of_gls_gbd,
            timestamp_ms: 0,
        }
    }

    pub fn with_timestamp(mut self, timestamp_ms: u64) -> Self {
        self.timestamp_ms = timestamp_ms;
        self
    }

    pub fn to_device_pose(&self) -> DeviceResult<Pose<DeviceFrame>> {
        Ok(Pose::new(
            native_position(&self.pos_of_gls_gbd, "glasses")?,
            native_rotation(&self.rot_to_gls_gbd)?,
        ))
    }
}

/// `[x, y, z, w]` to a unit quaternion, rejecting NaN and near-zero norms.
fn native_rotation(xyzw: &[f64; 4]) -> DeviceResult<UnitQuaternion<f64>> {
    let [x, y, z, w] = *xyzw;
    let q = Quaternion::new(w, x, y, z);
    let norm = q.norm();
    if !norm.is_finite() || norm < MIN_QUATERNION_NORM {
        return Err(DeviceError::InvalidSample {
            reason: format!("rotation {:?} cannot be normalized", xyzw),
        });
    }
    Ok(UnitQuaternion::from_quaternion(q))
}

fn native_position(xyz: &[f64; 3], point: &str) -> DeviceResult<Point3<f64>> {
    if xyz.iter().all(|c| c.is_finite()) {
        Ok(Point3::new(xyz[0], xyz[1], xyz[2]))
    } else {
        Err(DeviceError::InvalidSample {
            reason: format!("{} position {:?} is not finite", point, xyz),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_controller_state_to_poses() {
        let state = NativeControllerState::new([0.0, 0.0, 0.0, 2.0])
            .with_grip([1.0, 2.0, 3.0])
            .with_aim([0.0, 0.1, 0.0]);
        let poses = state.to_device_poses().unwrap();
        assert_eq!(poses.grip.position, Point3::new(1.0, 2.0, 3.0));
        assert!(poses.grip.rotation.angle() < 1e-12); // normalized from w = 2
        assert_eq!(poses.grip.rotation, poses.aim.rotation);
    }

    #[test]
    fn test_zero_rotation_rejected() {
        let state = NativeControllerState::new([0.0, 0.0, 0.0, 0.0]);
        assert!(matches!(state.to_device_poses(), Err(DeviceError::InvalidSample { .. })));
    }

    #[test]
    fn test_nan_position_rejected() {
        let pose = NativeGlassesPose::new([0.0, 0.0, 0.0, 1.0], [0.0, f64::NAN, 0.0]);
        assert!(pose.to_device_pose().is_err());
    }
}

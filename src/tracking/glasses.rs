//! Glasses (head pose) trackable

use crate::algorithms::frame_conversion::{device_to_gameboard, GameboardToWorld};
use crate::core::constants::{DEFAULT_GLASSES_PITCH_DEG, DEFAULT_GLASSES_POSITION_GAMEBOARD};
use crate::core::settings::GlassesSettings;
use crate::core::types::{GameboardSpace, Pose, WorldSpace};
use crate::hardware::{DevicePoseSource, DeviceResult};
use crate::tracking::trackable::{DrivenTransform, TrackableCore, TrackableKind};
use nalgebra::{Point3, UnitQuaternion, Vector3};

/// Head pose runtime; drives the host's head pose camera
pub type GlassesCore = TrackableCore<GlassesKind>;

/// Default head pose above and behind the board center, looking down at it.
pub fn default_glasses_pose() -> Pose<GameboardSpace> {
    let [x, y, z] = DEFAULT_GLASSES_POSITION_GAMEBOARD;
    Pose::new(
        Point3::new(x, y, z),
        UnitQuaternion::from_axis_angle(&Vector3::x_axis(), DEFAULT_GLASSES_PITCH_DEG.to_radians()),
    )
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GlassesKind;

impl TrackableKind for GlassesKind {
    type Settings = GlassesSettings;
    type GameboardPoses = Pose<GameboardSpace>;
    type WorldPoses = Pose<WorldSpace>;
    type Driven = dyn DrivenTransform;

    fn name(&self) -> &'static str {
        "glasses"
    }

    /// The preview pose, if one is configured, otherwise the fixed default.
    fn default_poses(&self, settings: &GlassesSettings, transform: &GameboardToWorld) -> Pose<GameboardSpace> {
        match settings.active_preview_pose() {
            Some(preview) => transform.invert(preview),
            None => default_glasses_pose(),
        }
    }

    fn is_available(&self, _settings: &GlassesSettings, device: &dyn DevicePoseSource) -> bool {
        device.glasses_available()
    }

    fn sample_device(
        &self,
        _settings: &GlassesSettings,
        device: &mut dyn DevicePoseSource,
    ) -> DeviceResult<Pose<GameboardSpace>> {
        let native = device.glasses_pose()?;
        Ok(device_to_gameboard(&native.to_device_pose()?))
    }

    fn project(&self, pose: &Pose<GameboardSpace>, transform: &GameboardToWorld) -> Pose<WorldSpace> {
        transform.apply(pose)
    }

    fn apply_to_driven(&self, pose: &Pose<WorldSpace>, driven: &mut Self::Driven) {
        driven.set_world_pose(pose);
    }
}

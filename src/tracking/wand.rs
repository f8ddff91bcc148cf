//! Wand trackable and the two-controller wand runtime

use crate::algorithms::frame_conversion::{device_to_gameboard, GameboardToWorld};
use crate::api::types::ApiResult;
use crate::core::constants::{
    DEFAULT_WAND_HANDEDNESS_OFFSET_GAMEBOARD, DEFAULT_WAND_PITCH_DEG, DEFAULT_WAND_POSITION_GAMEBOARD,
};
use crate::core::gameboard::GameboardType;
use crate::core::settings::{GameboardSettings, ScaleSettings, WandSettings};
use crate::core::types::{
    ControllerIndex, ControllerReferencePoint, GameboardSpace, Pose, ReferenceFrame, TrackingState, WorldSpace,
};
use crate::hardware::{DevicePoseSource, DeviceResult};
use crate::tracking::trackable::{CycleOutcome, DrivenTransform, TrackableCore, TrackableKind};
use nalgebra::{Point3, UnitQuaternion, Vector3};
use tracing::error;

/// Grip, fingertip and aim poses from one wand sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WandPoses<F: ReferenceFrame> {
    pub grip: Pose<F>,
    pub fingertips: Pose<F>,
    pub aim: Pose<F>,
}

impl<F: ReferenceFrame> WandPoses<F> {
    /// All three reference points at the same pose
    pub fn uniform(pose: Pose<F>) -> Self {
        Self {
            grip: pose,
            fingertips: pose,
            aim: pose,
        }
    }

    pub fn get(&self, point: ControllerReferencePoint) -> &Pose<F> {
        match point {
            ControllerReferencePoint::Grip => &self.grip,
            ControllerReferencePoint::Fingertip => &self.fingertips,
            ControllerReferencePoint::Aim => &self.aim,
        }
    }

    pub fn map<G: ReferenceFrame>(&self, f: impl Fn(&Pose<F>) -> Pose<G>) -> WandPoses<G> {
        WandPoses {
            grip: f(&self.grip),
            fingertips: f(&self.fingertips),
            aim: f(&self.aim),
        }
    }
}

impl<F: ReferenceFrame> Default for WandPoses<F> {
    fn default() -> Self {
        Self::uniform(Pose::identity())
    }
}

/// Host objects driven by one wand; unset points are left alone
#[derive(Default)]
pub struct WandRig {
    pub grip: Option<Box<dyn DrivenTransform>>,
    pub fingertip: Option<Box<dyn DrivenTransform>>,
    pub aim: Option<Box<dyn DrivenTransform>>,
}

impl WandRig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_grip(mut self, target: impl DrivenTransform + 'static) -> Self {
        self.grip = Some(Box::new(target));
        self
    }

    pub fn with_fingertip(mut self, target: impl DrivenTransform + 'static) -> Self {
        self.fingertip = Some(Box::new(target));
        self
    }

    pub fn with_aim(mut self, target: impl DrivenTransform + 'static) -> Self {
        self.aim = Some(Box::new(target));
        self
    }
}

/// Default wand pose for a controller: in front of the viewer, offset to its hand's side.
///
/// There is no good default offset for the fingertip and aim points, so they
/// share the grip pose.
pub fn default_wand_poses(index: ControllerIndex) -> WandPoses<GameboardSpace> {
    let base = Vector3::from(DEFAULT_WAND_POSITION_GAMEBOARD);
    let offset = Vector3::from(DEFAULT_WAND_HANDEDNESS_OFFSET_GAMEBOARD) * index.handedness_sign();
    let rotation = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), DEFAULT_WAND_PITCH_DEG.to_radians());
    WandPoses::uniform(Pose::new(Point3::from(base + offset), rotation))
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WandKind;

impl TrackableKind for WandKind {
    type Settings = WandSettings;
    type GameboardPoses = WandPoses<GameboardSpace>;
    type WorldPoses = WandPoses<WorldSpace>;
    type Driven = WandRig;

    fn name(&self) -> &'static str {
        "wand"
    }

    fn default_poses(&self, settings: &WandSettings, _transform: &GameboardToWorld) -> WandPoses<GameboardSpace> {
        default_wand_poses(settings.controller_index)
    }

    /// Wand poses are relative to the board, so the glasses must be tracking a board too.
    fn is_available(&self, settings: &WandSettings, device: &dyn DevicePoseSource) -> bool {
        device.glasses_available()
            && matches!(device.gameboard_type(), Some(board) if board.is_present())
            && device.wand_available(settings.controller_index)
    }

    fn sample_device(
        &self,
        settings: &WandSettings,
        device: &mut dyn DevicePoseSource,
    ) -> DeviceResult<WandPoses<GameboardSpace>> {
        let state = device.controller_state(settings.controller_index)?;
        let poses = state.to_device_poses()?;
        Ok(WandPoses {
            grip: device_to_gameboard(&poses.grip),
            fingertips: device_to_gameboard(&poses.fingertips),
            aim: device_to_gameboard(&poses.aim),
        })
    }

    fn project(&self, poses: &WandPoses<GameboardSpace>, transform: &GameboardToWorld) -> WandPoses<WorldSpace> {
        poses.map(|pose| transform.apply(pose))
    }

    // TODO: drive default poses while no board is detected once the glasses
    // can report a fallback board placement
    fn should_drive(&self, device: &dyn DevicePoseSource) -> bool {
        !matches!(device.gameboard_type(), Some(GameboardType::None))
    }

    fn apply_to_driven(&self, poses: &WandPoses<WorldSpace>, rig: &mut WandRig) {
        if let Some(grip) = rig.grip.as_mut() {
            grip.set_world_pose(&poses.grip);
        }
        if let Some(fingertip) = rig.fingertip.as_mut() {
            fingertip.set_world_pose(&poses.fingertips);
        }
        if let Some(aim) = rig.aim.as_mut() {
            aim.set_world_pose(&poses.aim);
        }
    }
}

pub type WandCore = TrackableCore<WandKind>;

/// One wand core per controller index, fixed for the runtime's lifetime
#[derive(Debug)]
pub struct WandRuntime {
    cores: [WandCore; 2],
}

impl Default for WandRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl WandRuntime {
    pub fn new() -> Self {
        Self {
            cores: [WandCore::new(WandKind), WandCore::new(WandKind)],
        }
    }

    /// Update the core selected by `settings.controller_index`.
    ///
    /// Missing settings are a host configuration error: logged, and the
    /// cycle is skipped without touching any state.
    pub fn update(
        &mut self,
        settings: Option<&WandSettings>,
        scale: &ScaleSettings,
        board: &GameboardSettings,
        device: &mut dyn DevicePoseSource,
        rig: &mut WandRig,
    ) -> CycleOutcome {
        let Some(settings) = settings else {
            error!("WandSettings configuration required for wand tracking updates");
            return CycleOutcome::Skipped;
        };

        self.cores[settings.controller_index.as_usize()].update(settings, scale, board, device, rig)
    }

    pub fn core(&self, index: ControllerIndex) -> &WandCore {
        &self.cores[index.as_usize()]
    }

    pub fn state(&self, index: ControllerIndex) -> TrackingState {
        self.core(index).state()
    }

    pub fn get_pose(&self, index: ControllerIndex, point: ControllerReferencePoint) -> Pose<WorldSpace> {
        *self.core(index).world_poses().get(point)
    }

    /// World-space position of a reference point on the wand
    pub fn get_position(&self, index: ControllerIndex, point: ControllerReferencePoint) -> Point3<f64> {
        self.get_pose(index, point).position
    }

    /// World-space wand rotation, shared by all reference points
    pub fn get_rotation(&self, index: ControllerIndex) -> UnitQuaternion<f64> {
        self.core(index).world_poses().grip.rotation
    }

    /// Position lookup with a raw reference point code from the host.
    ///
    /// Unknown codes are rejected with an invalid-argument error.
    pub fn get_position_by_code(&self, index: ControllerIndex, point_code: i32) -> ApiResult<Point3<f64>> {
        let point = ControllerReferencePoint::try_from(point_code)?;
        Ok(self.get_position(index, point))
    }
}

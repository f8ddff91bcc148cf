//! Generic per-trackable state machine
//!
//! A [`TrackableCore`] owns one tracked entity's poses across polling
//! cycles. Everything that differs between glasses and wands lives behind
//! the [`TrackableKind`] strategy: the fallback pose, the availability
//! predicate, how a device sample becomes gameboard poses, and how the
//! published poses are written to the host's driven objects.

use crate::algorithms::frame_conversion::GameboardToWorld;
use crate::core::settings::{GameboardSettings, ScaleSettings};
use crate::core::types::{Pose, TrackingState, WorldSpace};
use crate::hardware::{guarded_query, DevicePoseSource, DeviceResult};
use nalgebra::{Point3, UnitQuaternion};
use serde::Serialize;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, error, trace, warn};

/// Host-owned object a trackable writes its world pose into
pub trait DrivenTransform {
    fn set_world_pose(&mut self, pose: &Pose<WorldSpace>);
}

/// Minimal driven transform, useful for hosts without their own scene graph
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Point3<f64>,
    pub rotation: UnitQuaternion<f64>,
    /// Number of times a pose was written
    pub writes: u32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Point3::origin(),
            rotation: UnitQuaternion::identity(),
            writes: 0,
        }
    }
}

impl DrivenTransform for Transform {
    fn set_world_pose(&mut self, pose: &Pose<WorldSpace>) {
        self.position = pose.position;
        self.rotation = pose.rotation;
        self.writes += 1;
    }
}

impl<T: DrivenTransform + ?Sized> DrivenTransform for Rc<RefCell<T>> {
    fn set_world_pose(&mut self, pose: &Pose<WorldSpace>) {
        self.borrow_mut().set_world_pose(pose);
    }
}

/// Capabilities that specialize a [`TrackableCore`] for one entity kind
pub trait TrackableKind {
    type Settings;
    /// Poses resolved in gameboard space each cycle
    type GameboardPoses: Clone + fmt::Debug + Default;
    /// The same poses after projection into world space
    type WorldPoses: Clone + fmt::Debug + Default;
    /// Host objects the world poses are applied to
    type Driven: ?Sized;

    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Poses used while the device cannot provide a sample
    fn default_poses(&self, settings: &Self::Settings, transform: &GameboardToWorld) -> Self::GameboardPoses;

    fn is_available(&self, settings: &Self::Settings, device: &dyn DevicePoseSource) -> bool;

    /// Query the device and convert its sample into gameboard space
    fn sample_device(
        &self,
        settings: &Self::Settings,
        device: &mut dyn DevicePoseSource,
    ) -> DeviceResult<Self::GameboardPoses>;

    fn project(&self, poses: &Self::GameboardPoses, transform: &GameboardToWorld) -> Self::WorldPoses;

    /// Whether the driven objects should be written this cycle
    fn should_drive(&self, _device: &dyn DevicePoseSource) -> bool {
        true
    }

    fn apply_to_driven(&self, poses: &Self::WorldPoses, driven: &mut Self::Driven);
}

/// Result of one update cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    Updated { state: TrackingState, drove: bool },
    /// Nothing was mutated this cycle
    Skipped,
}

impl CycleOutcome {
    pub fn state(&self) -> Option<TrackingState> {
        match self {
            CycleOutcome::Updated { state, .. } => Some(*state),
            CycleOutcome::Skipped => None,
        }
    }
}

/// Per-trackable cycle counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TrackableStats {
    pub cycles: u64,
    pub tracked_cycles: u64,
    pub fallback_cycles: u64,
    pub device_failures: u64,
    pub skipped_cycles: u64,
}

impl TrackableStats {
    pub fn merge(&mut self, other: &TrackableStats) {
        self.cycles += other.cycles;
        self.tracked_cycles += other.tracked_cycles;
        self.fallback_cycles += other.fallback_cycles;
        self.device_failures += other.device_failures;
        self.skipped_cycles += other.skipped_cycles;
    }
}

/// State and poses of one tracked entity
#[derive(Debug)]
pub struct TrackableCore<K: TrackableKind> {
    kind: K,
    state: TrackingState,
    poses_gameboard: K::GameboardPoses,
    poses_world: K::WorldPoses,
    stats: TrackableStats,
}

impl<K: TrackableKind> TrackableCore<K> {
    pub fn new(kind: K) -> Self {
        Self {
            kind,
            state: TrackingState::Fallback,
            poses_gameboard: K::GameboardPoses::default(),
            poses_world: K::WorldPoses::default(),
            stats: TrackableStats::default(),
        }
    }

    /// Run one polling cycle.
    ///
    /// Settings are read fresh every call. Device unavailability and query
    /// failures resolve to the kind's default poses; they never escape as
    /// errors. If the scale or board settings cannot produce a finite world
    /// transform the cycle is skipped and the last published poses stay.
    pub fn update(
        &mut self,
        settings: &K::Settings,
        scale: &ScaleSettings,
        board: &GameboardSettings,
        device: &mut dyn DevicePoseSource,
        driven: &mut K::Driven,
    ) -> CycleOutcome {
        let transform = match GameboardToWorld::new(scale, board) {
            Ok(transform) => transform,
            Err(e) => {
                warn!(trackable = self.kind.name(), error = %e, "cannot project into world space, skipping cycle");
                self.stats.skipped_cycles += 1;
                return CycleOutcome::Skipped;
            }
        };

        self.stats.cycles += 1;
        let (state, poses) = self.resolve_gameboard_poses(settings, &transform, device);

        if state != self.state {
            debug!(trackable = self.kind.name(), from = ?self.state, to = ?state, "tracking state changed");
        }
        self.state = state;
        match state {
            TrackingState::Tracked => self.stats.tracked_cycles += 1,
            TrackingState::Fallback => self.stats.fallback_cycles += 1,
        }

        self.poses_world = self.kind.project(&poses, &transform);
        self.poses_gameboard = poses;
        trace!(trackable = self.kind.name(), poses = ?self.poses_world, "published world poses");

        let kind = &self.kind;
        let drove = match guarded_query(|| Ok(kind.should_drive(&*device))) {
            Ok(drive) => drive,
            Err(e) => {
                self.stats.device_failures += 1;
                error!(trackable = self.kind.name(), error = %e, "board query failed, driven objects left alone");
                false
            }
        };
        if drove {
            self.kind.apply_to_driven(&self.poses_world, driven);
        }

        CycleOutcome::Updated { state, drove }
    }

    fn resolve_gameboard_poses(
        &mut self,
        settings: &K::Settings,
        transform: &GameboardToWorld,
        device: &mut dyn DevicePoseSource,
    ) -> (TrackingState, K::GameboardPoses) {
        let kind = &self.kind;
        let sample = guarded_query(|| Ok(kind.is_available(settings, &*device))).and_then(|available| {
            if available {
                guarded_query(|| kind.sample_device(settings, &mut *device)).map(Some)
            } else {
                Ok(None)
            }
        });

        match sample {
            Ok(Some(poses)) => (TrackingState::Tracked, poses),
            Ok(None) => (TrackingState::Fallback, self.kind.default_poses(settings, transform)),
            Err(e) => {
                self.stats.device_failures += 1;
                if e.is_transient() {
                    warn!(trackable = self.kind.name(), error = %e, "device pose query failed, using default pose");
                } else {
                    error!(trackable = self.kind.name(), error = %e, "device fault, using default pose");
                }
                (TrackingState::Fallback, self.kind.default_poses(settings, transform))
            }
        }
    }

    /// Whether at least one cycle has published poses.
    ///
    /// Until then [`state`](Self::state) reads `Fallback` but the published
    /// poses are identities, not the kind's default poses, because the
    /// default depends on settings only `update` receives.
    pub fn has_published(&self) -> bool {
        self.stats.cycles > 0
    }

    pub fn kind(&self) -> &K {
        &self.kind
    }

    /// `Fallback` until the first update; see [`has_published`](Self::has_published).
    pub fn state(&self) -> TrackingState {
        self.state
    }

    pub fn gameboard_poses(&self) -> &K::GameboardPoses {
        &self.poses_gameboard
    }

    pub fn world_poses(&self) -> &K::WorldPoses {
        &self.poses_world
    }

    pub fn stats(&self) -> &TrackableStats {
        &self.stats
    }
}

//! Trackable state machines for the glasses and wands

pub mod trackable;
pub mod glasses;
pub mod wand;

pub use trackable::{CycleOutcome, DrivenTransform, TrackableCore, TrackableKind, TrackableStats, Transform};
pub use glasses::{default_glasses_pose, GlassesCore, GlassesKind};
pub use wand::{default_wand_poses, WandCore, WandKind, WandPoses, WandRig, WandRuntime};

//! Tilt Five glasses and wand tracking
//!
//! Converts poses reported by the native device service from its
//! right-handed gameboard frame into a left-handed engine world space,
//! with per-trackable fallback to default poses while the device is
//! unavailable or fails a query.

pub mod core;
pub mod algorithms;
pub mod hardware;
pub mod tracking;
pub mod api;
pub mod utils;

// Re-export commonly used types
pub use core::{
    ControllerIndex, ControllerReferencePoint, DeviceFrame, GameboardSettings, GameboardSpace, GameboardType,
    GlassesSettings, LengthUnit, Pose, ScaleSettings, TrackingState, WandSettings, WorldSpace,
};
pub use algorithms::{device_to_gameboard, gameboard_to_world, world_to_gameboard, ConversionError, GameboardToWorld};
pub use hardware::{DeviceError, DevicePoseSource, DeviceResult, MockDeviceSource};
pub use tracking::{CycleOutcome, DrivenTransform, GlassesCore, Transform, WandRig, WandRuntime};
pub use api::{ApiError, ApiResult, PoseReport, TrackingContext};
pub use utils::{ConfigError, ConfigurationManager};

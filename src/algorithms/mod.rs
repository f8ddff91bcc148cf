//! Pose-space algorithms

pub mod frame_conversion;

pub use frame_conversion::{
    device_to_gameboard, gameboard_to_device, gameboard_to_world, world_to_gameboard,
    ConversionError, GameboardToWorld,
};

//! Core types, constants and settings for the tracking system

pub mod types;
pub mod constants;
pub mod units;
pub mod gameboard;
pub mod settings;

pub use types::*;
pub use constants::*;
pub use units::{Length, LengthUnit};
pub use gameboard::{GameboardDimensions, GameboardType};
pub use settings::{GameboardSettings, GlassesMirrorMode, GlassesSettings, ScaleSettings, WandSettings};

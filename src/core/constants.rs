//! Tracking defaults and physical constants

/// Meters per inch
pub const METERS_PER_INCH: f64 = 0.0254;

/// Default wand position relative to the board (UGBD, meters).
/// Wands snap back here when the glasses or wand are unavailable.
pub const DEFAULT_WAND_POSITION_GAMEBOARD: [f64; 3] = [0.0, 0.25, -0.25];

/// Left/right offset applied to the default wand position, signed by handedness
pub const DEFAULT_WAND_HANDEDNESS_OFFSET_GAMEBOARD: [f64; 3] = [0.125, 0.0, 0.0];

/// Default wand pitch about +x (degrees)
pub const DEFAULT_WAND_PITCH_DEG: f64 = -33.0;

/// Default glasses position relative to the board (UGBD, meters)
pub const DEFAULT_GLASSES_POSITION_GAMEBOARD: [f64; 3] = [0.0, 0.5, -0.5];

/// Default glasses pitch about +x (degrees)
pub const DEFAULT_GLASSES_PITCH_DEG: f64 = -45.0;

/// Field of view limits for the glasses (degrees)
pub const MIN_FOV_DEG: f64 = 35.0;
pub const MAX_FOV_DEG: f64 = 64.0;
pub const DEFAULT_FOV_DEG: f64 = 48.0;

/// Default interpupillary distance (UGBD meters)
pub const DEFAULT_IPD_GAMEBOARD: f64 = 0.072;

/// Default content scale: world units are 5 cm
pub const DEFAULT_CONTENT_SCALE_RATIO: f64 = 5.0;

/// Playable area of the standard gameboard (meters)
pub const DEFAULT_PLAYABLE_SPACE_M: f64 = 0.7;

/// Border width of the standard gameboard (meters)
pub const DEFAULT_BORDER_WIDTH_M: f64 = 0.05;

/// Smallest quaternion norm accepted from the device before normalizing
pub const MIN_QUATERNION_NORM: f64 = 1.0e-6;

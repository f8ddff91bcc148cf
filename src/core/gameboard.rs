//! Gameboard type and physical dimensions

use crate::core::constants::{DEFAULT_BORDER_WIDTH_M, DEFAULT_PLAYABLE_SPACE_M};
use crate::core::units::{Length, LengthUnit};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Board type reported by the glasses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameboardType {
    /// No gameboard currently detected
    None,
    Le,
    Xe,
    XeRaised,
}

impl GameboardType {
    pub fn is_present(self) -> bool {
        !matches!(self, GameboardType::None)
    }
}

/// Physical size of a gameboard
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameboardDimensions {
    pub playable_x: Length,
    pub playable_y: Length,
    pub border_width: Length,
}

impl Default for GameboardDimensions {
    fn default() -> Self {
        Self {
            playable_x: Length::new(DEFAULT_PLAYABLE_SPACE_M, LengthUnit::Meters),
            playable_y: Length::new(DEFAULT_PLAYABLE_SPACE_M, LengthUnit::Meters),
            border_width: Length::new(DEFAULT_BORDER_WIDTH_M, LengthUnit::Meters),
        }
    }
}

impl GameboardDimensions {
    pub fn total_x(&self) -> Length {
        Length::from_meters(
            self.playable_x.to_meters() + 2.0 * self.border_width.to_meters(),
            LengthUnit::Meters,
        )
    }

    pub fn total_y(&self) -> Length {
        Length::from_meters(
            self.playable_y.to_meters() + 2.0 * self.border_width.to_meters(),
            LengthUnit::Meters,
        )
    }

    pub fn is_valid(&self) -> bool {
        [self.playable_x, self.playable_y]
            .iter()
            .all(|l| l.to_meters().is_finite() && l.to_meters() > 0.0)
            && self.border_width.to_meters().is_finite()
            && self.border_width.to_meters() >= 0.0
    }

    /// Whether a UGBD point lies over the playable area (height ignored).
    ///
    /// The playable area is centered on the board origin and spans x and z.
    pub fn contains_playable(&self, point: &Point3<f64>) -> bool {
        let half_x = self.playable_x.to_meters() / 2.0;
        let half_z = self.playable_y.to_meters() / 2.0;
        point.x.abs() <= half_x && point.z.abs() <= half_z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_dimensions_totals() {
        let dims = GameboardDimensions::default();
        assert!((dims.total_x().to_meters() - 0.8).abs() < 1e-12);
        assert!((dims.total_y().to_centimeters() - 80.0).abs() < 1e-9);
        assert!(dims.is_valid());
    }

    #[test]
    fn test_contains_playable() {
        let dims = GameboardDimensions::default();
        assert!(dims.contains_playable(&Point3::new(0.3, 1.0, -0.3)));
        assert!(!dims.contains_playable(&Point3::new(0.36, 0.0, 0.0)));
    }

    #[test]
    fn test_zero_playable_space_invalid() {
        let dims = GameboardDimensions {
            playable_x: Length::new(0.0, LengthUnit::Meters),
            ..Default::default()
        };
        assert!(!dims.is_valid());
        assert!(!GameboardType::None.is_present());
        assert!(GameboardType::XeRaised.is_present());
    }
}

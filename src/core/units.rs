//! Physical length units used for board and content scale

use crate::core::constants::METERS_PER_INCH;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LengthUnit {
    Millimeters,
    Centimeters,
    Inches,
    Meters,
}

impl LengthUnit {
    /// Length of one unit in meters
    pub fn meters_per_unit(self) -> f64 {
        match self {
            LengthUnit::Millimeters => 0.001,
            LengthUnit::Centimeters => 0.01,
            LengthUnit::Inches => METERS_PER_INCH,
            LengthUnit::Meters => 1.0,
        }
    }

    /// Units per major subdivision when laying out a measuring grid
    pub fn grid_period(self) -> u32 {
        match self {
            LengthUnit::Inches => 12,
            _ => 10,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            LengthUnit::Millimeters => "mm",
            LengthUnit::Centimeters => "cm",
            LengthUnit::Inches => "in",
            LengthUnit::Meters => "m",
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A length value with its unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Length {
    pub value: f64,
    pub unit: LengthUnit,
}

impl Length {
    pub fn new(value: f64, unit: LengthUnit) -> Self {
        Self { value, unit }
    }

    pub fn from_meters(meters: f64, unit: LengthUnit) -> Self {
        Self {
            value: meters / unit.meters_per_unit(),
            unit,
        }
    }

    pub fn to_meters(&self) -> f64 {
        self.value * self.unit.meters_per_unit()
    }

    pub fn to_centimeters(&self) -> f64 {
        self.to_meters() / LengthUnit::Centimeters.meters_per_unit()
    }

    pub fn to_millimeters(&self) -> f64 {
        self.to_meters() / LengthUnit::Millimeters.meters_per_unit()
    }

    pub fn to_inches(&self) -> f64 {
        self.to_meters() / METERS_PER_INCH
    }

    pub fn convert_to(&self, unit: LengthUnit) -> Length {
        Length::from_meters(self.to_meters(), unit)
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_conversions() {
        let length = Length::new(1.0, LengthUnit::Inches);
        assert!((length.to_meters() - 0.0254).abs() < 1e-12);
        assert!((length.to_centimeters() - 2.54).abs() < 1e-12);
        assert!((length.to_millimeters() - 25.4).abs() < 1e-9);

        let board = Length::new(0.7, LengthUnit::Meters);
        assert!((board.to_centimeters() - 70.0).abs() < 1e-9);
    }

    #[test]
    fn test_convert_to_other_unit() {
        let length = Length::new(5.0, LengthUnit::Centimeters);
        let mm = length.convert_to(LengthUnit::Millimeters);
        assert_eq!(mm.unit, LengthUnit::Millimeters);
        assert!((mm.value - 50.0).abs() < 1e-9);

        let inches = Length::new(12.0, LengthUnit::Inches).convert_to(LengthUnit::Meters);
        assert!((inches.value - 0.3048).abs() < 1e-12);
    }

    #[test]
    fn test_grid_period() {
        assert_eq!(LengthUnit::Inches.grid_period(), 12);
        assert_eq!(LengthUnit::Centimeters.grid_period(), 10);
    }
}

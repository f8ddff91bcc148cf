//! Common API types and data structures

use crate::algorithms::frame_conversion::ConversionError;
use crate::hardware::DeviceError;
use crate::tracking::TrackableStats;
use crate::utils::config::ConfigError;
use serde::Serialize;
use thiserror::Error;

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// API error types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// Caller passed a value outside the accepted set
    #[error("invalid {argument}: {value}")]
    InvalidArgument { argument: &'static str, value: String },
    /// Device communication error
    #[error(transparent)]
    Device(#[from] DeviceError),
    /// Settings cannot produce a valid transform
    #[error(transparent)]
    Conversion(#[from] ConversionError),
    /// Invalid or unreadable configuration
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Report could not be serialized
    #[error("report serialization failed: {message}")]
    Serialization { message: String },
}

/// Cycle counters across all trackables of a context
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ContextStats {
    pub glasses: TrackableStats,
    pub primary_wand: TrackableStats,
    pub secondary_wand: TrackableStats,
}

impl ContextStats {
    pub fn total(&self) -> TrackableStats {
        let mut total = self.glasses;
        total.merge(&self.primary_wand);
        total.merge(&self.secondary_wand);
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_error_converts() {
        let err: ApiError = DeviceError::NotConnected.into();
        assert_eq!(err.to_string(), "device not connected");
    }

    #[test]
    fn test_stats_total() {
        let stats = ContextStats {
            glasses: TrackableStats { cycles: 3, tracked_cycles: 3, ..Default::default() },
            primary_wand: TrackableStats { cycles: 2, fallback_cycles: 2, ..Default::default() },
            secondary_wand: TrackableStats { cycles: 1, device_failures: 1, fallback_cycles: 1, ..Default::default() },
        };
        let total = stats.total();
        assert_eq!(total.cycles, 6);
        assert_eq!(total.fallback_cycles, 3);
        assert_eq!(total.device_failures, 1);
    }
}

//! Device query error types and handling

use thiserror::Error;

/// Errors reported by a device pose source
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DeviceError {
    /// Glasses service not connected
    #[error("device not connected")]
    NotConnected,
    /// Native call returned a non-zero result code
    #[error("device query failed with result code {code}")]
    QueryFailed { code: i32 },
    /// Sample contained unusable data
    #[error("invalid device sample: {reason}")]
    InvalidSample { reason: String },
    /// Device implementation panicked or raised a fault across the boundary
    #[error("device fault: {message}")]
    Fault { message: String },
}

/// Result type for device queries
pub type DeviceResult<T> = Result<T, DeviceError>;

impl DeviceError {
    /// Whether the error is expected to clear up on a later cycle
    pub fn is_transient(&self) -> bool {
        match self {
            DeviceError::NotConnected => true,
            DeviceError::QueryFailed { .. } => true,
            DeviceError::InvalidSample { .. } => true,
            DeviceError::Fault { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = DeviceError::QueryFailed { code: 3 };
        assert_eq!(err.to_string(), "device query failed with result code 3");
        assert!(err.is_transient());
        assert!(!DeviceError::Fault { message: "boom".into() }.is_transient());
    }
}

//! Device pose source trait and status

use crate::core::{ControllerIndex, GameboardType};
use crate::hardware::{DeviceError, DeviceResult, NativeControllerState, NativeGlassesPose};
use std::panic::{self, AssertUnwindSafe};

/// Abstraction over the native glasses/wand service.
///
/// Availability queries are cheap and infallible. Pose queries may fail and
/// must report failure through [`DeviceResult`]; the tracking core never
/// retries within a cycle.
pub trait DevicePoseSource {
    /// Whether the glasses are connected and tracking
    fn glasses_available(&self) -> bool;

    /// Whether the given wand is connected and tracking
    fn wand_available(&self, index: ControllerIndex) -> bool;

    /// Board type the glasses currently see.
    /// Returns None if the type could not be queried.
    fn gameboard_type(&self) -> Option<GameboardType>;

    /// Latest head pose in GBD
    fn glasses_pose(&mut self) -> DeviceResult<NativeGlassesPose>;

    /// Latest wand state in GBD
    fn controller_state(&mut self, index: ControllerIndex) -> DeviceResult<NativeControllerState>;

    /// Query counters for diagnostics
    fn status(&self) -> DeviceStatus;
}

impl<D: DevicePoseSource + ?Sized> DevicePoseSource for Box<D> {
    fn glasses_available(&self) -> bool {
        (**self).glasses_available()
    }

    fn wand_available(&self, index: ControllerIndex) -> bool {
        (**self).wand_available(index)
    }

    fn gameboard_type(&self) -> Option<GameboardType> {
        (**self).gameboard_type()
    }

    fn glasses_pose(&mut self) -> DeviceResult<NativeGlassesPose> {
        (**self).glasses_pose()
    }

    fn controller_state(&mut self, index: ControllerIndex) -> DeviceResult<NativeControllerState> {
        (**self).controller_state(index)
    }

    fn status(&self) -> DeviceStatus {
        (**self).status()
    }
}

/// Device query statistics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceStatus {
    pub connected: bool,
    pub pose_queries: u32,
    pub failed_queries: u32,
    pub last_sample_time_ms: Option<u64>,
    pub service_version: Option<String>,
}

impl DeviceStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failure_rate(&self) -> f64 {
        if self.pose_queries == 0 {
            0.0
        } else {
            self.failed_queries as f64 / self.pose_queries as f64
        }
    }
}

/// Run a device query, turning a panic inside the source into [`DeviceError::Fault`].
///
/// The process panic hook still runs before the panic is caught, so with the
/// default hook every fault is also printed to stderr. Hosts that expect
/// repeated faults should install their own hook, as the binary does with
/// [`install_panic_logging`].
pub fn guarded_query<T, F>(query: F) -> DeviceResult<T>
where
    F: FnOnce() -> DeviceResult<T>,
{
    match panic::catch_unwind(AssertUnwindSafe(query)) {
        Ok(result) => result,
        Err(payload) => {
            let message = if let Some(s) = payload.downcast_ref::<&str>() {
                (*s).to_string()
            } else if let Some(s) = payload.downcast_ref::<String>() {
                s.clone()
            } else {
                "unknown panic".to_string()
            };
            Err(DeviceError::Fault { message })
        }
    }
}

/// Replace the process panic hook with one that reports through `tracing`.
///
/// Caught device faults then show up as one `error!` event each instead of
/// a raw stderr message.
pub fn install_panic_logging() {
    panic::set_hook(Box::new(|info| {
        tracing::error!(panic = %info, "panic");
    }));
}

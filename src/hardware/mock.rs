//! Mock device pose source for testing and development

use crate::core::{ControllerIndex, GameboardType};
use crate::hardware::{
    DeviceError, DevicePoseSource, DeviceResult, DeviceStatus, NativeControllerState, NativeGlassesPose,
};

/// Scriptable stand-in for the glasses/wand service
pub struct MockDeviceSource {
    status: DeviceStatus,
    glasses_available: bool,
    wand_available: [bool; 2],
    gameboard_type: Option<GameboardType>,
    glasses_pose: NativeGlassesPose,
    controller_states: [NativeControllerState; 2],
    forced_error: Option<DeviceError>,
    panic_on_query: bool,
    simulate_dropouts: bool,
    dropout_probability: f32,
    clock_ms: u64,
}

impl MockDeviceSource {
    /// Create a mock with glasses, both wands and an LE board available
    pub fn new() -> Self {
        let mut status = DeviceStatus::new();
        status.connected = true;
        status.service_version = Some("MockDeviceSource v1.0".to_string());

        Self {
            status,
            glasses_available: true,
            wand_available: [true, true],
            gameboard_type: Some(GameboardType::Le),
            glasses_pose: NativeGlassesPose::default(),
            controller_states: [NativeControllerState::default(), NativeControllerState::default()],
            forced_error: None,
            panic_on_query: false,
            simulate_dropouts: false,
            dropout_probability: 0.0,
            clock_ms: 0,
        }
    }

    /// Create a mock with nothing available
    pub fn unavailable() -> Self {
        let mut mock = Self::new();
        mock.glasses_available = false;
        mock.wand_available = [false, false];
        mock.gameboard_type = Some(GameboardType::None);
        mock
    }

    pub fn set_glasses_available(&mut self, available: bool) {
        self.glasses_available = available;
    }

    pub fn set_wand_available(&mut self, index: ControllerIndex, available: bool) {
        self.wand_available[index.as_usize()] = available;
    }

    pub fn set_gameboard_type(&mut self, board_type: Option<GameboardType>) {
        self.gameboard_type = board_type;
    }

    pub fn set_controller_state(&mut self, index: ControllerIndex, state: NativeControllerState) {
        self.controller_states[index.as_usize()] = state;
    }

    pub fn set_glasses_pose(&mut self, pose: NativeGlassesPose) {
        self.glasses_pose = pose;
    }

    /// Make every pose query fail with `error` until cleared with None
    pub fn force_error(&mut self, error: Option<DeviceError>) {
        self.forced_error = error;
    }

    /// Make pose queries panic, as a crashing native plugin would
    pub fn panic_on_query(&mut self, enable: bool) {
        self.panic_on_query = enable;
    }

    /// Enable random query failures with given probability (0.0 to 1.0)
    pub fn simulate_dropouts(&mut self, enable: bool, probability: f32) {
        self.simulate_dropouts = enable;
        self.dropout_probability = probability.clamp(0.0, 1.0);
    }

    /// Simulate the glasses service going away
    pub fn disconnect(&mut self) {
        self.status.connected = false;
    }

    pub fn reconnect(&mut self) {
        self.status.connected = true;
    }

    pub fn pose_query_count(&self) -> u32 {
        self.status.pose_queries
    }

    fn should_drop(&self) -> bool {
        if !self.simulate_dropouts {
            return false;
        }

        use rand::Rng;
        let mut rng = rand::thread_rng();
        rng.gen::<f32>() < self.dropout_probability
    }

    /// Shared bookkeeping and failure injection for pose queries
    fn begin_query(&mut self) -> DeviceResult<u64> {
        self.status.pose_queries += 1;
        self.clock_ms += 1;

        if self.panic_on_query {
            self.status.failed_queries += 1;
            panic!("mock device fault");
        }

        if !self.status.connected {
            self.status.failed_queries += 1;
            return Err(DeviceError::NotConnected);
        }

        if let Some(error) = &self.forced_error {
            self.status.failed_queries += 1;
            return Err(error.clone());
        }

        if self.should_drop() {
            self.status.failed_queries += 1;
            return Err(DeviceError::QueryFailed { code: 1 });
        }

        self.status.last_sample_time_ms = Some(self.clock_ms);
        Ok(self.clock_ms)
    }
}

impl Default for MockDeviceSource {
    fn default() -> Self {
        Self::new()
    }
}

impl DevicePoseSource for MockDeviceSource {
    fn glasses_available(&self) -> bool {
        self.status.connected && self.glasses_available
    }

    fn wand_available(&self, index: ControllerIndex) -> bool {
        self.status.connected && self.wand_available[index.as_usize()]
    }

    fn gameboard_type(&self) -> Option<GameboardType> {
        if self.status.connected {
            self.gameboard_type
        } else {
            None
        }
    }

    fn glasses_pose(&mut self) -> DeviceResult<NativeGlassesPose> {
        let timestamp = self.begin_query()?;
        Ok(self.glasses_pose.clone().with_timestamp(timestamp))
    }

    fn controller_state(&mut self, index: ControllerIndex) -> DeviceResult<NativeControllerState> {
        let timestamp = self.begin_query()?;
        Ok(self.controller_states[index.as_usize()].clone().with_timestamp(timestamp))
    }

    fn status(&self) -> DeviceStatus {
        self.status.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::guarded_query;

    #[test]
    fn test_mock_device_creation() {
        let device = MockDeviceSource::new();
        assert!(device.glasses_available());
        assert!(device.wand_available(ControllerIndex::Secondary));
        assert_eq!(device.gameboard_type(), Some(GameboardType::Le));
        assert_eq!(device.pose_query_count(), 0);
    }

    #[test]
    fn test_controller_state_returned() {
        let mut device = MockDeviceSource::new();
        device.set_controller_state(
            ControllerIndex::Secondary,
            NativeControllerState::default().with_grip([1.0, 2.0, 3.0]),
        );

        let state = device.controller_state(ControllerIndex::Secondary).unwrap();
        assert_eq!(state.grip_pos_gbd, [1.0, 2.0, 3.0]);
        assert_eq!(state.timestamp_ms, 1);
        assert_eq!(device.status().last_sample_time_ms, Some(1));
    }

    #[test]
    fn test_connection_simulation() {
        let mut device = MockDeviceSource::new();
        device.disconnect();
        assert!(!device.glasses_available());
        assert_eq!(device.gameboard_type(), None);
        assert_eq!(device.glasses_pose(), Err(DeviceError::NotConnected));

        device.reconnect();
        assert!(device.glasses_pose().is_ok());
        assert_eq!(device.status().failed_queries, 1);
    }

    #[test]
    fn test_forced_error() {
        let mut device = MockDeviceSource::new();
        device.force_error(Some(DeviceError::QueryFailed { code: 5 }));
        assert_eq!(
            device.controller_state(ControllerIndex::Primary),
            Err(DeviceError::QueryFailed { code: 5 })
        );
        device.force_error(None);
        assert!(device.controller_state(ControllerIndex::Primary).is_ok());
    }

    #[test]
    fn test_dropout_simulation() {
        let mut device = MockDeviceSource::new();
        device.simulate_dropouts(true, 1.0); // 100% dropout rate

        assert!(device.glasses_pose().is_err());
        assert!(device.status().failed_queries > 0);
    }

    #[test]
    fn test_panic_is_contained_by_guard() {
        let mut device = MockDeviceSource::new();
        device.panic_on_query(true);
        let result = guarded_query(|| device.controller_state(ControllerIndex::Primary));
        assert!(matches!(result, Err(DeviceError::Fault { .. })));
    }
}

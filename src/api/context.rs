//! Tracking context owning the device source and every trackable
//!
//! The host creates one context at startup, calls the update methods once
//! per frame on its own thread, and tears it down with [`TrackingContext::shutdown`].

use crate::api::formatting::PoseReport;
use crate::api::types::ContextStats;
use crate::core::settings::{GameboardSettings, GlassesSettings, ScaleSettings, WandSettings};
use crate::core::types::ControllerIndex;
use crate::hardware::DevicePoseSource;
use crate::tracking::{CycleOutcome, DrivenTransform, GlassesCore, GlassesKind, WandRig, WandRuntime};
use tracing::{error, info};

pub struct TrackingContext<D: DevicePoseSource> {
    device: D,
    wands: WandRuntime,
    glasses: GlassesCore,
    frames: u64,
}

impl<D: DevicePoseSource> TrackingContext<D> {
    pub fn new(device: D) -> Self {
        info!(service = ?device.status().service_version, "tracking context created");
        Self {
            device,
            wands: WandRuntime::new(),
            glasses: GlassesCore::new(GlassesKind),
            frames: 0,
        }
    }

    /// Update one wand; which one is selected by `settings`.
    pub fn update_wand(
        &mut self,
        settings: Option<&WandSettings>,
        scale: &ScaleSettings,
        board: &GameboardSettings,
        rig: &mut WandRig,
    ) -> CycleOutcome {
        self.wands.update(settings, scale, board, &mut self.device, rig)
    }

    pub fn update_glasses(
        &mut self,
        settings: Option<&GlassesSettings>,
        scale: &ScaleSettings,
        board: &GameboardSettings,
        camera: &mut (dyn DrivenTransform + 'static),
    ) -> CycleOutcome {
        let Some(settings) = settings else {
            error!("GlassesSettings configuration required for glasses tracking updates");
            return CycleOutcome::Skipped;
        };
        self.glasses.update(settings, scale, board, &mut self.device, camera)
    }

    /// Mark the end of a host frame
    pub fn end_frame(&mut self) -> u64 {
        self.frames += 1;
        self.frames
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn wands(&self) -> &WandRuntime {
        &self.wands
    }

    pub fn glasses(&self) -> &GlassesCore {
        &self.glasses
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    pub fn stats(&self) -> ContextStats {
        ContextStats {
            glasses: *self.glasses.stats(),
            primary_wand: *self.wands.core(ControllerIndex::Primary).stats(),
            secondary_wand: *self.wands.core(ControllerIndex::Secondary).stats(),
        }
    }

    /// Snapshot of every published world pose
    pub fn report(&self) -> PoseReport {
        PoseReport::capture(self.frames, &self.glasses, &self.wands)
    }

    /// Tear the context down and hand the device source back to the host.
    pub fn shutdown(self) -> D {
        let total = self.stats().total();
        info!(
            frames = self.frames,
            cycles = total.cycles,
            fallback_cycles = total.fallback_cycles,
            device_failures = total.device_failures,
            "tracking context shut down"
        );
        self.device
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{ControllerReferencePoint, TrackingState};
    use crate::hardware::{DeviceError, MockDeviceSource, NativeControllerState};
    use crate::tracking::Transform;
    use nalgebra::Point3;

    fn meters() -> (ScaleSettings, GameboardSettings) {
        (ScaleSettings::meters(), GameboardSettings::default())
    }

    #[test]
    fn test_context_routes_updates() {
        let mut context = TrackingContext::new(MockDeviceSource::new());
        let (scale, board) = meters();
        let mut rig = WandRig::new();
        let mut camera = Transform::default();

        context.update_glasses(Some(&GlassesSettings::default()), &scale, &board, &mut camera);
        context.update_wand(Some(&WandSettings::new(ControllerIndex::Secondary)), &scale, &board, &mut rig);
        context.end_frame();

        let stats = context.stats();
        assert_eq!(stats.glasses.tracked_cycles, 1);
        assert_eq!(stats.secondary_wand.tracked_cycles, 1);
        assert_eq!(stats.primary_wand.cycles, 0);
        assert_eq!(context.frames(), 1);
        assert_eq!(camera.writes, 1);
    }

    #[test]
    fn test_missing_glasses_settings_skipped() {
        let mut context = TrackingContext::new(MockDeviceSource::new());
        let (scale, board) = meters();
        let mut camera = Transform::default();

        let outcome = context.update_glasses(None, &scale, &board, &mut camera);
        assert_eq!(outcome, CycleOutcome::Skipped);
        assert_eq!(camera.writes, 0);
        assert_eq!(context.device().pose_query_count(), 0);
    }

    #[test]
    fn test_device_throws_mid_cycle() {
        let mut context = TrackingContext::new(MockDeviceSource::new());
        let (scale, board) = meters();
        let mut rig = WandRig::new();
        let settings = WandSettings::new(ControllerIndex::Primary);

        context.device_mut().set_controller_state(
            ControllerIndex::Primary,
            NativeControllerState::default().with_grip([0.2, 0.1, 0.3]),
        );
        context.update_wand(Some(&settings), &scale, &board, &mut rig);
        assert_eq!(context.wands().state(ControllerIndex::Primary), TrackingState::Tracked);

        context.device_mut().panic_on_query(true);
        let outcome = context.update_wand(Some(&settings), &scale, &board, &mut rig);
        assert_eq!(outcome.state(), Some(TrackingState::Fallback));

        let position = context.wands().get_position(ControllerIndex::Primary, ControllerReferencePoint::Grip);
        assert!((position - Point3::new(0.125, 0.25, -0.25)).norm() < 1e-9);
        assert_eq!(context.stats().primary_wand.device_failures, 1);
    }

    #[test]
    fn test_shutdown_returns_device() {
        let mut context = TrackingContext::new(MockDeviceSource::new());
        let (scale, board) = meters();
        let mut rig = WandRig::new();
        context.device_mut().force_error(Some(DeviceError::QueryFailed { code: 9 }));
        context.update_wand(Some(&WandSettings::new(ControllerIndex::Primary)), &scale, &board, &mut rig);

        let device = context.shutdown();
        assert_eq!(device.pose_query_count(), 1);
        assert_eq!(device.status().failed_queries, 1);
    }

    #[test]
    fn test_boxed_device_source() {
        let device: Box<dyn DevicePoseSource> = Box::new(MockDeviceSource::unavailable());
        let mut context = TrackingContext::new(device);
        let (scale, board) = meters();
        let mut rig = WandRig::new();

        let outcome = context.update_wand(Some(&WandSettings::new(ControllerIndex::Primary)), &scale, &board, &mut rig);
        assert_eq!(outcome.state(), Some(TrackingState::Fallback));
    }
}

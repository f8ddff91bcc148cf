//! Device abstraction layer demonstration
//!
//! Drives a wand and the glasses through tracking loss, query failures and
//! a crashing device source, showing how each resolves to a fallback pose.

use std::cell::RefCell;
use std::rc::Rc;
use tiltfive_tracking::hardware::{DeviceError, DevicePoseSource, MockDeviceSource, NativeControllerState};
use tiltfive_tracking::tracking::{Transform, WandRig};
use tiltfive_tracking::{
    ControllerIndex, ControllerReferencePoint, GameboardSettings, GameboardType, GlassesSettings, ScaleSettings,
    TrackingContext, WandSettings,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Tilt Five Tracking - Device Demo ===\n");

    let scale = ScaleSettings::meters();
    let board = GameboardSettings::default();
    let settings = WandSettings::new(ControllerIndex::Primary);

    let grip_target = Rc::new(RefCell::new(Transform::default()));
    let mut rig = WandRig::new().with_grip(grip_target.clone());
    let mut camera = Transform::default();

    let mut device = MockDeviceSource::new();
    device.set_controller_state(
        ControllerIndex::Primary,
        NativeControllerState::new([0.0, 0.0, 0.0, 1.0]).with_grip([0.1, 0.2, 0.05]),
    );
    let mut context = TrackingContext::new(device);

    println!("--- Tracked ---");
    let outcome = context.update_wand(Some(&settings), &scale, &board, &mut rig);
    print_wand(&context, outcome);
    println!("Driven grip transform: {:?}\n", grip_target.borrow().position);

    println!("--- Wand lost ---");
    context.device_mut().set_wand_available(ControllerIndex::Primary, false);
    let outcome = context.update_wand(Some(&settings), &scale, &board, &mut rig);
    print_wand(&context, outcome);

    println!("\n--- Query failure ---");
    context.device_mut().set_wand_available(ControllerIndex::Primary, true);
    context.device_mut().force_error(Some(DeviceError::QueryFailed { code: 3 }));
    let outcome = context.update_wand(Some(&settings), &scale, &board, &mut rig);
    print_wand(&context, outcome);
    context.device_mut().force_error(None);

    println!("\n--- Device source panics ---");
    context.device_mut().panic_on_query(true);
    let outcome = context.update_glasses(Some(&GlassesSettings::default()), &scale, &board, &mut camera);
    println!("Glasses outcome: {:?}, head at {:?}", outcome, context.glasses().world_poses().position);
    context.device_mut().panic_on_query(false);

    println!("\n--- Gameboard removed ---");
    context.device_mut().set_gameboard_type(Some(GameboardType::None));
    let writes_before = grip_target.borrow().writes;
    let outcome = context.update_wand(Some(&settings), &scale, &board, &mut rig);
    print_wand(&context, outcome);
    println!("Grip transform writes: {} -> {}", writes_before, grip_target.borrow().writes);

    println!("\n--- Unknown reference point code ---");
    match context.wands().get_position_by_code(ControllerIndex::Primary, 7) {
        Ok(position) => println!("Unexpected position {:?}", position),
        Err(e) => println!("Rejected: {}", e),
    }

    let stats = context.stats();
    println!("\nPrimary wand stats: {:?}", stats.primary_wand);
    let device = context.shutdown();
    let status = device.status();
    println!(
        "Device queries: {} ({} failed, {:.0}% failure rate)",
        status.pose_queries,
        status.failed_queries,
        status.failure_rate() * 100.0
    );

    println!("\nDevice demo completed successfully!");
    Ok(())
}

fn print_wand(context: &TrackingContext<MockDeviceSource>, outcome: tiltfive_tracking::CycleOutcome) {
    let grip = context.wands().get_position(ControllerIndex::Primary, ControllerReferencePoint::Grip);
    let rotation = context.wands().get_rotation(ControllerIndex::Primary);
    println!(
        "Outcome: {:?}\nGrip: ({:.3}, {:.3}, {:.3}) pitch {:.1}°",
        outcome,
        grip.x,
        grip.y,
        grip.z,
        rotation.euler_angles().0.to_degrees()
    );
}

//! Demonstration of pose report output formatting

use tiltfive_tracking::api::{CsvFormatter, JsonFormatter, TextFormatter};
use tiltfive_tracking::hardware::{MockDeviceSource, NativeControllerState, NativeGlassesPose};
use tiltfive_tracking::tracking::{Transform, WandRig};
use tiltfive_tracking::{
    ControllerIndex, GameboardSettings, GlassesSettings, LengthUnit, ScaleSettings, TrackingContext, WandSettings,
};
use nalgebra::Point3;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Tilt Five Tracking - Formatting Demo ===\n");

    // 5 cm per world unit with the board raised one unit
    let scale = ScaleSettings::new(5.0, LengthUnit::Centimeters);
    let board = GameboardSettings::from_euler_degrees(Point3::new(0.0, 1.0, 0.0), [0.0, 30.0, 0.0], 1.0);

    let mut device = MockDeviceSource::new();
    device.set_glasses_pose(NativeGlassesPose::new([0.0, 0.0, 0.0, 1.0], [0.0, -0.4, 0.45]));
    device.set_controller_state(
        ControllerIndex::Primary,
        NativeControllerState::new([0.0, 0.0, 0.0, 1.0])
            .with_grip([0.1, 0.0, 0.1])
            .with_fingertips([0.1, 0.08, 0.1])
            .with_aim([0.1, 0.1, 0.11]),
    );
    device.set_wand_available(ControllerIndex::Secondary, false);

    let mut context = TrackingContext::new(device);
    let mut camera = Transform::default();
    context.update_glasses(Some(&GlassesSettings::default()), &scale, &board, &mut camera);
    for index in ControllerIndex::ALL {
        context.update_wand(Some(&WandSettings::new(index)), &scale, &board, &mut WandRig::new());
    }
    context.end_frame();
    let report = context.report();

    println!("1. Text Format:");
    println!("{}", TextFormatter::new().format_text(&report));

    println!("2. Compact Text Format:");
    println!("{}\n", TextFormatter::compact().format_text(&report));

    println!("3. JSON Format:");
    println!("{}\n", JsonFormatter::pretty().format_json(&report)?);

    println!("4. CSV Format:");
    println!("{}", CsvFormatter::new().format_csv(&report));

    Ok(())
}

use clap::Parser;
use nalgebra::{UnitQuaternion, Vector3};
use std::path::PathBuf;
use tiltfive_tracking::api::{JsonFormatter, TextFormatter, TrackingContext};
use tiltfive_tracking::hardware::{install_panic_logging, MockDeviceSource, NativeControllerState, NativeGlassesPose};
use tiltfive_tracking::tracking::{Transform, WandRig};
use tiltfive_tracking::utils::ConfigurationManager;
use tiltfive_tracking::{ControllerIndex, DevicePoseSource};
use tracing::{info, warn};

/// Run the tracking pipeline against a simulated glasses and wand service
#[derive(Parser, Debug)]
#[command(name = "tiltfive-tracking")]
#[command(about = "Poll a simulated Tilt Five device and print world-space poses")]
struct Args {
    /// JSON configuration file; defaults are used when omitted
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Number of update cycles to run
    #[arg(long, short = 'n', default_value_t = 10)]
    cycles: u64,

    /// Probability (0.0 to 1.0) that a simulated pose query fails
    #[arg(long, short = 'd', default_value_t = 0.0)]
    dropout: f32,

    /// Print reports as JSON lines
    #[arg(long)]
    json: bool,

    /// One line of text per cycle
    #[arg(long)]
    compact: bool,
}

/// Native (xyzw) rotation about the GBD up axis
fn yaw_gbd(angle_rad: f64) -> [f64; 4] {
    let q = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), angle_rad);
    [q.i, q.j, q.k, q.w]
}

/// Move the simulated wands in a circle over the board and bob the head.
fn advance_simulation(device: &mut MockDeviceSource, cycle: u64) {
    let t = cycle as f64 * 0.1;

    for (index, phase) in [(ControllerIndex::Primary, 0.0), (ControllerIndex::Secondary, std::f64::consts::PI)] {
        let angle = t + phase;
        let (sin, cos) = angle.sin_cos();
        let grip = [0.2 * cos, 0.2 * sin, 0.15];
        let state = NativeControllerState::new(yaw_gbd(angle))
            .with_grip(grip)
            .with_fingertips([grip[0], grip[1] + 0.08, grip[2]])
            .with_aim([grip[0], grip[1] + 0.1, grip[2] + 0.01])
            .with_timestamp(cycle);
        device.set_controller_state(index, state);
    }

    let head = NativeGlassesPose::new(yaw_gbd(0.2 * t.sin()), [0.0, -0.5, 0.5 + 0.02 * t.sin()]).with_timestamp(cycle);
    device.set_glasses_pose(head);
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
    install_panic_logging();

    let args = Args::parse();

    let manager = match &args.config {
        Some(path) => ConfigurationManager::from_file(path)?,
        None => ConfigurationManager::new(),
    };
    for warning in manager.validate().warnings {
        warn!("{}", warning);
    }

    let scale = manager.scale_settings();
    let board = manager.gameboard_settings();
    let glasses_settings = manager.glasses_settings();
    let wand_settings = manager.wand_settings().to_vec();

    let mut device = MockDeviceSource::new();
    device.set_gameboard_type(Some(board.board_type));
    if args.dropout > 0.0 {
        device.simulate_dropouts(true, args.dropout);
    }

    let mut context = TrackingContext::new(device);
    let mut camera = Transform::default();
    let mut rigs: Vec<WandRig> = wand_settings
        .iter()
        .map(|_| WandRig::new().with_grip(Transform::default()))
        .collect();

    info!(cycles = args.cycles, dropout = args.dropout, wands = wand_settings.len(), "starting simulation");

    let json = JsonFormatter::new();
    let text = if args.compact { TextFormatter::compact() } else { TextFormatter::new() };

    for cycle in 0..args.cycles {
        advance_simulation(context.device_mut(), cycle);

        context.update_glasses(Some(&glasses_settings), &scale, &board, &mut camera);
        for (settings, rig) in wand_settings.iter().zip(rigs.iter_mut()) {
            context.update_wand(Some(settings), &scale, &board, rig);
        }
        context.end_frame();

        let report = context.report();
        if args.json {
            println!("{}", json.format_json(&report)?);
        } else {
            println!("{}", text.format_text(&report));
        }
    }

    let stats = context.stats().total();
    let device = context.shutdown();
    info!(
        tracked = stats.tracked_cycles,
        fallback = stats.fallback_cycles,
        device_failures = stats.device_failures,
        failure_rate = device.status().failure_rate(),
        "simulation finished"
    );

    Ok(())
}

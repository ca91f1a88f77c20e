use std::path::PathBuf;
use std::time::Duration;

use anyhow::{ensure, Context};
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use clap::Parser;
use heli_hover::{
    init_logging, parse_command, BodyConstraints, Engine, FuelTank, HoverCommand,
    HoverCommandKind, HoverNotice, HoverPlugin, HoverRegistry, HoverShutdown,
    Permissions, SeatSwapRequested, Seats, Vehicle, VehicleId, VehicleKind, HOVER_PERMISSION,
};
use log::info;

/// Largest step virtual time accepts without clamping.
const MAX_STEP_MS: u64 = 250;

/// Headless helicopter hover simulation
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
    /// Hover settings file, created with defaults if missing
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Number of simulation steps to run
    #[arg(long, default_value_t = 700)]
    steps: u32,
    /// Length of one simulation step in milliseconds
    #[arg(long, default_value_t = 100)]
    step_ms: u64,
    /// Command the pilot types once the helicopter is airborne
    #[arg(long, default_value = "/hover")]
    command: String,
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must take On<T> by value."
)]
fn print_notice(event: On<HoverNotice>) {
    let HoverNotice { recipient, message } = event.event();
    info!("to {recipient:?}: {message}");
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    ensure!(
        (1..=MAX_STEP_MS).contains(&args.step_ms),
        "--step-ms must be between 1 and {MAX_STEP_MS}"
    );
    let kind = parse_command(&args.command)
        .with_context(|| format!("{:?} is not a hover command", args.command))?;

    let plugin = args
        .config
        .as_deref()
        .map_or_else(HoverPlugin::default, HoverPlugin::from_config_file);

    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(plugin)
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(
            args.step_ms,
        )))
        .add_observer(print_notice);

    let pilot = app.world_mut().spawn(Permissions::with(HOVER_PERMISSION)).id();
    let heli = app
        .world_mut()
        .spawn((
            Vehicle::new(VehicleKind::Minicopter),
            BodyConstraints::default(),
            Engine {
                running: true,
                mobile: true,
            },
            FuelTank::new(100, 1.0),
            Seats::piloted_by(pilot),
        ))
        .id();
    app.update();

    match kind {
        HoverCommandKind::Toggle => app.world_mut().trigger(HoverCommand { player: pilot }),
        HoverCommandKind::SwapSeats => app
            .world_mut()
            .trigger(SeatSwapRequested { player: pilot }),
    }
    for _ in 0..args.steps {
        app.update();
    }

    let world = app.world();
    let hovering = world
        .resource::<HoverRegistry>()
        .is_hovering(VehicleId(heli));
    let fuel = world
        .get::<FuelTank>(heli)
        .map_or(0, |tank| tank.amount);
    let engine = world.get::<Engine>(heli).is_some_and(Engine::is_running);
    info!("after {} steps: hovering={hovering} fuel={fuel} engine_on={engine}", args.steps);

    app.world_mut().trigger(HoverShutdown);
    Ok(())
}

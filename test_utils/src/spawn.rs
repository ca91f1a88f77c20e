//! Builders for hover test apps, helicopters and players.
use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use heli_hover::{
    BodyConstraints, Engine, FuelTank, HoverPlugin, HoverSettings, Permissions, Seats, Vehicle,
    VehicleKind, HOVER_PERMISSION,
};

use crate::capture::install_capture;

/// Simulated time advanced by every `App::update` in a [`hover_app`].
pub const STEP: Duration = Duration::from_millis(100);

/// Returns a headless [`App`] with hover installed and startup already run.
///
/// Virtual time starts at zero and advances by [`STEP`] on each update after
/// this one.
#[must_use]
pub fn hover_app(settings: HoverSettings) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(STEP));
    app.add_plugins(HoverPlugin::with_settings(settings));
    install_capture(&mut app);
    app.update();
    app
}

/// Spawns a player, optionally holding the hover capability.
pub fn spawn_player(world: &mut World, permitted: bool) -> Entity {
    let permissions = if permitted {
        Permissions::with(HOVER_PERMISSION)
    } else {
        Permissions::default()
    };
    world.spawn(permissions).id()
}

/// Description of a helicopter to spawn.
#[derive(Debug, Clone)]
pub struct HelicopterRig {
    kind: VehicleKind,
    fuel: u32,
    burn_rate: f32,
    engine_running: bool,
    seats: Seats,
    with_fuel_tank: bool,
}

impl HelicopterRig {
    /// A flying helicopter with 100 units of fuel burning one per second and
    /// nobody aboard.
    #[must_use]
    pub const fn new(kind: VehicleKind) -> Self {
        Self {
            kind,
            fuel: 100,
            burn_rate: 1.0,
            engine_running: true,
            seats: Seats {
                pilot: None,
                passengers: Vec::new(),
            },
            with_fuel_tank: true,
        }
    }

    /// Sets the tank contents and burn rate.
    #[must_use]
    pub fn fuel(mut self, amount: u32, burn_rate: f32) -> Self {
        self.fuel = amount;
        self.burn_rate = burn_rate;
        self
    }

    /// Spawns with the engine stopped.
    #[must_use]
    pub fn engine_off(mut self) -> Self {
        self.engine_running = false;
        self
    }

    /// Spawns without a fuel tank.
    #[must_use]
    pub fn without_fuel_tank(mut self) -> Self {
        self.with_fuel_tank = false;
        self
    }

    /// Seats `player` at the controls.
    #[must_use]
    pub fn pilot(mut self, player: Entity) -> Self {
        self.seats.pilot = Some(player);
        self
    }

    /// Seats `player` as a passenger.
    #[must_use]
    pub fn passenger(mut self, player: Entity) -> Self {
        self.seats.passengers.push(player);
        self
    }

    /// Spawns the helicopter into `world`.
    pub fn spawn(self, world: &mut World) -> Entity {
        let mut vehicle = world.spawn((
            Vehicle::new(self.kind),
            BodyConstraints::default(),
            Engine {
                running: self.engine_running,
                mobile: true,
            },
            self.seats,
        ));
        if self.with_fuel_tank {
            vehicle.insert(FuelTank::new(self.fuel, self.burn_rate));
        }
        vehicle.id()
    }
}

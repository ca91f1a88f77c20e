//! Host-owned ECS components the hover core reads and drives.
//!
//! The simulation owns these components on vehicle and player entities. The
//! hover core never stores them; it borrows them for the duration of a single
//! transition or tick and otherwise refers to vehicles by identity only.
use std::collections::HashSet;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Helicopter families that can be made hover-eligible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleKind {
    /// Light utility helicopter.
    Minicopter,
    /// Scrap-built transport helicopter.
    ScrapTransport,
    /// Heavy tandem-rotor transport.
    Chinook,
}

impl VehicleKind {
    /// Every hover-capable kind, in configuration order.
    pub const ALL: [Self; 3] = [Self::Minicopter, Self::ScrapTransport, Self::Chinook];

    /// Short prefab name the host uses for this kind.
    #[must_use]
    pub const fn prefab_name(self) -> &'static str {
        match self {
            Self::Minicopter => "minicopter.entity",
            Self::ScrapTransport => "scraptransporthelicopter",
            Self::Chinook => "ch47.entity",
        }
    }

    /// Resolves a host short prefab name, if it names a helicopter.
    #[must_use]
    pub fn from_prefab_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.prefab_name() == name)
    }
}

/// Marks an entity as a vehicle of a given kind.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vehicle {
    /// Concrete helicopter family.
    pub kind: VehicleKind,
}

impl Vehicle {
    /// Creates a vehicle marker for `kind`.
    #[must_use]
    pub const fn new(kind: VehicleKind) -> Self {
        Self { kind }
    }
}

/// Constraint flags on the vehicle's rigid body.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BodyConstraints {
    /// Holds the body at its current altitude.
    pub freeze_position_y: bool,
    /// Locks all rotation axes.
    pub freeze_rotation: bool,
}

impl BodyConstraints {
    /// Returns the body to unconstrained flight.
    pub const fn release(&mut self) {
        self.freeze_position_y = false;
        self.freeze_rotation = false;
    }
}

/// Engine on/off state as exposed by the host flight model.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Engine {
    /// Whether the engine is currently running.
    pub running: bool,
    /// False while the host has immobilised the vehicle.
    pub mobile: bool,
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            running: false,
            mobile: true,
        }
    }
}

impl Engine {
    /// Whether the engine is on.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Forces the engine into the running state.
    pub const fn force_on(&mut self) {
        self.running = true;
    }

    /// Forces the engine off.
    pub const fn force_off(&mut self) {
        self.running = false;
    }
}

/// Fuel reserve of a vehicle.
///
/// Burn requests accumulate fractional fuel and withdraw whole units once at
/// least one unit is owed.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct FuelTank {
    /// Whole fuel units remaining.
    pub amount: u32,
    /// Units burned per second of engine time.
    pub burn_rate: f32,
    /// Fractional fuel owed but not yet withdrawn.
    pub pending: f32,
}

impl FuelTank {
    /// Creates a tank holding `amount` units that burns `burn_rate` per second.
    #[must_use]
    pub const fn new(amount: u32, burn_rate: f32) -> Self {
        Self {
            amount,
            burn_rate,
            pending: 0.0,
        }
    }

    /// Whether any fuel remains.
    #[must_use]
    pub const fn has_fuel(&self) -> bool {
        self.amount > 0
    }

    /// Burns `seconds` of engine time at `per_second` and returns the number of
    /// whole units withdrawn.
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss,
        reason = "owed is floored and clamped to the remaining amount before conversion"
    )]
    pub fn try_use(&mut self, seconds: f32, per_second: f32) -> u32 {
        if !self.has_fuel() {
            return 0;
        }
        self.pending += (seconds * per_second).max(0.0);
        let owed = self.pending.floor().min(self.amount as f32);
        if owed < 1.0 {
            return 0;
        }
        let units = owed as u32;
        self.pending -= owed;
        self.amount -= units;
        units
    }
}

/// Mount points of a vehicle and who currently occupies them.
#[derive(Component, Debug, Clone, Default, PartialEq, Eq)]
pub struct Seats {
    /// Player holding the controls, if any.
    pub pilot: Option<Entity>,
    /// Players mounted anywhere other than the pilot seat.
    pub passengers: Vec<Entity>,
}

impl Seats {
    /// Seats with only a pilot.
    #[must_use]
    pub const fn piloted_by(pilot: Entity) -> Self {
        Self {
            pilot: Some(pilot),
            passengers: Vec::new(),
        }
    }

    /// Every mounted player, pilot first.
    pub fn occupants(&self) -> impl Iterator<Item = Entity> + '_ {
        self.pilot.into_iter().chain(self.passengers.iter().copied())
    }

    /// Number of mounted players.
    #[must_use]
    pub fn occupant_count(&self) -> usize {
        usize::from(self.pilot.is_some()) + self.passengers.len()
    }

    /// Whether anyone is mounted.
    #[must_use]
    pub fn has_occupants(&self) -> bool {
        self.occupant_count() > 0
    }

    /// Whether someone holds the controls.
    #[must_use]
    pub const fn has_pilot(&self) -> bool {
        self.pilot.is_some()
    }

    /// Whether `player` is the pilot.
    #[must_use]
    pub fn is_pilot(&self, player: Entity) -> bool {
        self.pilot == Some(player)
    }

    /// Whether `player` is mounted anywhere on the vehicle.
    #[must_use]
    pub fn contains(&self, player: Entity) -> bool {
        self.occupants().any(|occupant| occupant == player)
    }
}

/// Capabilities granted to a player.
#[derive(Component, Debug, Clone, Default, PartialEq, Eq)]
pub struct Permissions(pub HashSet<String>);

impl Permissions {
    /// Grants a single capability.
    #[must_use]
    pub fn with(capability: &str) -> Self {
        Self(HashSet::from([capability.to_owned()]))
    }

    /// Whether the player holds `capability`.
    #[must_use]
    pub fn has(&self, capability: &str) -> bool {
        self.0.contains(capability)
    }
}

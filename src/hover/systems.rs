//! Systems that keep the registry in step with the world and drive units.

use bevy::prelude::*;
use log::{debug, info};

use crate::components::{BodyConstraints, Engine, FuelTank, Seats, Vehicle};
use crate::notice::{HoverFault, HoverMessage, HoverNotice};
use crate::settings::HoverSettings;
use crate::unit::{StepOutcome, VehicleId, VehicleParts};

use super::registry::HoverRegistry;

/// Query row giving mutable access to every part a unit drives.
pub(crate) type VehicleRow<'w> = (
    Entity,
    &'w Vehicle,
    Option<&'w mut BodyConstraints>,
    Option<&'w mut Engine>,
    Option<&'w mut FuelTank>,
    Option<&'w Seats>,
);

/// Borrows the parts of `vehicle` and runs `f` on them.
///
/// Fails with the first missing part, or when the entity is gone.
pub(crate) fn with_parts<R>(
    query: &mut Query<VehicleRow<'_>>,
    vehicle: VehicleId,
    f: impl FnOnce(VehicleParts<'_>) -> R,
) -> Result<R, HoverFault> {
    let Ok((_, _, body, engine, fuel, seats)) = query.get_mut(vehicle.entity()) else {
        return Err(HoverFault::VehicleGone(vehicle));
    };
    let body = body.ok_or(HoverFault::MissingRigidBody(vehicle))?;
    let engine = engine.ok_or(HoverFault::MissingEngine(vehicle))?;
    let fuel = fuel.ok_or(HoverFault::MissingFuel(vehicle))?;
    let seats = seats.ok_or(HoverFault::MissingSeats(vehicle))?;
    Ok(f(VehicleParts {
        constraints: body.into_inner(),
        engine: engine.into_inner(),
        fuel: fuel.into_inner(),
        seats,
    }))
}

/// Finds the vehicle whose seats hold `player`.
pub(crate) fn mounted_vehicle(query: &Query<VehicleRow<'_>>, player: Entity) -> Option<VehicleId> {
    query
        .iter()
        .find(|(_, _, _, _, _, seats)| seats.is_some_and(|seats| seats.contains(player)))
        .map(|(entity, ..)| VehicleId(entity))
}

/// Sends `message` to every player in `recipients`.
pub(crate) fn broadcast(
    commands: &mut Commands,
    recipients: impl IntoIterator<Item = Entity>,
    message: HoverMessage,
) {
    for recipient in recipients {
        commands.trigger(HoverNotice::new(recipient, message));
    }
}

/// Removes the faulted unit and reports the fault.
///
/// A hovering unit is stopped first so its body is not left frozen with no
/// unit to release it.
pub(crate) fn tear_down_faulted(
    registry: &mut HoverRegistry,
    vehicles: &mut Query<VehicleRow<'_>>,
    commands: &mut Commands,
    fault: HoverFault,
) {
    let vehicle = fault.vehicle();
    if let Some(unit) = registry.get_mut(vehicle).filter(|unit| unit.is_hovering()) {
        if let Ok((_, _, Some(mut body), ..)) = vehicles.get_mut(vehicle.entity()) {
            unit.stop(&mut body);
        }
    }
    registry.remove(vehicle);
    commands.trigger(fault);
}

/// Registers every vehicle already alive when the plugin starts.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems take resources by value."
)]
pub fn scan_live_vehicles_system(
    mut registry: ResMut<HoverRegistry>,
    settings: Res<HoverSettings>,
    vehicles: Query<(Entity, &Vehicle)>,
) {
    let mut created = 0_usize;
    for (entity, vehicle) in &vehicles {
        if registry.register(VehicleId(entity), vehicle.kind, &settings) {
            created += 1;
        }
    }
    info!("hover scan registered {created} helicopter(s)");
}

/// Tears down units of destroyed vehicles and registers new ones.
///
/// Removals are handled first so a recycled entity index never meets the
/// unit of the vehicle it replaced.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems take resources by value."
)]
pub fn track_vehicle_lifecycle_system(
    mut registry: ResMut<HoverRegistry>,
    settings: Res<HoverSettings>,
    spawned: Query<(Entity, &Vehicle), Added<Vehicle>>,
    mut removed: RemovedComponents<Vehicle>,
) {
    for entity in removed.read() {
        if registry.remove(VehicleId(entity)) {
            debug!("removed hover unit of destroyed {entity:?}");
        }
    }
    for (entity, vehicle) in &spawned {
        registry.register(VehicleId(entity), vehicle.kind, &settings);
    }
}

/// Resumes every hovering unit for the current step.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems take resources by value."
)]
pub fn drive_hover_units_system(
    time: Res<Time>,
    settings: Res<HoverSettings>,
    mut registry: ResMut<HoverRegistry>,
    mut vehicles: Query<VehicleRow<'_>>,
    mut commands: Commands,
) {
    let now = time.elapsed();
    let mut faults = Vec::new();
    for (&vehicle, unit) in registry.iter_mut() {
        if !unit.is_hovering() {
            continue;
        }
        let step = with_parts(&mut vehicles, vehicle, |mut parts| {
            let outcome = unit.advance(now, &settings, &mut parts);
            (outcome, parts.seats.occupants().collect::<Vec<_>>())
        });
        match step {
            Ok((StepOutcome::Stopped(cause), occupants)) => {
                info!("hover on {vehicle:?} ended: {cause:?}");
                broadcast(&mut commands, occupants, HoverMessage::Disabled);
            }
            Ok(_) => {}
            Err(fault) => faults.push(fault),
        }
    }
    for fault in faults {
        tear_down_faulted(&mut registry, &mut vehicles, &mut commands, fault);
    }
}

//! Observers that route host notifications to the right hover unit.
//!
//! Each observer resolves the vehicle concerned, applies the matching policy
//! and tells the affected players what happened. Nothing here holds state of
//! its own; units live in the [`HoverRegistry`] and parts on the vehicle.

use bevy::prelude::*;
use log::{debug, info, warn};

use crate::components::{BodyConstraints, Engine, Permissions, Seats};
use crate::constants::HOVER_PERMISSION;
use crate::notice::{HoverFault, HoverMessage, HoverNotice, ToggleRefusal};
use crate::settings::HoverSettings;
use crate::unit::{HoverStatus, StopCause, VehicleId};

use super::events::{
    HoverCommand, HoverShutdown, OccupantDismounted, OccupantMounted, SeatSwapRequested,
};
use super::registry::HoverRegistry;
use super::systems::{broadcast, mounted_vehicle, tear_down_faulted, with_parts, VehicleRow};

const fn status_message(status: HoverStatus) -> HoverMessage {
    match status {
        HoverStatus::Hovering => HoverMessage::Enabled,
        HoverStatus::Idle => HoverMessage::Disabled,
    }
}

fn has_hover_permission(players: &Query<&Permissions>, player: Entity) -> bool {
    players
        .get(player)
        .is_ok_and(|granted| granted.has(HOVER_PERMISSION))
}

/// A helicopter can take off into hover when the host lets it move and the
/// requester is either a passenger or piloting with the engine running.
fn is_flying(engine: &Engine, seats: &Seats, player: Entity) -> bool {
    engine.mobile && (engine.is_running() || !seats.is_pilot(player))
}

/// Checks whether `player` may toggle hover, returning their vehicle.
fn authorise_toggle(
    player: Entity,
    settings: &HoverSettings,
    registry: &HoverRegistry,
    vehicles: &Query<VehicleRow<'_>>,
    players: &Query<&Permissions>,
) -> Result<VehicleId, ToggleRefusal> {
    let vehicle = mounted_vehicle(vehicles, player).ok_or(ToggleRefusal::NotInHelicopter)?;
    if !has_hover_permission(players, player) {
        return Err(ToggleRefusal::NoPermission);
    }
    let Ok((_, _, _, engine, _, Some(seats))) = vehicles.get(vehicle.entity()) else {
        return Err(ToggleRefusal::NotInHelicopter);
    };
    if !settings.permissions.passenger_toggle && !seats.is_pilot(player) {
        return Err(ToggleRefusal::PassengerCannotToggle);
    }
    if !registry.contains(vehicle) {
        return Err(ToggleRefusal::NotInHelicopter);
    }
    if !settings.permissions.hover_with_two_occupants && seats.occupant_count() >= 2 {
        return Err(ToggleRefusal::TwoOccupants);
    }
    // A missing engine is reported as a fault once the toggle borrows parts.
    if !registry.is_hovering(vehicle) && engine.is_some_and(|engine| !is_flying(engine, seats, player))
    {
        return Err(ToggleRefusal::NotFlying);
    }
    Ok(vehicle)
}

/// Toggles hover on the issuing player's helicopter.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must take On<T> by value."
)]
pub(crate) fn on_hover_command(
    event: On<HoverCommand>,
    time: Res<Time>,
    settings: Res<HoverSettings>,
    mut registry: ResMut<HoverRegistry>,
    mut vehicles: Query<VehicleRow<'_>>,
    players: Query<&Permissions>,
    mut commands: Commands,
) {
    let player = event.event().player;
    let vehicle = match authorise_toggle(player, &settings, &registry, &vehicles, &players) {
        Ok(vehicle) => vehicle,
        Err(refusal) => {
            debug!("hover toggle by {player:?} refused: {refusal}");
            commands.trigger(HoverNotice::new(player, refusal));
            return;
        }
    };
    let Some(unit) = registry.get_mut(vehicle) else {
        return;
    };
    let now = time.elapsed();
    let toggled = with_parts(&mut vehicles, vehicle, |mut parts| {
        let status = unit.toggle(now, &settings, &mut parts);
        (status, parts.seats.occupants().collect::<Vec<_>>())
    });
    match toggled {
        Ok((status, occupants)) => {
            if status == HoverStatus::Idle {
                info!("hover on {vehicle:?} ended: {:?}", StopCause::Requested);
            }
            broadcast(&mut commands, occupants, status_message(status));
        }
        Err(fault) => {
            debug!("hover toggle by {player:?} failed: {fault}");
            tear_down_faulted(&mut registry, &mut vehicles, &mut commands, fault);
            commands.trigger(HoverNotice::new(player, ToggleRefusal::Fault));
        }
    }
}

/// Hints at the hover command when a permitted player boards.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must take On<T> by value."
)]
pub(crate) fn on_occupant_mounted(
    event: On<OccupantMounted>,
    settings: Res<HoverSettings>,
    registry: Res<HoverRegistry>,
    players: Query<&Permissions>,
    mut commands: Commands,
) {
    let OccupantMounted { vehicle, occupant } = *event.event();
    if !settings.broadcast_on_mount
        || !registry.contains(VehicleId(vehicle))
        || !has_hover_permission(&players, occupant)
    {
        return;
    }
    commands.trigger(HoverNotice::new(occupant, HoverMessage::MountHint));
}

/// Ends hover when anyone leaves a hovering helicopter, if configured to.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must take On<T> by value."
)]
pub(crate) fn on_occupant_dismounted(
    event: On<OccupantDismounted>,
    settings: Res<HoverSettings>,
    mut registry: ResMut<HoverRegistry>,
    mut vehicles: Query<VehicleRow<'_>>,
    mut commands: Commands,
) {
    if !settings.hovering.disable_on_dismount {
        return;
    }
    let OccupantDismounted { vehicle, occupant } = *event.event();
    let vehicle = VehicleId(vehicle);
    let Some(unit) = registry.get_mut(vehicle).filter(|unit| unit.is_hovering()) else {
        return;
    };
    let stopped = with_parts(&mut vehicles, vehicle, |parts| {
        unit.stop(parts.constraints);
        parts.seats.occupants().collect::<Vec<_>>()
    });
    match stopped {
        Ok(occupants) => {
            info!("hover on {vehicle:?} ended: {:?}", StopCause::Dismount);
            broadcast(
                &mut commands,
                occupants.into_iter().filter(|&player| player != occupant),
                HoverMessage::Disabled,
            );
        }
        Err(fault) => {
            debug!("dismount from {vehicle:?} failed: {fault}");
            tear_down_faulted(&mut registry, &mut vehicles, &mut commands, fault);
        }
    }
}

/// Applies the seat-change policies after a player swaps seats.
///
/// At most one policy fires: a hovering helicopter is stopped when seat
/// changes disable hover, an idle one is started when seat changes enable it.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must take On<T> by value."
)]
pub(crate) fn on_seat_swap_requested(
    event: On<SeatSwapRequested>,
    time: Res<Time>,
    settings: Res<HoverSettings>,
    mut registry: ResMut<HoverRegistry>,
    mut vehicles: Query<VehicleRow<'_>>,
    mut commands: Commands,
) {
    let player = event.event().player;
    let Some(vehicle) = mounted_vehicle(&vehicles, player) else {
        return;
    };
    let Some(unit) = registry.get_mut(vehicle) else {
        return;
    };
    let hovering = &settings.hovering;
    let now = time.elapsed();
    let switched = if hovering.disable_on_seat && unit.is_hovering() {
        with_parts(&mut vehicles, vehicle, |parts| {
            unit.stop(parts.constraints);
            Some((HoverMessage::Disabled, parts.seats.occupants().collect::<Vec<_>>()))
        })
    } else if hovering.hover_on_seat_switch && !unit.is_hovering() {
        with_parts(&mut vehicles, vehicle, |mut parts| {
            unit.start(now, &settings, &mut parts);
            Some((HoverMessage::Enabled, parts.seats.occupants().collect::<Vec<_>>()))
        })
    } else {
        Ok(None)
    };
    match switched {
        Ok(Some((message, occupants))) => {
            if message == HoverMessage::Disabled {
                info!("hover on {vehicle:?} ended: {:?}", StopCause::SeatPolicy);
            }
            debug!("seat swap by {player:?} on {vehicle:?}: {message}");
            broadcast(&mut commands, occupants, message);
        }
        Ok(None) => {}
        Err(fault) => {
            debug!("seat swap on {vehicle:?} failed: {fault}");
            tear_down_faulted(&mut registry, &mut vehicles, &mut commands, fault);
        }
    }
}

/// Tears down every unit, releasing any body still frozen.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must take On<T> by value."
)]
pub(crate) fn on_hover_shutdown(
    _event: On<HoverShutdown>,
    mut registry: ResMut<HoverRegistry>,
    mut bodies: Query<&mut BodyConstraints>,
) {
    let mut released = 0_usize;
    for mut unit in registry.drain() {
        if unit.is_hovering() {
            if let Ok(mut body) = bodies.get_mut(unit.vehicle().entity()) {
                unit.stop(&mut body);
                released += 1;
            }
        }
        unit.teardown();
    }
    info!(
        "hover shut down ({:?}), released {released} helicopter(s)",
        StopCause::Shutdown
    );
}

/// Logs every unit torn down by a fault.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must take On<T> by value."
)]
pub(crate) fn log_hover_fault(event: On<HoverFault>) {
    warn!("hover fault: {}", event.event());
}

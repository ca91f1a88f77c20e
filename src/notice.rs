//! Player-facing messages and the reasons a hover request can fail.
use std::fmt;

use bevy::prelude::*;
use thiserror::Error;

use crate::unit::VehicleId;

/// Why a hover toggle request was refused.
///
/// Every variant maps to its own message so players learn exactly what to
/// change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ToggleRefusal {
    /// The player lacks the hover capability.
    #[error("You do not have permission to hover")]
    NoPermission,
    /// The player is not mounted in a hover-eligible helicopter.
    #[error("You are not in a helicopter")]
    NotInHelicopter,
    /// Only the pilot may toggle and the player is a passenger.
    #[error("Only the pilot can toggle hover")]
    PassengerCannotToggle,
    /// A second occupant is aboard and two-occupant hover is disabled.
    #[error("Cannot hover with two occupants")]
    TwoOccupants,
    /// The helicopter is not in the air.
    #[error("The helicopter is not flying")]
    NotFlying,
    /// The vehicle was missing a part it needs; its unit was removed.
    #[error("Error found, please retry")]
    Fault,
}

/// Host components a hover unit cannot work without.
///
/// Triggered as an event whenever a unit is torn down because one of these
/// went missing.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HoverFault {
    /// No rigid body to constrain.
    #[error("rigid body of helicopter {0:?} is missing")]
    MissingRigidBody(VehicleId),
    /// No engine to keep alive.
    #[error("engine of helicopter {0:?} is missing")]
    MissingEngine(VehicleId),
    /// No fuel system to bill.
    #[error("fuel system of helicopter {0:?} is missing")]
    MissingFuel(VehicleId),
    /// No mount points to inspect.
    #[error("seats of helicopter {0:?} are missing")]
    MissingSeats(VehicleId),
    /// The vehicle entity no longer exists.
    #[error("helicopter {0:?} no longer exists")]
    VehicleGone(VehicleId),
}

impl HoverFault {
    /// Vehicle whose unit faulted.
    #[must_use]
    pub const fn vehicle(self) -> VehicleId {
        match self {
            Self::MissingRigidBody(id)
            | Self::MissingEngine(id)
            | Self::MissingFuel(id)
            | Self::MissingSeats(id)
            | Self::VehicleGone(id) => id,
        }
    }
}

/// Message text delivered to a single player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverMessage {
    /// Hint sent on mounting a hover-capable helicopter.
    MountHint,
    /// Hover switched on.
    Enabled,
    /// Hover switched off.
    Disabled,
    /// A toggle request was refused.
    Refused(ToggleRefusal),
}

impl fmt::Display for HoverMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MountHint => f.write_str("Use '/hover' to toggle hover"),
            Self::Enabled => f.write_str("Helicopter hover: enabled"),
            Self::Disabled => f.write_str("Helicopter hover: disabled"),
            Self::Refused(reason) => write!(f, "{reason}"),
        }
    }
}

impl From<ToggleRefusal> for HoverMessage {
    fn from(reason: ToggleRefusal) -> Self {
        Self::Refused(reason)
    }
}

/// Event asking the host to show `message` to `recipient`.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoverNotice {
    /// Player who should see the message.
    pub recipient: Entity,
    /// What to tell them.
    pub message: HoverMessage,
}

impl HoverNotice {
    /// Builds a notice for `recipient`.
    pub fn new(recipient: Entity, message: impl Into<HoverMessage>) -> Self {
        Self {
            recipient,
            message: message.into(),
        }
    }
}

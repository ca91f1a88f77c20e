//! Lifecycle notifications the host triggers into the hover core.
//!
//! Vehicle spawn and destruction are observed directly from the
//! [`Vehicle`](crate::components::Vehicle) component. Everything else arrives
//! as one of these events through `World::trigger` or `Commands::trigger`.
use bevy::prelude::*;

/// A player mounted a seat on `vehicle`.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct OccupantMounted {
    /// Vehicle that owns the mount point.
    pub vehicle: Entity,
    /// Player who mounted.
    pub occupant: Entity,
}

/// A player left a seat on `vehicle`.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct OccupantDismounted {
    /// Vehicle that owns the mount point.
    pub vehicle: Entity,
    /// Player who dismounted.
    pub occupant: Entity,
}

/// A player asked to swap seats in whatever vehicle they occupy.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatSwapRequested {
    /// Player issuing the swap.
    pub player: Entity,
}

/// A player issued the hover toggle command.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoverCommand {
    /// Player issuing the command.
    pub player: Entity,
}

/// The plugin is unloading; every unit is torn down.
#[derive(Event, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HoverShutdown;

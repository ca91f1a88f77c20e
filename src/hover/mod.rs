//! Bevy integration for helicopter hover.
//!
//! This module provides a [`HoverPlugin`] that keeps a [`HoverRegistry`] of
//! hover units in step with the vehicles in the world, routes host events to
//! the right unit and resumes hovering units once per frame. The systems are
//! also exposed for hosts that schedule them themselves.

mod events;
mod plugin;
mod registry;
mod router;
mod systems;
mod test_support;

pub use events::{
    HoverCommand, HoverShutdown, OccupantDismounted, OccupantMounted, SeatSwapRequested,
};
pub use plugin::HoverPlugin;
pub use registry::HoverRegistry;
pub use systems::{
    drive_hover_units_system, scan_live_vehicles_system, track_vehicle_lifecycle_system,
};

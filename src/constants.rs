//! Hover constants shared across the registry, units and command routing.
use std::time::Duration;

/// Capability a player needs before any hover request is honoured.
pub const HOVER_PERMISSION: &str = "helicopterhover.enable";

/// Minimum spacing between two fuel draws while hovering.
///
/// The tick loop runs every simulation step but bills fuel at most once per
/// interval, so the burn rate does not depend on the step rate.
pub const FUEL_TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Burn time charged by a single fuel draw, in seconds of engine time.
pub const FUEL_DRAW_SECONDS: f32 = 1.0;

/// Default length of a timed hover session, in seconds.
pub const DEFAULT_TIMED_HOVER_SECS: f32 = 60.0;

/// Chat command that toggles hover.
pub const CHAT_COMMAND: &str = "/hover";

/// Console command that toggles hover.
pub const CONSOLE_COMMAND: &str = "helicopterhover.hover";

/// Host console command issued when a player swaps seats.
pub const SWAP_SEATS_COMMAND: &str = "vehicle.swapseats";

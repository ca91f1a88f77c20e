#![cfg_attr(docsrs, feature(doc_cfg))]
//! Library crate providing helicopter hover for a Bevy-hosted simulation.
//!
//! A hover-eligible helicopter gets a [`HoverUnit`] that can freeze its
//! altitude on request, keep its engine alive, bill fuel while hovering and
//! end the session on policy. [`HoverPlugin`] wires the units to the host's
//! vehicles, players and events.
pub mod command;
pub mod components;
pub mod constants;
pub mod hover;
pub mod logging;
pub mod notice;
pub mod settings;
pub mod unit;
pub use constants::*;

// Re-export commonly used items
pub use command::{parse_command, HoverCommandKind};
pub use components::{
    BodyConstraints, Engine, FuelTank, Permissions, Seats, Vehicle, VehicleKind,
};
pub use hover::{
    drive_hover_units_system, scan_live_vehicles_system, track_vehicle_lifecycle_system,
    HoverCommand, HoverPlugin, HoverRegistry, HoverShutdown, OccupantDismounted,
    OccupantMounted, SeatSwapRequested,
};
pub use logging::init as init_logging;
pub use notice::{HoverFault, HoverMessage, HoverNotice, ToggleRefusal};
pub use settings::{HoverSettings, HoveringSettings, PermissionSettings, SettingsError};
pub use unit::{HoverStatus, HoverUnit, StepOutcome, StopCause, TickLoop, VehicleId, VehicleParts};

pub mod prelude {
    //! Prelude exports used in documentation examples.
    //!
    //! ```rust,no_run
    //! use heli_hover::prelude::*;
    //! ```

    pub use crate::components::{
        BodyConstraints, Engine, FuelTank, Permissions, Seats, Vehicle, VehicleKind,
    };
    pub use crate::HoverCommand;
    pub use crate::HoverNotice;
    pub use crate::HoverPlugin;
    pub use crate::HoverRegistry;
    pub use crate::HoverSettings;
}

//! Bevy plugin wiring the hover registry, router and tick driver.

use std::path::Path;

use bevy::prelude::*;

use crate::settings::HoverSettings;

use super::registry::HoverRegistry;
use super::router::{
    log_hover_fault, on_hover_command, on_hover_shutdown, on_occupant_dismounted,
    on_occupant_mounted, on_seat_swap_requested,
};
use super::systems::{
    drive_hover_units_system, scan_live_vehicles_system, track_vehicle_lifecycle_system,
};

/// Installs helicopter hover into an app.
///
/// Settings already inserted as a resource are kept unless the plugin was
/// built with explicit settings.
#[derive(Debug, Default)]
pub struct HoverPlugin {
    settings: Option<HoverSettings>,
}

impl HoverPlugin {
    /// Uses `settings` instead of any existing resource.
    #[must_use]
    pub const fn with_settings(settings: HoverSettings) -> Self {
        Self {
            settings: Some(settings),
        }
    }

    /// Loads settings from a JSON file, creating it with defaults if needed.
    #[must_use]
    pub fn from_config_file(path: &Path) -> Self {
        Self::with_settings(HoverSettings::load_or_default(path))
    }
}

impl Plugin for HoverPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<HoverSettings>();
        if let Some(settings) = &self.settings {
            app.insert_resource(settings.clone());
        }
        app.init_resource::<HoverRegistry>();

        app.add_observer(log_hover_fault);
        app.add_observer(on_hover_command);
        app.add_observer(on_occupant_mounted);
        app.add_observer(on_occupant_dismounted);
        app.add_observer(on_seat_swap_requested);
        app.add_observer(on_hover_shutdown);

        app.add_systems(Startup, scan_live_vehicles_system);
        app.add_systems(
            Update,
            (track_vehicle_lifecycle_system, drive_hover_units_system).chain(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Vehicle, VehicleKind};
    use crate::hover::test_support::{install_capture, CapturedFaults, CapturedNotices};
    use crate::hover::HoverShutdown;
    use rstest::rstest;

    fn app_with(settings: HoverSettings) -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(HoverPlugin::with_settings(settings));
        install_capture(&mut app);
        app
    }

    #[rstest]
    fn startup_scan_registers_existing_helicopters() {
        let mut app = app_with(HoverSettings::default());
        for kind in VehicleKind::ALL {
            app.world_mut().spawn(Vehicle::new(kind));
        }
        app.update();
        assert_eq!(app.world().resource::<HoverRegistry>().len(), 3);
    }

    #[rstest]
    fn existing_settings_resource_is_kept() {
        let mut custom = HoverSettings::default();
        custom.hovering.use_fuel = false;
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(custom.clone());
        app.add_plugins(HoverPlugin::default());
        assert_eq!(app.world().resource::<HoverSettings>(), &custom);
    }

    #[rstest]
    fn despawned_vehicle_loses_its_unit() {
        let mut app = app_with(HoverSettings::default());
        app.update();
        let heli = app.world_mut().spawn(Vehicle::new(VehicleKind::Chinook)).id();
        app.update();
        assert_eq!(app.world().resource::<HoverRegistry>().len(), 1);
        app.world_mut().despawn(heli);
        app.update();
        assert!(app.world().resource::<HoverRegistry>().is_empty());
    }

    #[rstest]
    fn shutdown_empties_the_registry_without_faults() {
        let mut app = app_with(HoverSettings::default());
        app.world_mut().spawn(Vehicle::new(VehicleKind::Minicopter));
        app.update();
        app.world_mut().trigger(HoverShutdown);
        app.world_mut().flush();
        assert!(app.world().resource::<HoverRegistry>().is_empty());
        assert!(app.world().resource::<CapturedFaults>().0.is_empty());
        assert!(app.world().resource::<CapturedNotices>().0.is_empty());
    }
}

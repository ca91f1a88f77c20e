//! Process-wide ownership of hover units.

use bevy::prelude::Resource;
use hashbrown::HashMap;
use log::debug;

use crate::components::VehicleKind;
use crate::settings::HoverSettings;
use crate::unit::{HoverUnit, VehicleId};

/// Resource mapping each hover-eligible vehicle to its unit.
///
/// The registry is the sole owner of every [`HoverUnit`]. Vehicles are only
/// referenced by [`VehicleId`], and at most one unit exists per identity.
#[derive(Resource, Debug, Default)]
pub struct HoverRegistry {
    units: HashMap<VehicleId, HoverUnit>,
}

impl HoverRegistry {
    /// Creates a unit for `vehicle` when its kind is eligible and it has none.
    ///
    /// Returns `true` if a unit was created.
    pub fn register(
        &mut self,
        vehicle: VehicleId,
        kind: VehicleKind,
        settings: &HoverSettings,
    ) -> bool {
        if !settings.is_eligible(kind) {
            debug!("{kind:?} {vehicle:?} is not hover-eligible");
            return false;
        }
        if self.units.contains_key(&vehicle) {
            return false;
        }
        debug!("registering hover unit for {kind:?} {vehicle:?}");
        self.units.insert(vehicle, HoverUnit::new(vehicle));
        true
    }

    /// Removes and tears down the unit for `vehicle`.
    ///
    /// Returns `true` if a unit existed.
    pub fn remove(&mut self, vehicle: VehicleId) -> bool {
        self.units.remove(&vehicle).map(HoverUnit::teardown).is_some()
    }

    /// Borrows the unit for `vehicle`.
    #[must_use]
    pub fn get(&self, vehicle: VehicleId) -> Option<&HoverUnit> {
        self.units.get(&vehicle)
    }

    /// Mutably borrows the unit for `vehicle`.
    pub fn get_mut(&mut self, vehicle: VehicleId) -> Option<&mut HoverUnit> {
        self.units.get_mut(&vehicle)
    }

    /// Whether `vehicle` has a unit.
    #[must_use]
    pub fn contains(&self, vehicle: VehicleId) -> bool {
        self.units.contains_key(&vehicle)
    }

    /// Whether `vehicle` has a unit that is hovering.
    #[must_use]
    pub fn is_hovering(&self, vehicle: VehicleId) -> bool {
        self.get(vehicle).is_some_and(HoverUnit::is_hovering)
    }

    /// Number of registered units.
    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Whether no units are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Iterates over every unit mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&VehicleId, &mut HoverUnit)> {
        self.units.iter_mut()
    }

    /// Removes every unit, handing ownership to the caller.
    pub fn drain(&mut self) -> impl Iterator<Item = HoverUnit> + '_ {
        self.units.drain().map(|(_, unit)| unit)
    }
}

//! Per-vehicle hover state machine.
//!
//! A [`HoverUnit`] has two states, idle and hovering. `hovering` is the only
//! record of whether the vehicle's altitude is frozen, and every transition
//! writes the flag and the rigid-body constraint together so the two never
//! disagree. While hovering with the keep-engine option on, the unit owns a
//! single [`TickLoop`] that the host resumes once per simulation step.

mod schedule;
mod tick;

use std::time::Duration;

use bevy::prelude::Entity;
use log::{debug, info};

use crate::components::{BodyConstraints, Engine, FuelTank, Seats};
use crate::constants::FUEL_DRAW_SECONDS;
use crate::settings::HoverSettings;

use schedule::{take_due, Scheduled};
pub use tick::TickLoop;
use tick::Resume;

/// Stable identity of a live vehicle.
///
/// Wraps the vehicle's Bevy [`Entity`], whose generation keeps a recycled
/// index from aliasing the unit of a destroyed vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VehicleId(pub Entity);

impl From<Entity> for VehicleId {
    fn from(entity: Entity) -> Self {
        Self(entity)
    }
}

impl VehicleId {
    /// The vehicle's entity.
    #[must_use]
    pub const fn entity(self) -> Entity {
        self.0
    }
}

/// Mutable view over the host components a unit drives.
pub struct VehicleParts<'a> {
    /// Rigid-body constraint flags.
    pub constraints: &'a mut BodyConstraints,
    /// Engine state.
    pub engine: &'a mut Engine,
    /// Fuel reserve.
    pub fuel: &'a mut FuelTank,
    /// Current occupancy.
    pub seats: &'a Seats,
}

/// Externally visible hover state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverStatus {
    /// Altitude is free.
    Idle,
    /// Altitude is frozen.
    Hovering,
}

/// Why a hover session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopCause {
    /// A player toggled hover off.
    Requested,
    /// An occupant dismounted while the dismount policy was on.
    Dismount,
    /// A seat change or a pilotless cabin ended the session.
    SeatPolicy,
    /// The tank ran dry.
    FuelExhausted,
    /// The timed-hover deadline passed.
    TimedExpiry,
    /// The plugin is shutting down.
    Shutdown,
}

/// Result of resuming a unit for one simulation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The unit was idle and nothing ran.
    Idle,
    /// The unit is still hovering.
    Hovering,
    /// The session ended during this step.
    Stopped(StopCause),
}

/// Hover state for one vehicle.
#[derive(Debug)]
pub struct HoverUnit {
    vehicle: VehicleId,
    hovering: bool,
    /// Incremented on every idle to hovering transition.
    session: u64,
    tick_loop: Option<TickLoop>,
    deadline: Option<Scheduled>,
    /// Time of the most recent fuel draw in this session.
    fuel_clock: Option<Duration>,
    fuel_draw: Option<Scheduled>,
}

impl HoverUnit {
    /// Creates an idle unit for `vehicle`.
    #[must_use]
    pub const fn new(vehicle: VehicleId) -> Self {
        Self {
            vehicle,
            hovering: false,
            session: 0,
            tick_loop: None,
            deadline: None,
            fuel_clock: None,
            fuel_draw: None,
        }
    }

    /// Vehicle this unit belongs to.
    #[must_use]
    pub const fn vehicle(&self) -> VehicleId {
        self.vehicle
    }

    /// Whether the vehicle's altitude is frozen.
    #[must_use]
    pub const fn is_hovering(&self) -> bool {
        self.hovering
    }

    /// Current state.
    #[must_use]
    pub const fn status(&self) -> HoverStatus {
        if self.hovering {
            HoverStatus::Hovering
        } else {
            HoverStatus::Idle
        }
    }

    /// Whether a tick loop is alive.
    #[must_use]
    pub const fn has_tick_loop(&self) -> bool {
        self.tick_loop.is_some()
    }

    /// Borrow the running tick loop, if any.
    #[must_use]
    pub const fn tick_loop(&self) -> Option<&TickLoop> {
        self.tick_loop.as_ref()
    }

    /// When the timed-hover deadline fires, if one is scheduled.
    #[must_use]
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline.map(|entry| entry.due)
    }

    /// When the next fuel deduction lands, if one is scheduled.
    #[must_use]
    pub fn pending_fuel_draw(&self) -> Option<Duration> {
        self.fuel_draw.map(|entry| entry.due)
    }

    /// Whether the hover flag agrees with the body's vertical freeze.
    #[must_use]
    pub const fn is_consistent_with(&self, constraints: &BodyConstraints) -> bool {
        self.hovering == constraints.freeze_position_y
    }

    /// Freezes altitude and starts the session's schedules.
    ///
    /// Starting an already hovering unit reapplies the constraint and forces
    /// the engine on again, but never spawns a second tick loop.
    pub fn start(&mut self, now: Duration, settings: &HoverSettings, parts: &mut VehicleParts) {
        if !self.hovering {
            self.session += 1;
            self.hovering = true;
            info!("hover enabled for {:?}", self.vehicle);
        }
        parts.constraints.freeze_position_y = true;
        if settings.freezes_rotation() {
            parts.constraints.freeze_rotation = true;
        }
        parts.engine.force_on();

        if self.deadline.is_none() {
            if let Some(duration) = settings.timed_hover_duration() {
                self.deadline = Some(Scheduled::new(
                    now.saturating_add(duration),
                    self.session,
                ));
            }
        }
        if settings.hovering.keep_engine_on && self.tick_loop.is_none() {
            self.tick_loop = Some(TickLoop::new(self.session));
        }
    }

    /// Releases the body and cancels the tick loop and every schedule.
    ///
    /// Stopping an idle unit changes nothing.
    pub fn stop(&mut self, constraints: &mut BodyConstraints) {
        if self.hovering {
            info!("hover disabled for {:?}", self.vehicle);
        }
        self.hovering = false;
        constraints.release();
        self.cancel_schedules();
    }

    /// Stops a hovering unit or starts an idle one, returning the new state.
    pub fn toggle(
        &mut self,
        now: Duration,
        settings: &HoverSettings,
        parts: &mut VehicleParts,
    ) -> HoverStatus {
        if self.hovering {
            self.stop(parts.constraints);
        } else {
            self.start(now, settings, parts);
        }
        self.status()
    }

    /// Runs due schedules and resumes the tick loop for one step.
    pub fn advance(
        &mut self,
        now: Duration,
        settings: &HoverSettings,
        parts: &mut VehicleParts,
    ) -> StepOutcome {
        if !self.hovering {
            return StepOutcome::Idle;
        }

        if take_due(&mut self.deadline, now, self.session) {
            debug!("timed hover expired for {:?}", self.vehicle);
            self.stop(parts.constraints);
            return StepOutcome::Stopped(StopCause::TimedExpiry);
        }

        if take_due(&mut self.fuel_draw, now, self.session) {
            let rate = parts.fuel.burn_rate;
            let burned = parts.fuel.try_use(FUEL_DRAW_SECONDS, rate);
            debug!(
                "hover burned {burned} fuel on {:?}, {} left",
                self.vehicle, parts.fuel.amount
            );
        }

        let Some(mut tick_loop) = self.tick_loop.take() else {
            return StepOutcome::Hovering;
        };
        match self.resume(&mut tick_loop, now, settings, parts) {
            Resume::Yield => {
                self.tick_loop = Some(tick_loop);
                StepOutcome::Hovering
            }
            Resume::Discard => StepOutcome::Hovering,
            Resume::Finish(cause) => {
                debug!(
                    "tick loop for {:?} finished after {} steps: {cause:?}",
                    self.vehicle,
                    tick_loop.steps()
                );
                parts.engine.force_off();
                self.stop(parts.constraints);
                StepOutcome::Stopped(cause)
            }
        }
    }

    /// Cancels everything the unit owns before it is dropped.
    pub fn teardown(mut self) {
        debug!("tearing down hover unit for {:?}", self.vehicle);
        self.hovering = false;
        self.cancel_schedules();
    }

    fn cancel_schedules(&mut self) {
        self.tick_loop = None;
        self.deadline = None;
        self.fuel_draw = None;
        self.fuel_clock = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::prelude::World;
    use rstest::{fixture, rstest};

    struct Rig {
        unit: HoverUnit,
        constraints: BodyConstraints,
        engine: Engine,
        fuel: FuelTank,
        seats: Seats,
        settings: HoverSettings,
    }

    impl Rig {
        fn parts(&mut self) -> (&mut HoverUnit, &HoverSettings, VehicleParts<'_>) {
            (
                &mut self.unit,
                &self.settings,
                VehicleParts {
                    constraints: &mut self.constraints,
                    engine: &mut self.engine,
                    fuel: &mut self.fuel,
                    seats: &self.seats,
                },
            )
        }

        fn start(&mut self, now: Duration) {
            let (unit, settings, mut parts) = self.parts();
            unit.start(now, settings, &mut parts);
        }

        fn stop(&mut self) {
            self.unit.stop(&mut self.constraints);
        }

        fn toggle(&mut self, now: Duration) -> HoverStatus {
            let (unit, settings, mut parts) = self.parts();
            unit.toggle(now, settings, &mut parts)
        }

        fn advance(&mut self, now: Duration) -> StepOutcome {
            let (unit, settings, mut parts) = self.parts();
            unit.advance(now, settings, &mut parts)
        }

        fn consistent(&self) -> bool {
            self.unit.is_consistent_with(&self.constraints)
        }
    }

    #[fixture]
    fn rig() -> Rig {
        let mut world = World::new();
        let vehicle = world.spawn_empty().id();
        let pilot = world.spawn_empty().id();
        Rig {
            unit: HoverUnit::new(VehicleId(vehicle)),
            constraints: BodyConstraints::default(),
            engine: Engine::default(),
            fuel: FuelTank::new(100, 1.0),
            seats: Seats::piloted_by(pilot),
            settings: HoverSettings::default(),
        }
    }

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[rstest]
    fn new_unit_is_idle(rig: Rig) {
        assert_eq!(rig.unit.status(), HoverStatus::Idle);
        assert!(!rig.unit.has_tick_loop());
        assert!(rig.consistent());
    }

    #[rstest]
    fn start_freezes_altitude_and_runs_engine(mut rig: Rig) {
        rig.start(Duration::ZERO);
        assert!(rig.unit.is_hovering());
        assert!(rig.constraints.freeze_position_y);
        assert!(!rig.constraints.freeze_rotation);
        assert!(rig.engine.is_running());
        assert!(rig.unit.has_tick_loop());
        assert!(rig.consistent());
        assert_eq!(rig.fuel.amount, 100, "start must not bill fuel");
    }

    #[rstest]
    fn start_locks_rotation_when_configured(mut rig: Rig) {
        rig.settings.hovering.allow_rotation = false;
        rig.start(Duration::ZERO);
        assert!(rig.constraints.freeze_rotation);
        rig.stop();
        assert!(!rig.constraints.freeze_rotation);
    }

    #[rstest]
    fn start_without_keep_engine_has_no_tick_loop(mut rig: Rig) {
        rig.settings.hovering.keep_engine_on = false;
        rig.start(Duration::ZERO);
        assert!(rig.unit.is_hovering());
        assert!(!rig.unit.has_tick_loop());
    }

    #[rstest]
    fn restarting_keeps_the_same_tick_loop(mut rig: Rig) {
        rig.start(Duration::ZERO);
        let session = rig.unit.tick_loop().map(TickLoop::session);
        rig.advance(ms(100));
        rig.start(ms(200));
        assert_eq!(rig.unit.tick_loop().map(TickLoop::session), session);
        assert_eq!(rig.unit.tick_loop().map(TickLoop::steps), Some(1));
        assert!(rig.consistent());
    }

    #[rstest]
    fn stop_is_idempotent(mut rig: Rig) {
        rig.start(Duration::ZERO);
        rig.stop();
        let once = (rig.unit.status(), rig.constraints);
        rig.stop();
        assert_eq!((rig.unit.status(), rig.constraints), once);
        assert!(!rig.unit.has_tick_loop());
        assert!(rig.unit.deadline().is_none());
        assert!(rig.unit.pending_fuel_draw().is_none());
        assert!(rig.consistent());
    }

    #[rstest]
    fn double_toggle_restores_original_state(mut rig: Rig) {
        let before = rig.constraints;
        assert_eq!(rig.toggle(Duration::ZERO), HoverStatus::Hovering);
        assert!(rig.consistent());
        assert_eq!(rig.toggle(ms(1000)), HoverStatus::Idle);
        assert_eq!(rig.constraints, before);
        assert!(rig.consistent());
    }

    #[rstest]
    fn idle_unit_does_not_step(mut rig: Rig) {
        assert_eq!(rig.advance(ms(5000)), StepOutcome::Idle);
        assert_eq!(rig.fuel.amount, 100);
    }

    #[rstest]
    fn keepalive_restarts_engine_for_occupied_vehicle(mut rig: Rig) {
        rig.start(Duration::ZERO);
        rig.engine.force_off();
        assert_eq!(rig.advance(ms(100)), StepOutcome::Hovering);
        assert!(rig.engine.is_running());
    }

    #[rstest]
    fn keepalive_leaves_empty_vehicle_alone_under_dismount_policy(mut rig: Rig) {
        rig.start(Duration::ZERO);
        rig.seats = Seats::default();
        rig.engine.force_off();
        rig.advance(ms(100));
        assert!(!rig.engine.is_running());
    }

    #[rstest]
    fn keepalive_runs_empty_vehicle_without_dismount_policy(mut rig: Rig) {
        rig.settings.hovering.disable_on_dismount = false;
        rig.start(Duration::ZERO);
        rig.seats = Seats::default();
        rig.engine.force_off();
        rig.advance(ms(100));
        assert!(rig.engine.is_running());
    }

    #[rstest]
    fn fuel_is_billed_once_per_interval(mut rig: Rig) {
        rig.start(Duration::ZERO);
        for step in 1..=30 {
            rig.advance(ms(100) * step);
        }
        // Draws scheduled at 0.1s, 1.1s and 2.1s; the first two have landed.
        assert_eq!(rig.fuel.amount, 98);
        assert_eq!(rig.unit.pending_fuel_draw(), Some(ms(3100)));
    }

    #[rstest]
    fn fuel_is_not_billed_when_disabled(mut rig: Rig) {
        rig.settings.hovering.use_fuel = false;
        rig.start(Duration::ZERO);
        for step in 1..=30 {
            rig.advance(ms(100) * step);
        }
        assert_eq!(rig.fuel.amount, 100);
        assert!(rig.unit.pending_fuel_draw().is_none());
    }

    #[rstest]
    fn exhausted_fuel_ends_hover(mut rig: Rig) {
        rig.fuel = FuelTank::new(1, 1.0);
        rig.start(Duration::ZERO);
        assert_eq!(rig.advance(Duration::ZERO), StepOutcome::Hovering);
        assert_eq!(
            rig.advance(ms(1000)),
            StepOutcome::Stopped(StopCause::FuelExhausted)
        );
        assert_eq!(rig.unit.status(), HoverStatus::Idle);
        assert!(!rig.engine.is_running());
        assert!(!rig.constraints.freeze_position_y);
        assert!(rig.consistent());
    }

    #[rstest]
    fn pilotless_cabin_ends_hover_under_seat_policy(mut rig: Rig) {
        rig.settings.hovering.disable_on_seat = true;
        rig.start(Duration::ZERO);
        let pilot = rig.seats.pilot.take();
        rig.seats.passengers.extend(pilot);
        assert_eq!(
            rig.advance(ms(100)),
            StepOutcome::Stopped(StopCause::SeatPolicy)
        );
        assert!(!rig.engine.is_running());
        assert!(rig.consistent());
    }

    #[rstest]
    fn timed_hover_expires_at_deadline(mut rig: Rig) {
        rig.settings.hovering.timed_hover = true;
        rig.settings.hovering.hover_duration = 60.0;
        rig.start(Duration::ZERO);
        assert_eq!(rig.unit.deadline(), Some(ms(60000)));
        assert_eq!(rig.advance(Duration::from_millis(59_900)), StepOutcome::Hovering);
        assert_eq!(
            rig.advance(ms(60000)),
            StepOutcome::Stopped(StopCause::TimedExpiry)
        );
        assert!(rig.unit.deadline().is_none());
        assert!(rig.consistent());
    }

    #[rstest]
    fn timed_hover_expires_without_tick_loop(mut rig: Rig) {
        rig.settings.hovering.timed_hover = true;
        rig.settings.hovering.keep_engine_on = false;
        rig.start(Duration::ZERO);
        assert_eq!(
            rig.advance(ms(61000)),
            StepOutcome::Stopped(StopCause::TimedExpiry)
        );
    }

    #[rstest]
    fn unrepresentable_duration_never_expires(mut rig: Rig) {
        rig.settings.hovering.timed_hover = true;
        rig.settings.hovering.hover_duration = 1.0e20;
        rig.start(ms(500));
        assert_eq!(rig.unit.deadline(), Some(Duration::MAX));
        assert_eq!(rig.advance(ms(1_000_000)), StepOutcome::Hovering);
    }

    #[rstest]
    fn stop_cancels_pending_fuel_draw(mut rig: Rig) {
        rig.start(Duration::ZERO);
        rig.advance(ms(100));
        assert!(rig.unit.pending_fuel_draw().is_some());
        rig.stop();
        rig.start(ms(500));
        rig.advance(ms(1200));
        assert_eq!(rig.fuel.amount, 100, "cancelled draw must not land");
    }
}

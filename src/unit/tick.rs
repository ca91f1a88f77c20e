//! Cooperative fuel and engine keepalive loop.
//!
//! The loop never blocks. The host resumes it once per simulation step, it
//! runs the four checks below in order, then either yields until the next
//! step or finishes with the reason the session must end.
//!
//! 1. schedule the timed-hover deadline if the session lacks one;
//! 2. restart a stalled engine while someone is aboard, or always when the
//!    dismount policy is off;
//! 3. schedule a fuel draw if a full interval has passed since the last one;
//! 4. finish on an empty tank, or on a pilotless cabin under the seat policy.
use std::time::Duration;

use log::trace;

use crate::constants::FUEL_TICK_INTERVAL;
use crate::settings::HoverSettings;

use super::schedule::Scheduled;
use super::{HoverUnit, StopCause, VehicleParts};

/// Handle to the per-session tick loop of a hovering unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickLoop {
    session: u64,
    steps: u64,
}

impl TickLoop {
    pub(super) const fn new(session: u64) -> Self {
        Self { session, steps: 0 }
    }

    /// Hover session this loop belongs to.
    #[must_use]
    pub const fn session(&self) -> u64 {
        self.session
    }

    /// Number of steps the loop has been resumed for.
    #[must_use]
    pub const fn steps(&self) -> u64 {
        self.steps
    }
}

/// What the loop asks of its driver after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Resume {
    /// Suspend until the next simulation step.
    Yield,
    /// The session must end.
    Finish(StopCause),
    /// The loop outlived its session and must be dropped without acting.
    Discard,
}

impl HoverUnit {
    pub(super) fn resume(
        &mut self,
        tick_loop: &mut TickLoop,
        now: Duration,
        settings: &HoverSettings,
        parts: &mut VehicleParts,
    ) -> Resume {
        if tick_loop.session != self.session {
            trace!("discarding tick loop from session {}", tick_loop.session);
            return Resume::Discard;
        }
        tick_loop.steps += 1;

        if self.deadline.is_none() {
            if let Some(duration) = settings.timed_hover_duration() {
                self.deadline = Some(Scheduled::new(
                    now.saturating_add(duration),
                    self.session,
                ));
            }
        }

        let hovering = &settings.hovering;
        if !parts.engine.is_running()
            && (parts.seats.has_occupants() || !hovering.disable_on_dismount)
        {
            trace!("keepalive restarting engine on {:?}", self.vehicle);
            parts.engine.force_on();
        }

        if hovering.use_fuel && parts.fuel.has_fuel() && self.fuel_interval_elapsed(now) {
            self.fuel_draw = Some(Scheduled::new(now + FUEL_TICK_INTERVAL, self.session));
            self.fuel_clock = Some(now);
        }

        if !parts.fuel.has_fuel() {
            return Resume::Finish(StopCause::FuelExhausted);
        }
        if hovering.disable_on_seat && parts.seats.has_occupants() && !parts.seats.has_pilot() {
            return Resume::Finish(StopCause::SeatPolicy);
        }
        Resume::Yield
    }

    fn fuel_interval_elapsed(&self, now: Duration) -> bool {
        self.fuel_clock
            .is_none_or(|last| now.saturating_sub(last) >= FUEL_TICK_INTERVAL)
    }
}

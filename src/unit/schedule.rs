//! One-shot schedules owned by a hover unit.
use std::time::Duration;

use log::debug;

/// A deferred action due at an absolute simulation time.
///
/// Each entry is stamped with the hover session that created it. An entry
/// whose session no longer matches the unit's is stale and is discarded
/// without running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Scheduled {
    pub(crate) due: Duration,
    pub(crate) session: u64,
}

impl Scheduled {
    pub(crate) const fn new(due: Duration, session: u64) -> Self {
        Self { due, session }
    }
}

/// Takes the entry out of `slot` if it is due for `session` at `now`.
///
/// Stale entries are dropped and reported as not due.
pub(crate) fn take_due(slot: &mut Option<Scheduled>, now: Duration, session: u64) -> bool {
    match *slot {
        Some(entry) if entry.session != session => {
            debug!(
                "dropping stale schedule from session {} (current {session})",
                entry.session
            );
            *slot = None;
            false
        }
        Some(entry) if now >= entry.due => {
            *slot = None;
            true
        }
        _ => false,
    }
}

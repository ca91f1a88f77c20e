//! Test-only helpers for observing hover notices and faults.

#![cfg(test)]

use bevy::prelude::*;

use crate::notice::{HoverFault, HoverNotice};

/// Notices triggered during a test, in order.
#[derive(Resource, Default, Debug)]
pub struct CapturedNotices(pub Vec<HoverNotice>);

/// Faults triggered during a test, in order.
#[derive(Resource, Default, Debug)]
pub struct CapturedFaults(pub Vec<HoverFault>);

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must take On<T> by value."
)]
fn record_notice(event: On<HoverNotice>, mut notices: ResMut<CapturedNotices>) {
    notices.0.push(*event.event());
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must take On<T> by value."
)]
fn record_fault(event: On<HoverFault>, mut faults: ResMut<CapturedFaults>) {
    faults.0.push(*event.event());
}

/// Installs the capturing observers and resources on the provided app.
pub fn install_capture(app: &mut App) {
    app.insert_resource(CapturedNotices::default());
    app.insert_resource(CapturedFaults::default());
    app.add_observer(record_notice);
    app.add_observer(record_fault);
}

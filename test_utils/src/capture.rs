//! Helpers for observing hover notices and faults in tests.
use bevy::ecs::prelude::On;
use bevy::prelude::*;
use heli_hover::{HoverFault, HoverMessage, HoverNotice};

/// Notices triggered during a test, in order.
#[derive(Resource, Default, Debug)]
pub struct CapturedNotices(pub Vec<HoverNotice>);

impl CapturedNotices {
    /// Messages delivered to `player`, in order.
    #[must_use]
    pub fn for_player(&self, player: Entity) -> Vec<HoverMessage> {
        self.0
            .iter()
            .filter(|notice| notice.recipient == player)
            .map(|notice| notice.message)
            .collect()
    }
}

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
    app.world_mut().add_observer(record_notice);
    app.world_mut().add_observer(record_fault);
}

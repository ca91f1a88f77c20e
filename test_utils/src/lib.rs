//! Utility helpers for hover integration tests.
pub mod capture;
pub mod spawn;

pub use capture::{install_capture, CapturedFaults, CapturedNotices};
pub use spawn::{hover_app, spawn_player, HelicopterRig, STEP};

//! Hover configuration loaded once at startup.
//!
//! The on-disk format is JSON with the property names server operators
//! already know. Unknown or missing keys fall back to defaults, and a file
//! that cannot be read or parsed never stops the plugin from starting.
use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

use bevy::prelude::Resource;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::components::VehicleKind;
use crate::constants::DEFAULT_TIMED_HOVER_SECS;

/// Errors raised while reading or writing the settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The file could not be read or written.
    #[error("settings file I/O failed: {0}")]
    Io(#[from] io::Error),
    /// The file contents were not valid settings JSON.
    #[error("settings file is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Who may hover, and in what.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PermissionSettings {
    /// Light utility helicopters are hover-eligible.
    #[serde(rename = "Minicopter can hover")]
    pub minicopter_can_hover: bool,
    /// Scrap transport helicopters are hover-eligible.
    #[serde(rename = "Scraptranporthelicopter can hover")]
    pub scrap_can_hover: bool,
    /// Heavy transports are hover-eligible.
    #[serde(rename = "Chinook can hover")]
    pub chinook_can_hover: bool,
    /// Hover may be toggled while a second occupant is aboard.
    #[serde(rename = "Enable hover with two occupants")]
    pub hover_with_two_occupants: bool,
    /// Passengers, not only the pilot, may toggle hover.
    #[serde(rename = "Passenger can toggle hover")]
    pub passenger_toggle: bool,
}

impl Default for PermissionSettings {
    fn default() -> Self {
        Self {
            minicopter_can_hover: true,
            scrap_can_hover: true,
            chinook_can_hover: true,
            hover_with_two_occupants: true,
            passenger_toggle: true,
        }
    }
}

/// Behaviour of an active hover session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoveringSettings {
    /// Sessions end on their own after [`Self::hover_duration`].
    #[serde(rename = "Timed hover")]
    pub timed_hover: bool,
    /// Length of a timed session, in seconds.
    #[serde(rename = "Timed hover duration")]
    pub hover_duration: f32,
    /// Bill fuel while hovering.
    #[serde(rename = "Use fuel while hovering")]
    pub use_fuel: bool,
    /// Run the engine keepalive loop while hovering.
    #[serde(rename = "Keep engine on when hovering")]
    pub keep_engine_on: bool,
    /// Leave rotation free while altitude is held.
    #[serde(rename = "Enable helicopter rotation on hover")]
    pub allow_rotation: bool,
    /// Any occupant dismounting ends hover.
    #[serde(rename = "Disable hover on dismount")]
    pub disable_on_dismount: bool,
    /// Seat changes end hover, and passengers without a pilot stop the loop.
    #[serde(rename = "Disable hover on change seats")]
    pub disable_on_seat: bool,
    /// Swapping seats starts hover when it is off.
    #[serde(rename = "Hover on seat change")]
    pub hover_on_seat_switch: bool,
}

impl Default for HoveringSettings {
    fn default() -> Self {
        Self {
            timed_hover: false,
            hover_duration: DEFAULT_TIMED_HOVER_SECS,
            use_fuel: true,
            keep_engine_on: true,
            allow_rotation: true,
            disable_on_dismount: true,
            disable_on_seat: false,
            hover_on_seat_switch: true,
        }
    }
}

/// Complete hover configuration, installed as a Bevy resource.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoverSettings {
    /// Tell authorised players how to hover when they mount.
    #[serde(rename = "Broadcast message on mounted")]
    pub broadcast_on_mount: bool,
    /// Eligibility and toggle rules.
    #[serde(rename = "Permissions")]
    pub permissions: PermissionSettings,
    /// Session behaviour.
    #[serde(rename = "Hovering")]
    pub hovering: HoveringSettings,
}

impl Default for HoverSettings {
    fn default() -> Self {
        Self {
            broadcast_on_mount: true,
            permissions: PermissionSettings::default(),
            hovering: HoveringSettings::default(),
        }
    }
}

impl HoverSettings {
    /// Whether vehicles of `kind` receive a hover unit.
    #[must_use]
    pub const fn is_eligible(&self, kind: VehicleKind) -> bool {
        match kind {
            VehicleKind::Minicopter => self.permissions.minicopter_can_hover,
            VehicleKind::ScrapTransport => self.permissions.scrap_can_hover,
            VehicleKind::Chinook => self.permissions.chinook_can_hover,
        }
    }

    /// Whether starting hover also locks rotation.
    #[must_use]
    pub const fn freezes_rotation(&self) -> bool {
        !self.hovering.allow_rotation
    }

    /// Length of a timed session, or `None` when timed hover is off.
    ///
    /// Negative and NaN durations are treated as zero. Durations too long to
    /// represent saturate to [`Duration::MAX`].
    #[must_use]
    pub fn timed_hover_duration(&self) -> Option<Duration> {
        if !self.hovering.timed_hover {
            return None;
        }
        let secs = self.hovering.hover_duration;
        if secs.is_nan() || secs <= 0.0 {
            return Some(Duration::ZERO);
        }
        Some(Duration::try_from_secs_f32(secs).unwrap_or(Duration::MAX))
    }

    /// Parses settings from JSON text.
    ///
    /// # Errors
    /// Returns [`SettingsError::Json`] if `text` is not a settings object.
    pub fn from_json(text: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads settings from `path`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Writes settings to `path` as pretty-printed JSON.
    ///
    /// # Errors
    /// Returns an error if serialisation or the write fails.
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text)?;
        Ok(())
    }

    /// Reads settings from `path`, falling back to defaults on any failure.
    ///
    /// A readable file is written back so it lists every option; a missing
    /// file is created with defaults. A file that fails to parse is left
    /// untouched. Write failures are logged and otherwise ignored.
    #[must_use]
    pub fn load_or_default(path: &Path) -> Self {
        let settings = match Self::load(path) {
            Ok(settings) => settings,
            Err(SettingsError::Io(err)) if err.kind() == io::ErrorKind::NotFound => {
                debug!("no hover settings at {}; writing defaults", path.display());
                Self::default()
            }
            Err(err) => {
                warn!(
                    "error with hover settings at {}, using default values: {err}",
                    path.display()
                );
                return Self::default();
            }
        };
        if let Err(err) = settings.save(path) {
            warn!("could not write hover settings to {}: {err}", path.display());
        }
        settings
    }
}

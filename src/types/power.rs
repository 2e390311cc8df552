//! Relay power state.

use serde::{Deserialize, Serialize};

/// Power state as reported in the `POWER` field.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum PowerState {
    #[serde(rename = "ON", alias = "on")]
    #[strum(serialize = "ON")]
    On,
    #[serde(rename = "OFF", alias = "off")]
    #[strum(serialize = "OFF")]
    Off,
}

impl PowerState {
    pub fn is_on(self) -> bool {
        matches!(self, PowerState::On)
    }
}

impl From<bool> for PowerState {
    fn from(on: bool) -> Self {
        if on { PowerState::On } else { PowerState::Off }
    }
}

//! Overall brightness of a text-protocol light.

use serde::{Deserialize, Serialize};

/// Dimmer level from 0 to 100 percent.
#[derive(Default, Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(try_from = "u8", into = "u8")]
pub struct Dimmer {
    pub(crate) value: u8,
}

impl Dimmer {
    pub const MIN: u8 = 0;
    pub const MAX: u8 = 100;

    pub fn value(&self) -> u8 {
        self.value
    }

    /// Returns None if value is outside the valid range (0-100).
    ///
    /// # Examples
    ///
    /// ```
    /// use iot_control::Dimmer;
    ///
    /// assert!(Dimmer::create(0).is_some());
    /// assert!(Dimmer::create(100).is_some());
    /// assert!(Dimmer::create(101).is_none());
    /// ```
    pub fn create(value: u8) -> Option<Self> {
        if value <= Self::MAX {
            Some(Dimmer { value })
        } else {
            None
        }
    }

    /// Creates a dimmer level, clamping to the valid range.
    ///
    /// ```
    /// use iot_control::Dimmer;
    ///
    /// assert_eq!(Dimmer::clamped(150).value(), 100);
    /// assert_eq!(Dimmer::clamped(-5).value(), 0);
    /// ```
    pub fn clamped(value: i64) -> Self {
        let value = crate::color::clamp(value, i64::from(Self::MIN), i64::from(Self::MAX));
        Dimmer { value: value as u8 }
    }
}

impl TryFrom<u8> for Dimmer {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Dimmer::create(value).ok_or_else(|| format!("dimmer {value} is outside 0-100"))
    }
}

impl From<Dimmer> for u8 {
    fn from(dimmer: Dimmer) -> Self {
        dimmer.value
    }
}

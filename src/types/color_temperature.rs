//! Color temperature of the white channels.

use serde::{Deserialize, Serialize};

/// Color temperature in mireds, with valid values from 153 to 500.
///
/// Lower values are cooler (bluer), higher values warmer:
/// - 153: cool daylight (~6500K)
/// - 250: neutral white (~4000K)
/// - 500: candlelight (~2000K)
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(try_from = "u16", into = "u16")]
pub struct ColorTemperature {
    pub(crate) mireds: u16,
}

impl ColorTemperature {
    pub const MIN: u16 = 153;
    pub const MAX: u16 = 500;

    pub fn mireds(&self) -> u16 {
        self.mireds
    }

    /// Approximate temperature in Kelvin.
    pub fn kelvin(&self) -> u32 {
        1_000_000 / u32::from(self.mireds)
    }

    /// Returns `None` if value is outside the valid range (153-500).
    ///
    /// # Examples
    ///
    /// ```
    /// use iot_control::ColorTemperature;
    ///
    /// assert!(ColorTemperature::create(152).is_none());
    /// assert!(ColorTemperature::create(153).is_some());
    /// assert!(ColorTemperature::create(500).is_some());
    /// assert!(ColorTemperature::create(501).is_none());
    /// ```
    pub fn create(mireds: u16) -> Option<Self> {
        if (Self::MIN..=Self::MAX).contains(&mireds) {
            Some(ColorTemperature { mireds })
        } else {
            None
        }
    }

    /// Creates a color temperature, clamping to the valid range.
    pub fn clamped(mireds: i64) -> Self {
        let mireds = crate::color::clamp(mireds, i64::from(Self::MIN), i64::from(Self::MAX));
        ColorTemperature {
            mireds: mireds as u16,
        }
    }
}

impl Default for ColorTemperature {
    fn default() -> Self {
        ColorTemperature { mireds: Self::MIN }
    }
}

impl TryFrom<u16> for ColorTemperature {
    type Error = String;

    fn try_from(mireds: u16) -> Result<Self, Self::Error> {
        ColorTemperature::create(mireds)
            .ok_or_else(|| format!("color temperature {mireds} is outside 153-500 mireds"))
    }
}

impl From<ColorTemperature> for u16 {
    fn from(ct: ColorTemperature) -> Self {
        ct.mireds
    }
}

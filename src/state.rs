//! Cached state of a text-protocol light.

use serde::Deserialize;
use serde_with::{DisplayFromStr, serde_as};
use strum_macros::Display;

use crate::types::{ColorTemperature, Dimmer, HsbColor, PowerState, mixes_rgb_and_white};

/// Which group of LEDs a light is currently driving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Mode {
    /// White channels, controlled through color temperature.
    #[strum(serialize = "white")]
    WhiteCt,
    /// RGB channels, controlled through an HSB color.
    #[strum(serialize = "rgb")]
    Rgb,
}

/// Last state a device accepted, exactly as it reported it.
///
/// A state is replaced wholesale by every successful response; fields absent
/// from that response are `None`.
///
/// # Examples
///
/// ```
/// use iot_control::{DeviceState, Mode};
///
/// let state: DeviceState =
///     serde_json::from_str(r#"{"HSBColor":"0,0,0","Dimmer":50,"CT":300}"#).unwrap();
/// assert_eq!(state.mode(), Mode::WhiteCt);
/// assert_eq!(state.dimmer().unwrap().value(), 50);
/// assert!(state.power().is_none());
/// ```
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DeviceState {
    #[serde(rename = "POWER", alias = "POWER1")]
    power: Option<PowerState>,
    #[serde(rename = "Dimmer")]
    dimmer: Option<Dimmer>,
    #[serde(rename = "CT")]
    color_temperature: Option<ColorTemperature>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(rename = "HSBColor")]
    hsb_color: Option<HsbColor>,
    #[serde(rename = "White")]
    white: Option<u8>,
    #[serde(rename = "Channel")]
    channels: Option<[u8; 5]>,
}

impl DeviceState {
    pub fn power(&self) -> Option<PowerState> {
        self.power
    }

    pub fn dimmer(&self) -> Option<Dimmer> {
        self.dimmer
    }

    pub fn color_temperature(&self) -> Option<ColorTemperature> {
        self.color_temperature
    }

    pub fn hsb_color(&self) -> Option<HsbColor> {
        self.hsb_color
    }

    pub fn white(&self) -> Option<u8> {
        self.white
    }

    /// Channel levels `[R, G, B, ColdWhite, WarmCT]`.
    pub fn channels(&self) -> Option<[u8; 5]> {
        self.channels
    }

    /// `WhiteCt` when the HSB color is the unset sentinel (or missing), `Rgb`
    /// otherwise.
    pub fn mode(&self) -> Mode {
        match self.hsb_color {
            Some(hsb) if !hsb.is_unset() => Mode::Rgb,
            _ => Mode::WhiteCt,
        }
    }

    /// True when the device reports RGB and white channels lit together.
    pub fn mixes_rgb_and_white(&self) -> bool {
        self.channels.as_ref().is_some_and(mixes_rgb_and_white)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_factory_state() {
        let state: DeviceState = serde_json::from_str(
            r#"{"POWER":"ON","Dimmer":100,"Color":"000000FF00","HSBColor":"0,0,0","White":100,"CT":153,"Channel":[0,0,0,100,0]}"#,
        )
        .unwrap();
        assert_eq!(state.power(), Some(PowerState::On));
        assert_eq!(state.color_temperature().unwrap().mireds(), 153);
        assert_eq!(state.white(), Some(100));
        assert_eq!(state.channels(), Some([0, 0, 0, 100, 0]));
        assert_eq!(state.mode(), Mode::WhiteCt);
        assert!(!state.mixes_rgb_and_white());
    }

    #[test]
    fn test_rgb_mode() {
        let state: DeviceState =
            serde_json::from_str(r#"{"HSBColor":"30,100,100","Channel":[100,50,0,0,0]}"#).unwrap();
        assert_eq!(state.mode(), Mode::Rgb);
        assert_eq!(state.hsb_color().unwrap().to_tuple(), (30, 100, 100));
    }

    #[test]
    fn test_power_alias() {
        let state: DeviceState = serde_json::from_str(r#"{"POWER1":"OFF"}"#).unwrap();
        assert_eq!(state.power(), Some(PowerState::Off));
    }

    #[test]
    fn test_mixed_channels_detected() {
        let state: DeviceState = serde_json::from_str(r#"{"Channel":[10,0,0,10,0]}"#).unwrap();
        assert!(state.mixes_rgb_and_white());
    }

    #[test]
    fn test_rejects_malformed_fields() {
        assert!(serde_json::from_str::<DeviceState>(r#"{"HSBColor":"red"}"#).is_err());
        assert!(serde_json::from_str::<DeviceState>(r#"{"Dimmer":"high"}"#).is_err());
        assert!(serde_json::from_str::<DeviceState>(r#"[1,2,3]"#).is_err());
    }

    #[test]
    fn test_rejects_out_of_range_levels() {
        assert!(serde_json::from_str::<DeviceState>(r#"{"Dimmer":250,"CT":900}"#).is_err());
        assert!(serde_json::from_str::<DeviceState>(r#"{"Dimmer":250}"#).is_err());
        assert!(serde_json::from_str::<DeviceState>(r#"{"CT":900}"#).is_err());
    }
}

//! Mapping between coarse panel sliders and device-native ranges.

use std::ops::RangeInclusive;

use crate::types::{ColorTemperature, Dimmer};

/// Dimmer slider: `slider * multiplier` gives the device level.
///
/// The multiplier divides 100 evenly, so every slider position maps to a
/// distinct level and back.
///
/// ```
/// use iot_control::DimmerScale;
///
/// let scale = DimmerScale::default();
/// assert_eq!(scale.slider_range(), 0..=10);
/// assert_eq!(scale.to_device(7).value(), 70);
/// assert_eq!(scale.to_slider(scale.to_device(7)), 7);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimmerScale {
    multiplier: u8,
}

impl Default for DimmerScale {
    fn default() -> Self {
        DimmerScale { multiplier: 10 }
    }
}

impl DimmerScale {
    /// Returns `None` unless `multiplier` is a positive divisor of 100.
    pub fn new(multiplier: u8) -> Option<Self> {
        if multiplier > 0 && Dimmer::MAX % multiplier == 0 {
            Some(DimmerScale { multiplier })
        } else {
            None
        }
    }

    pub fn multiplier(&self) -> u8 {
        self.multiplier
    }

    pub fn slider_max(&self) -> u8 {
        Dimmer::MAX / self.multiplier
    }

    pub fn slider_range(&self) -> RangeInclusive<u8> {
        0..=self.slider_max()
    }

    pub fn to_device(&self, slider: u8) -> Dimmer {
        Dimmer::clamped(i64::from(slider) * i64::from(self.multiplier))
    }

    pub fn to_slider(&self, dimmer: Dimmer) -> u8 {
        dimmer.value() / self.multiplier
    }
}

/// Color temperature slider over the 153-500 mired range.
///
/// The slider spans `round(153 / m) - margin ..= round(500 / m) + margin` so
/// that both ends of the device range stay reachable after rounding; device
/// values are clamped back into 153-500.
///
/// ```
/// use iot_control::CtScale;
///
/// let scale = CtScale::default();
/// assert_eq!(scale.slider_range(), 3..=15);
/// assert_eq!(scale.to_device(3).mireds(), 153);
/// assert_eq!(scale.to_device(15).mireds(), 500);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CtScale {
    multiplier: u16,
    margin: u16,
}

impl Default for CtScale {
    fn default() -> Self {
        CtScale {
            multiplier: 35,
            margin: 1,
        }
    }
}

impl CtScale {
    /// Returns `None` when the slider could not reach both ends of the range.
    pub fn new(multiplier: u16, margin: u16) -> Option<Self> {
        if multiplier == 0 {
            return None;
        }
        let scale = CtScale { multiplier, margin };
        let min_reachable =
            u32::from(scale.slider_min()) * u32::from(multiplier) <= u32::from(ColorTemperature::MIN);
        let max_reachable =
            u32::from(scale.slider_max()) * u32::from(multiplier) >= u32::from(ColorTemperature::MAX);
        (scale.slider_min() < scale.slider_max() && min_reachable && max_reachable).then_some(scale)
    }

    pub fn multiplier(&self) -> u16 {
        self.multiplier
    }

    pub fn slider_min(&self) -> u16 {
        self.rounded_position(ColorTemperature::MIN)
            .saturating_sub(self.margin)
    }

    pub fn slider_max(&self) -> u16 {
        self.rounded_position(ColorTemperature::MAX)
            .saturating_add(self.margin)
    }

    pub fn slider_range(&self) -> RangeInclusive<u16> {
        self.slider_min()..=self.slider_max()
    }

    pub fn to_device(&self, slider: u16) -> ColorTemperature {
        ColorTemperature::clamped(i64::from(slider) * i64::from(self.multiplier))
    }

    pub fn to_slider(&self, ct: ColorTemperature) -> u16 {
        crate::color::clamp(
            ct.mireds() / self.multiplier,
            self.slider_min(),
            self.slider_max(),
        )
    }

    fn rounded_position(&self, mireds: u16) -> u16 {
        (f64::from(mireds) / f64::from(self.multiplier)).round_ties_even() as u16
    }
}

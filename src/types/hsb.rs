//! Hue, saturation and brightness triple used by the `HSBColor` command.

use std::fmt;
use std::str::FromStr;

use super::Rgb;
use crate::color;

/// HSB (aka HSV) color with hue 0-359 and saturation/brightness 0-100.
///
/// The triple `0,0,0` is the sentinel a light reports while it is driving its
/// white channels, see [`HsbColor::is_unset`].
///
/// # Examples
///
/// ```
/// use iot_control::HsbColor;
///
/// let hsb: HsbColor = "245,97,97".parse().unwrap();
/// assert_eq!(hsb.hue(), 245);
/// assert_eq!(hsb.to_string(), "245,97,97");
///
/// assert!("400,10,10".parse::<HsbColor>().is_err());
/// assert!("10, 10,10".parse::<HsbColor>().is_err());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct HsbColor {
    hue: u16,
    saturation: u8,
    brightness: u8,
}

impl HsbColor {
    pub const MAX_HUE: u16 = 359;
    pub const MAX_SATURATION: u8 = 100;
    pub const MAX_BRIGHTNESS: u8 = 100;

    /// The "no color" sentinel.
    pub const UNSET: HsbColor = HsbColor {
        hue: 0,
        saturation: 0,
        brightness: 0,
    };

    /// Returns `None` if any component is outside its valid range.
    pub fn create(hue: u16, saturation: u8, brightness: u8) -> Option<Self> {
        if hue <= Self::MAX_HUE
            && saturation <= Self::MAX_SATURATION
            && brightness <= Self::MAX_BRIGHTNESS
        {
            Some(HsbColor {
                hue,
                saturation,
                brightness,
            })
        } else {
            None
        }
    }

    pub fn hue(&self) -> u16 {
        self.hue
    }

    pub fn saturation(&self) -> u8 {
        self.saturation
    }

    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    pub fn is_unset(&self) -> bool {
        *self == Self::UNSET
    }

    pub fn to_tuple(&self) -> (u16, u8, u8) {
        (self.hue, self.saturation, self.brightness)
    }

    /// Convert to RGB.
    ///
    /// ```
    /// use iot_control::HsbColor;
    ///
    /// let red = HsbColor::create(0, 100, 100).unwrap();
    /// assert_eq!(red.to_rgb().to_hex(), "#ff0000");
    /// ```
    pub fn to_rgb(&self) -> Rgb {
        let (r, g, b) = color::hsv_to_rgb(
            f64::from(self.hue) / f64::from(Self::MAX_HUE),
            f64::from(self.saturation) / 100.0,
            f64::from(self.brightness) / 100.0,
        );
        Rgb::rgb(
            color::unit_to_scale(r, 255) as u8,
            color::unit_to_scale(g, 255) as u8,
            color::unit_to_scale(b, 255) as u8,
        )
    }
}

impl From<&Rgb> for HsbColor {
    fn from(rgb: &Rgb) -> Self {
        let (h, s, v) = color::rgb_to_hsv(
            f64::from(rgb.red()) / 255.0,
            f64::from(rgb.green()) / 255.0,
            f64::from(rgb.blue()) / 255.0,
        );
        HsbColor {
            hue: color::unit_to_scale(h, Self::MAX_HUE) as u16,
            saturation: color::unit_to_scale(s, 100) as u8,
            brightness: color::unit_to_scale(v, 100) as u8,
        }
    }
}

impl fmt::Display for HsbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.hue, self.saturation, self.brightness)
    }
}

impl FromStr for HsbColor {
    type Err = String;

    /// Parse from a strict `h,s,v` string: decimal integers without signs,
    /// padding or leading zeros.
    fn from_str(s: &str) -> Result<Self, String> {
        let parts: Vec<&str> = s.split(',').collect();
        let [hue, saturation, brightness] = parts.as_slice() else {
            return Err(format!("expected format h,s,v, got {s:?}"));
        };

        let hue = parse_component(hue).filter(|h| *h <= u32::from(Self::MAX_HUE));
        let saturation = parse_component(saturation).filter(|v| *v <= 100);
        let brightness = parse_component(brightness).filter(|v| *v <= 100);

        match (hue, saturation, brightness) {
            (Some(h), Some(s), Some(b)) => Ok(HsbColor {
                hue: h as u16,
                saturation: s as u8,
                brightness: b as u8,
            }),
            _ => Err(format!("hsb components out of range: {s:?}")),
        }
    }
}

fn parse_component(token: &str) -> Option<u32> {
    let canonical = !token.is_empty()
        && token.len() <= 3
        && token.bytes().all(|b| b.is_ascii_digit())
        && (token == "0" || !token.starts_with('0'));
    if canonical { token.parse().ok() } else { None }
}

//! 24-bit RGB colors as used by the color picker and the Yeelight bulb.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::Error;

/// An RGB color with red, green, and blue components (0-255 each).
#[derive(Default, Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub(crate) red: u8,
    pub(crate) green: u8,
    pub(crate) blue: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb::rgb(255, 255, 255);

    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    pub fn red(&self) -> u8 {
        self.red
    }

    pub fn green(&self) -> u8 {
        self.green
    }

    pub fn blue(&self) -> u8 {
        self.blue
    }

    /// Decompose a packed `0xRRGGBB` integer; bits above 23 are ignored.
    ///
    /// ```
    /// use iot_control::Rgb;
    ///
    /// assert_eq!(Rgb::from_packed(0x1A2B3C), Rgb::rgb(0x1a, 0x2b, 0x3c));
    /// ```
    pub fn from_packed(rgb: u32) -> Self {
        Self::rgb(
            ((rgb >> 16) & 0xff) as u8,
            ((rgb >> 8) & 0xff) as u8,
            (rgb & 0xff) as u8,
        )
    }

    pub fn packed(&self) -> u32 {
        (u32::from(self.red) << 16) | (u32::from(self.green) << 8) | u32::from(self.blue)
    }

    /// Lowercase `#rrggbb`.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = Error;

    /// Parse `#rrggbb`, `rrggbb`, `#rgb` or `rgb` (hex digits, any case).
    ///
    /// ```
    /// use iot_control::Rgb;
    ///
    /// assert_eq!("#FF8000".parse::<Rgb>().unwrap(), Rgb::rgb(255, 128, 0));
    /// assert_eq!("f80".parse::<Rgb>().unwrap(), Rgb::rgb(0xff, 0x88, 0x00));
    /// assert!("zzzzzz".parse::<Rgb>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Error> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(Error::InvalidColorString(s.to_string()));
        }

        let expanded = match digits.len() {
            6 => digits.to_string(),
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            _ => return Err(Error::InvalidColorString(s.to_string())),
        };

        u32::from_str_radix(&expanded, 16)
            .map(Self::from_packed)
            .map_err(|_| Error::InvalidColorString(s.to_string()))
    }
}

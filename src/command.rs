//! Command vocabulary of the text-protocol device family.

use std::fmt;

use crate::types::{ChannelVector, ColorTemperature, Dimmer, HsbColor};

/// One command, rendered to its wire text with [`fmt::Display`].
///
/// # Examples
///
/// ```
/// use iot_control::{ChannelVector, Command, Dimmer, HsbColor};
///
/// assert_eq!(Command::QueryState.to_string(), "STATE");
/// assert_eq!(Command::Dimmer(Dimmer::create(40).unwrap()).to_string(), "Dimmer 40");
/// assert_eq!(Command::Channels(ChannelVector::OFF).to_string(), "Color 0000000000");
/// assert_eq!(
///     Command::HsbColor(HsbColor::create(30, 100, 100).unwrap()).to_string(),
///     "HSBColor 30,100,100"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Query the full light state.
    QueryState,
    Dimmer(Dimmer),
    ColorTemperature(ColorTemperature),
    /// Set all five channels at once.
    Channels(ChannelVector),
    HsbColor(HsbColor),
    PowerToggle,
}

impl Command {
    /// The command that zeroes every channel.
    pub const CHANNEL_RESET: Command = Command::Channels(ChannelVector::OFF);
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::QueryState => f.write_str("STATE"),
            Command::Dimmer(dimmer) => write!(f, "Dimmer {}", dimmer.value()),
            Command::ColorTemperature(ct) => write!(f, "CT {}", ct.mireds()),
            Command::Channels(channels) => write!(f, "Color {}", channels.wire()),
            Command::HsbColor(hsb) => write!(f, "HSBColor {hsb}"),
            Command::PowerToggle => f.write_str("Power Toggle"),
        }
    }
}

//! Value types for device control parameters.

mod channels;
mod color_temperature;
mod dimmer;
mod hsb;
mod power;
mod rgb;

pub use channels::{ChannelVector, mixes_rgb_and_white};
pub use color_temperature::ColorTemperature;
pub use dimmer::Dimmer;
pub use hsb::HsbColor;
pub use power::PowerState;
pub use rgb::Rgb;

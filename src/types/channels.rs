//! The five PWM channels of an RGBCCT light.

/// Channel levels `[R, G, B, ColdWhite, WarmCT]`, each 0-100 percent.
///
/// Driving the RGB group and the white group at the same time damages RGBCCT
/// hardware, so a vector with both groups non-zero cannot be constructed.
///
/// # Examples
///
/// ```
/// use iot_control::ChannelVector;
///
/// assert!(ChannelVector::create(100, 0, 0, 0, 0).is_some());
/// assert!(ChannelVector::create(0, 0, 0, 50, 50).is_some());
/// assert!(ChannelVector::create(10, 0, 0, 50, 0).is_none());
/// assert_eq!(ChannelVector::OFF.wire(), "0000000000");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChannelVector {
    channels: [u8; 5],
}

impl ChannelVector {
    const MAX: u8 = 100;

    /// All channels at zero.
    pub const OFF: ChannelVector = ChannelVector { channels: [0; 5] };

    pub fn create(red: u8, green: u8, blue: u8, cold: u8, warm: u8) -> Option<Self> {
        Self::from_channels([red, green, blue, cold, warm])
    }

    pub fn from_channels(channels: [u8; 5]) -> Option<Self> {
        if channels.iter().any(|c| *c > Self::MAX) || mixes_rgb_and_white(&channels) {
            None
        } else {
            Some(ChannelVector { channels })
        }
    }

    pub fn channels(&self) -> [u8; 5] {
        self.channels
    }

    pub fn is_off(&self) -> bool {
        self.channels == [0; 5]
    }

    /// Fixed-width wire form: two uppercase hex digits per channel, each
    /// percentage scaled to 0-255.
    pub fn wire(&self) -> String {
        self.channels
            .iter()
            .map(|c| format!("{:02X}", crate::color::unit_to_scale(f64::from(*c) / 100.0, 255)))
            .collect()
    }
}

/// True when both the RGB group and the white group carry a non-zero level.
pub fn mixes_rgb_and_white(channels: &[u8; 5]) -> bool {
    let rgb = channels[..3].iter().any(|c| *c > 0);
    let white = channels[3..].iter().any(|c| *c > 0);
    rgb && white
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_scaling() {
        let half_cold = ChannelVector::create(0, 0, 0, 50, 0).unwrap();
        assert_eq!(half_cold.wire(), "0000008000");

        let red = ChannelVector::create(100, 0, 0, 0, 0).unwrap();
        assert_eq!(red.wire(), "FF00000000");
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert!(ChannelVector::from_channels([101, 0, 0, 0, 0]).is_none());
    }

    #[test]
    fn test_mixed_detection() {
        assert!(mixes_rgb_and_white(&[0, 1, 0, 0, 1]));
        assert!(!mixes_rgb_and_white(&[0, 0, 0, 100, 0]));
        assert!(!mixes_rgb_and_white(&[5, 5, 5, 0, 0]));
    }
}

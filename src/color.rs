//! Conversions between the HSB triples spoken by Tasmota lights and the hex
//! RGB strings used by the color picker and Yeelight bulbs.
//!
//! The string entry points never fail: input that does not validate yields a
//! fixed fallback (`#000000` or `(0, 0, 0)`) so that nothing ill-formed can be
//! forwarded into a device command. Use [`HsbColor`] and [`Rgb`] directly when
//! invalid input has to be told apart from black.

use crate::types::{HsbColor, Rgb};

/// Returned by [`hsv_to_rgb_hex`] for input that does not validate.
pub const FALLBACK_HEX: &str = "#000000";

/// Constrain a value between a minimum and a maximum.
///
/// ```
/// use iot_control::color::clamp;
///
/// assert_eq!(clamp(150, 0, 100), 100);
/// assert_eq!(clamp(-5, 0, 100), 0);
/// assert_eq!(clamp(50, 0, 100), 50);
/// ```
pub fn clamp<T: PartialOrd>(value: T, min: T, max: T) -> T {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Convert a Tasmota `h,s,v` string (e.g. `245,97,97`) to `#rrggbb`.
///
/// Surrounding whitespace is ignored; anything else that is not three
/// in-range integers gives [`FALLBACK_HEX`].
///
/// ```
/// use iot_control::color::hsv_to_rgb_hex;
///
/// assert_eq!(hsv_to_rgb_hex("245,97,97"), "#1e07f7");
/// assert_eq!(hsv_to_rgb_hex("400,10,10"), "#000000");
/// ```
pub fn hsv_to_rgb_hex(hsb: &str) -> String {
    match hsb.trim().parse::<HsbColor>() {
        Ok(hsb) => hsb.to_rgb().to_hex(),
        Err(_) => FALLBACK_HEX.to_string(),
    }
}

/// Convert `#rrggbb`, `rrggbb`, `#rgb` or `rgb` to an `(h, s, v)` triple.
///
/// Invalid input gives `(0, 0, 0)`.
///
/// ```
/// use iot_control::color::rgb_hex_to_hsv;
///
/// assert_eq!(rgb_hex_to_hsv("#1e07f7"), (245, 97, 97));
/// assert_eq!(rgb_hex_to_hsv("zzzzzz"), (0, 0, 0));
/// ```
pub fn rgb_hex_to_hsv(hex: &str) -> (u16, u8, u8) {
    match hex.trim().parse::<Rgb>() {
        Ok(rgb) => HsbColor::from(&rgb).to_tuple(),
        Err(_) => HsbColor::UNSET.to_tuple(),
    }
}

/// Split a packed `0xRRGGBB` integer into `(r, g, b)`.
pub fn rgb_int_to_tuple(rgb: u32) -> (u8, u8, u8) {
    let rgb = Rgb::from_packed(rgb);
    (rgb.red(), rgb.green(), rgb.blue())
}

/// Format a packed `0xRRGGBB` integer as `#rrggbb`.
///
/// ```
/// use iot_control::color::rgb_int_to_hex;
///
/// assert_eq!(rgb_int_to_hex(0x1A2B3C), "#1a2b3c");
/// ```
pub fn rgb_int_to_hex(rgb: u32) -> String {
    Rgb::from_packed(rgb).to_hex()
}

/// Scale a `[0, 1]` value to `[0, max]`, rounding half to even.
pub(crate) fn unit_to_scale(unit: f64, max: u16) -> u16 {
    let scaled = (unit * f64::from(max)).round_ties_even();
    clamp(scaled, 0.0, f64::from(max)) as u16
}

/// HSV to RGB with every component in `[0, 1]`.
pub(crate) fn hsv_to_rgb(h: f64, s: f64, v: f64) -> (f64, f64, f64) {
    if s == 0.0 {
        return (v, v, v);
    }

    let sector = (h * 6.0).floor();
    let f = h * 6.0 - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    match (sector as i64).rem_euclid(6) {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    }
}

/// RGB to HSV with every component in `[0, 1]`.
pub(crate) fn rgb_to_hsv(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let v = max;
    if max == min {
        return (0.0, 0.0, v);
    }

    let range = max - min;
    let s = range / max;
    let rc = (max - r) / range;
    let gc = (max - g) / range;
    let bc = (max - b) / range;

    let h = if r == max {
        bc - gc
    } else if g == max {
        2.0 + rc - bc
    } else {
        4.0 + gc - rc
    };

    ((h / 6.0).rem_euclid(1.0), s, v)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hue_distance(a: u16, b: u16) -> u16 {
        // 0 and 359 both encode red.
        let d = a.abs_diff(b);
        d.min(HsbColor::MAX_HUE - d)
    }

    #[test]
    fn test_round_trip_within_one() {
        // Below 40% saturation or value the 8-bit RGB grid is coarser than
        // one HSB step.
        for h in 0..=359u16 {
            for s in 40..=100u8 {
                for v in 40..=100u8 {
                    let hex = hsv_to_rgb_hex(&format!("{h},{s},{v}"));
                    let (h2, s2, v2) = rgb_hex_to_hsv(&hex);
                    assert!(
                        hue_distance(h, h2) <= 1 && s.abs_diff(s2) <= 1 && v.abs_diff(v2) <= 1,
                        "({h},{s},{v}) -> {hex} -> ({h2},{s2},{v2})"
                    );
                }
            }
        }
    }

    #[test]
    fn test_invalid_hsb_falls_back_to_black() {
        assert_eq!(hsv_to_rgb_hex("400,10,10"), "#000000");
        assert_eq!(hsv_to_rgb_hex("10,10"), "#000000");
        assert_eq!(hsv_to_rgb_hex("a,b,c"), "#000000");
        assert_eq!(hsv_to_rgb_hex("10 ,10,10"), "#000000");
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        assert_eq!(hsv_to_rgb_hex("  0,100,100\n"), "#ff0000");
        assert_eq!(rgb_hex_to_hsv(" #00ff00 "), (120, 100, 100));
    }

    #[test]
    fn test_invalid_hex_falls_back_to_unset() {
        assert_eq!(rgb_hex_to_hsv("zzzzzz"), (0, 0, 0));
        assert_eq!(rgb_hex_to_hsv("#12345"), (0, 0, 0));
        assert_eq!(rgb_hex_to_hsv("##123456"), (0, 0, 0));
    }

    #[test]
    fn test_short_hex() {
        assert_eq!(rgb_hex_to_hsv("#fff"), (0, 0, 100));
        assert_eq!(rgb_hex_to_hsv("f00"), (0, 100, 100));
    }

    #[test]
    fn test_orange() {
        assert_eq!(rgb_hex_to_hsv("#ff8000"), (30, 100, 100));
        assert_eq!(hsv_to_rgb_hex("30,100,100"), "#ff8000");
    }

    #[test]
    fn test_top_hue_is_red() {
        assert_eq!(hsv_to_rgb_hex("359,100,100"), "#ff0000");
    }

    #[test]
    fn test_packed_rgb() {
        assert_eq!(rgb_int_to_hex(0x1A2B3C), "#1a2b3c");
        assert_eq!(rgb_int_to_tuple(0x1A2B3C), (0x1a, 0x2b, 0x3c));
        assert_eq!(rgb_int_to_hex(0xFF_1A2B3C), "#1a2b3c");
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(150, 0, 100), 100);
        assert_eq!(clamp(-5, 0, 100), 0);
        assert_eq!(clamp(50, 0, 100), 50);
        assert_eq!(clamp(2.5, 0.0, 1.0), 1.0);
    }
}

use std::fmt;
use std::str::FromStr;

use serde_with::{DeserializeFromStr, SerializeDisplay};

use super::CodecError;

/// RGB colour value.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, SerializeDisplay, DeserializeFromStr)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Warm white as the stock controller app defines it.
    pub const WARM_WHITE: Self = Self::new(0xff, 0x67, 0x17);

    /// Creates an RGB colour.
    ///
    /// ```
    /// use sp108e::Rgb;
    ///
    /// let colour = Rgb::new(255, 127, 0);
    /// assert_eq!("ff7f00", colour.to_string());
    /// ```
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Returns the three channel bytes in wire order.
    #[must_use]
    pub fn to_bytes(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Converts to HSV, rounding each component to the nearest integer.
    ///
    /// ```
    /// use sp108e::{Hsv, Rgb};
    ///
    /// assert_eq!(Hsv::new(21, 91, 100), Rgb::WARM_WHITE.to_hsv());
    /// ```
    #[must_use]
    pub fn to_hsv(self) -> Hsv {
        let r = f64::from(self.r) / 255.0;
        let g = f64::from(self.g) / 255.0;
        let b = f64::from(self.b) / 255.0;
        let max = r.max(g).max(b);
        let delta = max - r.min(g).min(b);

        let (hue, saturation) = if delta == 0.0 {
            (0.0, 0.0)
        } else {
            let offset = |channel: f64| (max - channel) / 6.0 / delta + 0.5;
            let mut hue = if r == max {
                offset(b) - offset(g)
            } else if g == max {
                1.0 / 3.0 + offset(r) - offset(b)
            } else {
                2.0 / 3.0 + offset(g) - offset(r)
            };
            if hue < 0.0 {
                hue += 1.0;
            } else if hue > 1.0 {
                hue -= 1.0;
            }
            (hue, delta / max)
        };

        Hsv {
            hue: round_to::<u16>(hue * 360.0),
            saturation: round_to::<u8>(saturation * 100.0),
            value: round_to::<u8>(max * 100.0),
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.to_bytes()))
    }
}

impl FromStr for Rgb {
    type Err = CodecError;

    /// Parses six hex digits, with or without a leading `#`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let digits = value.strip_prefix('#').unwrap_or(value);
        let mut bytes = [0u8; 3];
        hex::decode_to_slice(digits, &mut bytes).map_err(|_| CodecError::InvalidColour {
            value: value.to_string(),
        })?;
        let [r, g, b] = bytes;
        Ok(Self::new(r, g, b))
    }
}

/// Hue/saturation/value triple with hue in `0..=360` and the rest in `0..=100`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, serde::Serialize)]
pub struct Hsv {
    pub hue: u16,
    pub saturation: u8,
    pub value: u8,
}

impl Hsv {
    /// Largest accepted hue, in degrees.
    pub const MAX_HUE: u16 = 360;
    /// Largest accepted saturation or value, in percent.
    pub const MAX_PERCENT: u8 = 100;

    /// Creates an HSV triple.
    #[must_use]
    pub const fn new(hue: u16, saturation: u8, value: u8) -> Self {
        Self {
            hue,
            saturation,
            value,
        }
    }

    /// Converts to RGB, rounding each channel to the nearest integer.
    ///
    /// Out-of-range components are clamped first.
    ///
    /// ```
    /// use sp108e::{Hsv, Rgb};
    ///
    /// assert_eq!(Rgb::new(0, 255, 0), Hsv::new(120, 100, 100).to_rgb());
    /// ```
    #[must_use]
    pub fn to_rgb(self) -> Rgb {
        let sector = f64::from(self.hue.min(Self::MAX_HUE)) / 60.0;
        let saturation = f64::from(self.saturation.min(Self::MAX_PERCENT)) / 100.0;
        let value = f64::from(self.value.min(Self::MAX_PERCENT)) / 100.0;

        let fraction = sector - sector.floor();
        let p = 255.0 * value * (1.0 - saturation);
        let q = 255.0 * value * (1.0 - saturation * fraction);
        let t = 255.0 * value * (1.0 - saturation * (1.0 - fraction));
        let v = 255.0 * value;

        // sector is in 0.0..=6.0, so the truncation is exact.
        let (r, g, b) = match (sector.floor() as u8) % 6 {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        };

        Rgb::new(round_to(r), round_to(g), round_to(b))
    }
}

fn round_to<T>(value: f64) -> T
where
    T: TryFrom<u16> + Default,
{
    // Inputs are bounded to 0.0..=360.0 by construction.
    let rounded = value.round().clamp(0.0, f64::from(u16::MAX)) as u16;
    T::try_from(rounded).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(Rgb::new(0xff, 0x00, 0x00), Hsv::new(0, 100, 100))]
    #[case(Rgb::new(0x00, 0xff, 0x00), Hsv::new(120, 100, 100))]
    #[case(Rgb::new(0x00, 0x00, 0xff), Hsv::new(240, 100, 100))]
    #[case(Rgb::new(0x80, 0x80, 0x80), Hsv::new(0, 0, 50))]
    #[case(Rgb::new(0x00, 0x00, 0x00), Hsv::new(0, 0, 0))]
    #[case(Rgb::WARM_WHITE, Hsv::new(21, 91, 100))]
    fn rgb_to_hsv_matches_reference_values(#[case] rgb: Rgb, #[case] expected: Hsv) {
        assert_eq!(expected, rgb.to_hsv());
    }

    #[test]
    fn warm_white_survives_round_trip_within_rounding() {
        let back = Rgb::WARM_WHITE.to_hsv().to_rgb();
        for (original, converted) in Rgb::WARM_WHITE.to_bytes().into_iter().zip(back.to_bytes()) {
            assert!(
                original.abs_diff(converted) <= 2,
                "{} drifted to {back}",
                Rgb::WARM_WHITE
            );
        }
    }

    #[rstest]
    #[case(Hsv::new(360, 100, 100), Rgb::new(255, 0, 0))]
    #[case(Hsv::new(60, 100, 100), Rgb::new(255, 255, 0))]
    #[case(Hsv::new(300, 50, 100), Rgb::new(255, 128, 255))]
    #[case(Hsv::new(0, 0, 100), Rgb::new(255, 255, 255))]
    fn hsv_to_rgb_covers_each_sector(#[case] hsv: Hsv, #[case] expected: Rgb) {
        assert_eq!(expected, hsv.to_rgb());
    }

    #[rstest]
    #[case("ff6717", Rgb::WARM_WHITE)]
    #[case("#FF6717", Rgb::WARM_WHITE)]
    #[case("000000", Rgb::new(0, 0, 0))]
    fn rgb_parses_hex(#[case] input: &str, #[case] expected: Rgb) {
        assert_eq!(expected, input.parse::<Rgb>().expect("hex colour should parse"));
    }

    #[rstest]
    #[case("ff671")]
    #[case("ff67170")]
    #[case("gg0000")]
    fn rgb_rejects_malformed_hex(#[case] input: &str) {
        assert_matches!(
            input.parse::<Rgb>(),
            Err(CodecError::InvalidColour { value }) if value == input
        );
    }
}

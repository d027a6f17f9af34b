//! Static lookup tables the device addresses by position.
//!
//! Chip types and colour orders travel on the wire as their index in the
//! canonical list, so variant order here is part of the protocol.

use serde_with::{DeserializeFromStr, SerializeDisplay};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString, FromRepr};

use super::CodecError;

/// LED driver IC attached to the controller.
#[derive(
    Debug,
    Clone,
    Copy,
    Eq,
    PartialEq,
    Hash,
    Display,
    EnumIter,
    EnumString,
    FromRepr,
    SerializeDisplay,
    DeserializeFromStr,
)]
#[strum(ascii_case_insensitive)]
#[repr(u8)]
pub enum ChipType {
    #[strum(serialize = "SM16703")]
    Sm16703,
    #[strum(serialize = "TM1804")]
    Tm1804,
    #[strum(serialize = "UCS1903")]
    Ucs1903,
    #[strum(serialize = "WS2811")]
    Ws2811,
    #[strum(serialize = "WS2801")]
    Ws2801,
    #[strum(serialize = "SK6812")]
    Sk6812,
    #[strum(serialize = "LPD6803")]
    Lpd6803,
    #[strum(serialize = "LPD8806")]
    Lpd8806,
    #[strum(serialize = "APA102")]
    Apa102,
    #[strum(serialize = "APA105")]
    Apa105,
    #[strum(serialize = "DMX512")]
    Dmx512,
    #[strum(serialize = "TM1914")]
    Tm1914,
    #[strum(serialize = "TM1913")]
    Tm1913,
    #[strum(serialize = "P9813")]
    P9813,
    #[strum(serialize = "INK1003")]
    Ink1003,
    #[strum(serialize = "P943S")]
    P943s,
    #[strum(serialize = "P9411")]
    P9411,
    #[strum(serialize = "P9413")]
    P9413,
    #[strum(serialize = "TX1812")]
    Tx1812,
    #[strum(serialize = "TX1813")]
    Tx1813,
    #[strum(serialize = "GS8206")]
    Gs8206,
    #[strum(serialize = "GS8208")]
    Gs8208,
    #[strum(serialize = "SK9822")]
    Sk9822,
    #[strum(serialize = "TM1814")]
    Tm1814,
    #[strum(serialize = "SK6812_RGBW")]
    Sk6812Rgbw,
    #[strum(serialize = "P9414")]
    P9414,
    #[strum(serialize = "P9412")]
    P9412,
}

impl ChipType {
    /// Resolves a chip name to its table entry.
    ///
    /// ```
    /// use sp108e::ChipType;
    ///
    /// assert_eq!(ChipType::Ws2811, ChipType::from_name("WS2811")?);
    /// assert_eq!(3, ChipType::from_name("ws2811")?.index());
    /// # Ok::<(), sp108e::CodecError>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::UnknownChipType`] when the name is not in the table.
    pub fn from_name(name: &str) -> Result<Self, CodecError> {
        name.parse().map_err(|_| CodecError::UnknownChipType {
            name: name.to_string(),
        })
    }

    /// Position of the chip in the canonical list; this is the wire value.
    #[must_use]
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Looks up a chip by its wire index.
    #[must_use]
    pub fn from_index(index: u8) -> Option<Self> {
        Self::from_repr(index)
    }

    /// Returns whether the chip drives a separate white channel.
    #[must_use]
    pub fn has_white_channel(self) -> bool {
        matches!(self, Self::Sk6812Rgbw)
    }

    /// Iterates the canonical chip list in wire order.
    pub fn all() -> impl Iterator<Item = Self> {
        Self::iter()
    }
}

/// Channel byte order of the attached strip.
#[derive(
    Debug,
    Clone,
    Copy,
    Eq,
    PartialEq,
    Hash,
    Display,
    EnumIter,
    EnumString,
    FromRepr,
    SerializeDisplay,
    DeserializeFromStr,
)]
#[strum(ascii_case_insensitive)]
#[repr(u8)]
pub enum ColorOrder {
    #[strum(serialize = "RGB")]
    Rgb,
    #[strum(serialize = "RBG")]
    Rbg,
    #[strum(serialize = "GRB")]
    Grb,
    #[strum(serialize = "GBR")]
    Gbr,
    #[strum(serialize = "BRG")]
    Brg,
    #[strum(serialize = "BGR")]
    Bgr,
}

impl ColorOrder {
    /// Resolves a colour-order name to its table entry.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::UnknownColorOrder`] when the name is not in the table.
    pub fn from_name(name: &str) -> Result<Self, CodecError> {
        name.parse().map_err(|_| CodecError::UnknownColorOrder {
            name: name.to_string(),
        })
    }

    /// Position of the order in the canonical list; this is the wire value.
    #[must_use]
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Looks up a colour order by its wire index.
    #[must_use]
    pub fn from_index(index: u8) -> Option<Self> {
        Self::from_repr(index)
    }
}

/// Preset animations selectable with the mode opcode.
#[derive(
    Debug,
    Clone,
    Copy,
    Eq,
    PartialEq,
    Hash,
    Display,
    EnumIter,
    EnumString,
    FromRepr,
    SerializeDisplay,
    DeserializeFromStr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
#[repr(u8)]
pub enum AnimationMode {
    Meteor = 0xcd,
    Breathing = 0xce,
    Stack = 0xcf,
    Flow = 0xd0,
    Wave = 0xd1,
    Flash = 0xd2,
    /// Single static colour; colour writes are only visible in this mode.
    Static = 0xd3,
    #[strum(serialize = "CATCHUP")]
    CatchUp = 0xd4,
    CustomEffect = 0xdb,
}

impl AnimationMode {
    /// Resolves a preset name to its table entry.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::UnknownAnimationMode`] when the name is not a preset.
    pub fn from_name(name: &str) -> Result<Self, CodecError> {
        name.parse().map_err(|_| CodecError::UnknownAnimationMode {
            name: name.to_string(),
        })
    }

    /// Raw mode code reported in the status block and sent as the parameter.
    #[must_use]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Looks up a preset by its raw mode code.
    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        Self::from_repr(code)
    }
}

/// Classification of the raw animation-mode code in a status block.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum AnimationKind {
    /// One of the preset animations.
    Preset(AnimationMode),
    /// A dream-mode pattern (any code outside the preset table).
    Dream { code: u8 },
}

impl AnimationKind {
    /// Classifies a raw status code.
    #[must_use]
    pub fn from_code(code: u8) -> Self {
        AnimationMode::from_code(code).map_or(Self::Dream { code }, Self::Preset)
    }

    /// Returns whether the device is showing a moving animation.
    #[must_use]
    pub fn is_animated(self) -> bool {
        !matches!(self, Self::Preset(AnimationMode::Static))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("SM16703", 0)]
    #[case("WS2811", 3)]
    #[case("SK6812_RGBW", 24)]
    #[case("P9412", 26)]
    fn chip_type_index_is_list_position(#[case] name: &str, #[case] index: u8) {
        let chip = ChipType::from_name(name).expect("chip name should be in the table");
        assert_eq!(index, chip.index());
        assert_eq!(Some(chip), ChipType::from_index(index));
        assert_eq!(name, chip.to_string());
    }

    #[test]
    fn chip_table_has_twenty_seven_entries() {
        assert_eq!(27, ChipType::all().count());
        assert_eq!(None, ChipType::from_index(27));
    }

    #[test]
    fn unknown_chip_name_is_rejected() {
        assert_matches!(
            ChipType::from_name("NOT_A_CHIP"),
            Err(CodecError::UnknownChipType { name }) if name == "NOT_A_CHIP"
        );
    }

    #[rstest]
    #[case("RGB", 0)]
    #[case("GRB", 2)]
    #[case("bgr", 5)]
    fn colour_order_index_is_list_position(#[case] name: &str, #[case] index: u8) {
        let order = ColorOrder::from_name(name).expect("colour order should be in the table");
        assert_eq!(index, order.index());
    }

    #[test]
    fn unknown_colour_order_is_rejected() {
        assert_matches!(
            ColorOrder::from_name("RGBW"),
            Err(CodecError::UnknownColorOrder { .. })
        );
    }

    #[test]
    fn only_rgbw_chip_has_white_channel() {
        let white: Vec<_> = ChipType::all().filter(|chip| chip.has_white_channel()).collect();
        assert_eq!(vec![ChipType::Sk6812Rgbw], white);
    }

    #[rstest]
    #[case(0xd3, AnimationKind::Preset(AnimationMode::Static), false)]
    #[case(0xcd, AnimationKind::Preset(AnimationMode::Meteor), true)]
    #[case(0x05, AnimationKind::Dream { code: 0x05 }, true)]
    fn animation_kind_classifies_codes(
        #[case] code: u8,
        #[case] expected: AnimationKind,
        #[case] animated: bool,
    ) {
        let kind = AnimationKind::from_code(code);
        assert_eq!(expected, kind);
        assert_eq!(animated, kind.is_animated());
    }

    #[test]
    fn animation_mode_names_parse() {
        assert_eq!(
            AnimationMode::CatchUp,
            AnimationMode::from_name("catchup").expect("preset should parse")
        );
        assert_eq!(
            AnimationMode::CustomEffect,
            AnimationMode::from_name("CUSTOM_EFFECT").expect("preset should parse")
        );
        assert_eq!("BREATHING", AnimationMode::Breathing.to_string());
    }
}

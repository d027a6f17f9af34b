use strum_macros::{Display, EnumIter};

/// First byte of every command frame.
pub(crate) const FRAME_PREFIX: u8 = 0x38;
/// Last byte of every command frame.
pub(crate) const FRAME_SUFFIX: u8 = 0x83;
/// Total length of an encoded command frame.
pub(crate) const FRAME_LEN: usize = 6;
/// Number of parameter bytes carried by every frame.
pub(crate) const PARAMETER_LEN: usize = 3;
/// Length of the status reply sent for `get status` and `toggle`.
pub(crate) const STATUS_RESPONSE_LEN: usize = 17;

/// Known SP108E command opcodes.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, EnumIter, Display)]
pub enum Opcode {
    /// Reads the controller name.
    #[strum(to_string = "get_name")]
    GetName,
    /// Selects the attached LED driver chip.
    #[strum(to_string = "set_chip_type")]
    SetChipType,
    /// Selects the channel byte order.
    #[strum(to_string = "set_color_order")]
    SetColorOrder,
    /// Sets the number of segments.
    #[strum(to_string = "set_segments")]
    SetSegments,
    /// Sets the number of LEDs in each segment.
    #[strum(to_string = "set_leds_per_segment")]
    SetLedsPerSegment,
    /// Reads the 17-byte status block.
    #[strum(to_string = "get_status")]
    GetStatus,
    /// Flips the power state and echoes the status block.
    #[strum(to_string = "toggle")]
    Toggle,
    /// Selects a preset animation or a dream-mode pattern.
    ///
    /// The device reuses one opcode for both; see [`crate::ModeTarget`].
    #[strum(to_string = "set_mode")]
    SetMode,
    /// Sets the RGB brightness byte.
    #[strum(to_string = "set_brightness")]
    SetBrightness,
    /// Sets the white channel brightness byte.
    #[strum(to_string = "set_white_brightness")]
    SetWhiteBrightness,
    /// Sets the animation speed byte.
    #[strum(to_string = "set_speed")]
    SetSpeed,
    /// Sets the static RGB colour.
    #[strum(to_string = "set_color")]
    SetColor,
    /// Starts automatic dream-mode cycling.
    #[strum(to_string = "set_dream_mode_auto")]
    SetDreamModeAuto,
}

impl Opcode {
    /// Returns the opcode byte placed in a command frame.
    #[must_use]
    pub fn byte(self) -> u8 {
        opcode_metadata(self).byte()
    }
}

/// Descriptive metadata for one opcode.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub(crate) struct OpcodeMetadata {
    byte: u8,
    name: &'static str,
    response_len: usize,
}

impl OpcodeMetadata {
    /// Opcode byte on the wire.
    pub(crate) fn byte(self) -> u8 {
        self.byte
    }

    /// Human-readable opcode name.
    pub(crate) fn name(self) -> &'static str {
        self.name
    }

    /// Number of reply bytes the device sends for this opcode.
    pub(crate) fn response_len(self) -> usize {
        self.response_len
    }
}

/// Returns metadata for one opcode.
pub(crate) fn opcode_metadata(opcode: Opcode) -> OpcodeMetadata {
    metadata_for(opcode)
}

fn metadata_for(opcode: Opcode) -> OpcodeMetadata {
    match opcode {
        Opcode::GetName => OpcodeMetadata {
            byte: 0x77,
            name: "get name",
            response_len: 0,
        },
        Opcode::SetChipType => OpcodeMetadata {
            byte: 0x1c,
            name: "set chip type",
            response_len: 0,
        },
        Opcode::SetColorOrder => OpcodeMetadata {
            byte: 0x3c,
            name: "set colour order",
            response_len: 0,
        },
        Opcode::SetSegments => OpcodeMetadata {
            byte: 0x2e,
            name: "set segments",
            response_len: 0,
        },
        Opcode::SetLedsPerSegment => OpcodeMetadata {
            byte: 0x2d,
            name: "set LEDs per segment",
            response_len: 0,
        },
        Opcode::GetStatus => OpcodeMetadata {
            byte: 0x10,
            name: "get status",
            response_len: STATUS_RESPONSE_LEN,
        },
        Opcode::Toggle => OpcodeMetadata {
            byte: 0xaa,
            name: "toggle power",
            response_len: STATUS_RESPONSE_LEN,
        },
        Opcode::SetMode => OpcodeMetadata {
            byte: 0x2c,
            name: "set animation/dream mode",
            response_len: 0,
        },
        Opcode::SetBrightness => OpcodeMetadata {
            byte: 0x2a,
            name: "set brightness",
            response_len: 0,
        },
        Opcode::SetWhiteBrightness => OpcodeMetadata {
            byte: 0x08,
            name: "set white brightness",
            response_len: 0,
        },
        Opcode::SetSpeed => OpcodeMetadata {
            byte: 0x03,
            name: "set animation speed",
            response_len: 0,
        },
        Opcode::SetColor => OpcodeMetadata {
            byte: 0x22,
            name: "set colour",
            response_len: 0,
        },
        Opcode::SetDreamModeAuto => OpcodeMetadata {
            byte: 0x06,
            name: "set dream mode auto",
            response_len: 0,
        },
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use strum::IntoEnumIterator;

    use super::*;

    #[rstest]
    #[case(Opcode::GetStatus, 0x10, 17)]
    #[case(Opcode::Toggle, 0xaa, 17)]
    #[case(Opcode::SetColor, 0x22, 0)]
    #[case(Opcode::SetMode, 0x2c, 0)]
    fn opcode_metadata_matches_wire_table(
        #[case] opcode: Opcode,
        #[case] byte: u8,
        #[case] response_len: usize,
    ) {
        let metadata = opcode_metadata(opcode);
        assert_eq!(byte, metadata.byte());
        assert_eq!(response_len, metadata.response_len());
    }

    #[test]
    fn opcode_bytes_are_unique() {
        let bytes: HashSet<u8> = Opcode::iter().map(Opcode::byte).collect();
        assert_eq!(Opcode::iter().count(), bytes.len());
    }
}

use std::fmt;

use crate::protocol::{FRAME_LEN, FRAME_PREFIX, FRAME_SUFFIX, Opcode, PARAMETER_LEN};

use super::CodecError;

const PARAMETER_HEX_LEN: usize = PARAMETER_LEN * 2;
const MAX_DREAM_INDEX: u8 = 179;

/// Formats a byte as two lowercase hex digits.
///
/// ```
/// assert_eq!("0a", sp108e::int_to_hex_byte(10));
/// assert_eq!("ff", sp108e::int_to_hex_byte(255));
/// ```
#[must_use]
pub fn int_to_hex_byte(value: u8) -> String {
    format!("{value:02x}")
}

/// Formats a count as lowercase hex, at least two digits wide.
///
/// Counts above `0xff` keep their natural width and are then right-padded by
/// [`Parameter::from_hex`] like any other parameter.
#[must_use]
pub(crate) fn count_to_hex(value: u16) -> String {
    format!("{value:02x}")
}

/// Three-byte command argument.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub struct Parameter([u8; PARAMETER_LEN]);

impl Parameter {
    /// The neutral `000000` argument sent when an opcode takes no parameter.
    pub const NONE: Self = Self([0; PARAMETER_LEN]);

    /// Parses up to six hex digits, right-padding with `'0'`.
    ///
    /// ```
    /// use sp108e::Parameter;
    ///
    /// assert_eq!([0xd3, 0x00, 0x00], Parameter::from_hex("d3")?.bytes());
    /// assert_eq!([0xff, 0x67, 0x17], Parameter::from_hex("ff6717")?.bytes());
    /// # Ok::<(), sp108e::CodecError>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidParameter`] when the input is longer than
    /// six characters or contains a non-hex character.
    pub fn from_hex(value: &str) -> Result<Self, CodecError> {
        if value.len() > PARAMETER_HEX_LEN {
            return Err(CodecError::InvalidParameter {
                reason: format!(
                    "parameter `{value}` is longer than {PARAMETER_HEX_LEN} hex characters"
                ),
            });
        }
        if let Some(invalid) = value.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(CodecError::InvalidParameter {
                reason: format!("parameter `{value}` contains non-hex character `{invalid}`"),
            });
        }

        let padded = format!("{value:0<PARAMETER_HEX_LEN$}");
        let mut bytes = [0u8; PARAMETER_LEN];
        hex::decode_to_slice(&padded, &mut bytes).map_err(|error| {
            CodecError::InvalidParameter {
                reason: format!("parameter `{value}` could not be decoded: {error}"),
            }
        })?;
        Ok(Self(bytes))
    }

    /// Builds a parameter whose first byte is `value`.
    #[must_use]
    pub fn from_byte(value: u8) -> Self {
        Self([value, 0, 0])
    }

    /// Returns the raw parameter bytes.
    #[must_use]
    pub fn bytes(self) -> [u8; PARAMETER_LEN] {
        self.0
    }
}

impl From<[u8; PARAMETER_LEN]> for Parameter {
    fn from(bytes: [u8; PARAMETER_LEN]) -> Self {
        Self(bytes)
    }
}

/// Which meaning the shared mode opcode carries.
///
/// The device uses `0x2c` both for selecting a preset animation and for
/// selecting a dream-mode pattern; only the parameter range differs.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ModeTarget {
    /// Parameter is a preset animation code (`0xcd..=0xdb`).
    AnimationMode,
    /// Parameter is a zero-based dream pattern index (`0..=179`).
    DreamMode,
}

/// One encoded request: `prefix ∥ parameter ∥ opcode ∥ suffix`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct CommandFrame {
    opcode: Opcode,
    parameter: Parameter,
}

impl CommandFrame {
    /// Creates a frame from an opcode and a parsed parameter.
    #[must_use]
    pub fn new(opcode: Opcode, parameter: Parameter) -> Self {
        Self { opcode, parameter }
    }

    /// Creates a frame that carries the neutral parameter.
    #[must_use]
    pub fn bare(opcode: Opcode) -> Self {
        Self::new(opcode, Parameter::NONE)
    }

    /// Encodes an opcode with a hex parameter string.
    ///
    /// ```
    /// use sp108e::{CommandFrame, Opcode};
    ///
    /// let frame = CommandFrame::encode(Opcode::SetBrightness, "80")?;
    /// assert_eq!([0x38, 0x80, 0x00, 0x00, 0x2a, 0x83], frame.to_bytes());
    /// # Ok::<(), sp108e::CodecError>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidParameter`] when the parameter is not
    /// valid hex of at most six characters.
    pub fn encode(opcode: Opcode, parameter_hex: &str) -> Result<Self, CodecError> {
        Ok(Self::new(opcode, Parameter::from_hex(parameter_hex)?))
    }

    /// Encodes the shared mode opcode for either of its meanings.
    #[must_use]
    pub fn mode(target: ModeTarget, value: u8) -> Self {
        let value = match target {
            ModeTarget::AnimationMode => value,
            ModeTarget::DreamMode => value.min(MAX_DREAM_INDEX),
        };
        Self::new(Opcode::SetMode, Parameter::from_byte(value))
    }

    /// Returns the frame opcode.
    #[must_use]
    pub fn opcode(&self) -> Opcode {
        self.opcode
    }

    /// Returns the frame parameter.
    #[must_use]
    pub fn parameter(&self) -> Parameter {
        self.parameter
    }

    /// Returns the six wire bytes.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; FRAME_LEN] {
        let [p0, p1, p2] = self.parameter.bytes();
        [FRAME_PREFIX, p0, p1, p2, self.opcode.byte(), FRAME_SUFFIX]
    }
}

impl fmt::Display for CommandFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.to_bytes()))
    }
}

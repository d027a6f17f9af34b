//! Pure encode/decode layer for the SP108E wire protocol.

use thiserror::Error;

mod colour;
mod command_frame;
mod percentage;
mod status;
mod tables;

pub use colour::{Hsv, Rgb};
pub use command_frame::{CommandFrame, ModeTarget, Parameter, int_to_hex_byte};
pub(crate) use command_frame::count_to_hex;
pub use percentage::{Percentage, percentage_of};
pub use status::DeviceStatus;
pub use tables::{AnimationKind, AnimationMode, ChipType, ColorOrder};

/// Errors raised while encoding commands or decoding replies.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum CodecError {
    /// A command parameter could not be encoded.
    #[error("invalid command parameter: {reason}")]
    InvalidParameter { reason: String },
    /// A reply did not have the expected length or shape.
    #[error("malformed response: expected {expected} bytes, got {actual}")]
    MalformedResponse { expected: usize, actual: usize },
    /// The chip name is not in the chip table.
    #[error("unknown chip type `{name}`")]
    UnknownChipType { name: String },
    /// The colour-order name is not in the colour-order table.
    #[error("unknown colour order `{name}`")]
    UnknownColorOrder { name: String },
    /// The animation name is not a preset.
    #[error("unknown animation mode `{name}`")]
    UnknownAnimationMode { name: String },
    /// The colour is not six hex digits.
    #[error("invalid colour `{value}`: expected six hex digits")]
    InvalidColour { value: String },
    /// A percentage was above 100.
    #[error("percentage {value} is out of range (0..=100)")]
    PercentageOutOfRange { value: u8 },
}

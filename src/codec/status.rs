use crate::protocol::STATUS_RESPONSE_LEN;

use super::percentage::percentage_of;
use super::{AnimationKind, AnimationMode, ChipType, CodecError, ColorOrder, Hsv, Rgb};

const POWER_ON: u8 = 0x01;

/// Decoded 17-byte status block.
///
/// Every field is read from a fixed offset; percentages are derived from
/// the raw bytes on access and cannot be set independently.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct DeviceStatus {
    raw: [u8; STATUS_RESPONSE_LEN],
}

impl DeviceStatus {
    /// Decodes a raw status reply.
    ///
    /// ```
    /// use sp108e::DeviceStatus;
    ///
    /// let status = DeviceStatus::from_hex("3801d380ff02003c0001ff6717030010ff")?;
    /// assert!(status.is_on());
    /// assert_eq!(60, status.leds_per_segment());
    /// # Ok::<(), sp108e::CodecError>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MalformedResponse`] unless exactly 17 bytes are supplied.
    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        let raw: [u8; STATUS_RESPONSE_LEN] =
            bytes
                .try_into()
                .map_err(|_| CodecError::MalformedResponse {
                    expected: STATUS_RESPONSE_LEN,
                    actual: bytes.len(),
                })?;
        Ok(Self { raw })
    }

    /// Decodes a status reply given as 34 hex characters.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MalformedResponse`] when the string is not 34
    /// valid hex characters.
    pub fn from_hex(value: &str) -> Result<Self, CodecError> {
        let bytes = hex::decode(value).map_err(|_| CodecError::MalformedResponse {
            expected: STATUS_RESPONSE_LEN,
            actual: value.len() / 2,
        })?;
        Self::decode(&bytes)
    }

    /// The undecoded reply bytes.
    #[must_use]
    pub fn raw(&self) -> &[u8; STATUS_RESPONSE_LEN] {
        &self.raw
    }

    /// The reply as 34 lowercase hex characters.
    #[must_use]
    pub fn raw_hex(&self) -> String {
        hex::encode(self.raw)
    }

    /// Leading byte of the reply, passed through undecoded.
    #[must_use]
    pub fn leading_byte(&self) -> u8 {
        self.raw[0]
    }

    /// Whether the strip is powered on.
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.raw[1] == POWER_ON
    }

    /// Raw animation-mode code.
    #[must_use]
    pub fn animation_mode_code(&self) -> u8 {
        self.raw[2]
    }

    /// Classified animation mode.
    #[must_use]
    pub fn animation_kind(&self) -> AnimationKind {
        AnimationKind::from_code(self.animation_mode_code())
    }

    /// Preset name for the current mode, or `Unknown` for dream patterns.
    #[must_use]
    pub fn animation_mode_name(&self) -> String {
        AnimationMode::from_code(self.animation_mode_code())
            .map_or_else(|| "Unknown".to_string(), |mode| mode.to_string())
    }

    /// Raw animation speed byte.
    #[must_use]
    pub fn animation_speed(&self) -> u8 {
        self.raw[3]
    }

    /// Animation speed as a percentage of `0xff`.
    #[must_use]
    pub fn animation_speed_percentage(&self) -> f64 {
        percentage_of(self.animation_speed())
    }

    /// Raw RGB brightness byte.
    #[must_use]
    pub fn brightness(&self) -> u8 {
        self.raw[4]
    }

    /// RGB brightness as a percentage of `0xff`.
    #[must_use]
    pub fn brightness_percentage(&self) -> f64 {
        percentage_of(self.brightness())
    }

    /// Colour-order table index.
    #[must_use]
    pub fn color_order_index(&self) -> u8 {
        self.raw[5]
    }

    /// Colour order, when the index is in the table.
    #[must_use]
    pub fn color_order(&self) -> Option<ColorOrder> {
        ColorOrder::from_index(self.color_order_index())
    }

    /// LEDs per segment (big-endian bytes 6..=7).
    #[must_use]
    pub fn leds_per_segment(&self) -> u16 {
        u16::from_be_bytes([self.raw[6], self.raw[7]])
    }

    /// Segment count (big-endian bytes 8..=9).
    #[must_use]
    pub fn segment_count(&self) -> u16 {
        u16::from_be_bytes([self.raw[8], self.raw[9]])
    }

    /// Current static colour.
    #[must_use]
    pub fn colour(&self) -> Rgb {
        Rgb::new(self.raw[10], self.raw[11], self.raw[12])
    }

    /// Current static colour in HSV.
    #[must_use]
    pub fn hsv(&self) -> Hsv {
        self.colour().to_hsv()
    }

    /// Chip-type table index.
    #[must_use]
    pub fn chip_type_index(&self) -> u8 {
        self.raw[13]
    }

    /// Chip type, when the index is in the table.
    #[must_use]
    pub fn chip_type(&self) -> Option<ChipType> {
        ChipType::from_index(self.chip_type_index())
    }

    /// Number of recorded custom patterns.
    #[must_use]
    pub fn recorded_patterns(&self) -> u8 {
        self.raw[14]
    }

    /// Raw white-channel brightness byte.
    #[must_use]
    pub fn white_brightness(&self) -> u8 {
        self.raw[15]
    }

    /// White-channel brightness as a percentage of `0xff`.
    #[must_use]
    pub fn white_brightness_percentage(&self) -> f64 {
        percentage_of(self.white_brightness())
    }
}

impl From<[u8; STATUS_RESPONSE_LEN]> for DeviceStatus {
    fn from(raw: [u8; STATUS_RESPONSE_LEN]) -> Self {
        Self { raw }
    }
}

impl TryFrom<&[u8]> for DeviceStatus {
    type Error = CodecError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::decode(bytes)
    }
}

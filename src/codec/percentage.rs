use super::CodecError;

const MAX_PERCENTAGE: u8 = 100;

/// Converts a raw device byte into a percentage of `0xff`.
///
/// Every percentage the device reports is derived this way.
#[must_use]
pub fn percentage_of(raw: u8) -> f64 {
    f64::from(raw) / 255.0 * 100.0
}

/// Validated percentage in the inclusive range `0..=100`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Percentage(u8);

impl Percentage {
    /// Full scale.
    pub const FULL: Self = Self(MAX_PERCENTAGE);

    /// Creates a validated percentage.
    ///
    /// ```
    /// use sp108e::Percentage;
    ///
    /// let half = Percentage::new(50)?;
    /// assert_eq!(50, half.value());
    /// # Ok::<(), sp108e::CodecError>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::PercentageOutOfRange`] when `value` is above 100.
    pub fn new(value: u8) -> Result<Self, CodecError> {
        if value > MAX_PERCENTAGE {
            return Err(CodecError::PercentageOutOfRange { value });
        }
        Ok(Self(value))
    }

    /// Returns the percentage.
    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    /// Scales to a device byte, rounding up.
    ///
    /// Rounding up means a percentage read back from the device may sit a
    /// fraction above the one written, never below it.
    ///
    /// ```
    /// use sp108e::Percentage;
    ///
    /// assert_eq!(128, Percentage::new(50)?.to_raw());
    /// assert_eq!(3, Percentage::new(1)?.to_raw());
    /// # Ok::<(), sp108e::CodecError>(())
    /// ```
    #[must_use]
    pub fn to_raw(self) -> u8 {
        let scaled = (f64::from(self.0) / 100.0 * 255.0).ceil();
        // `self.0 <= 100` keeps the product within 0.0..=255.0.
        scaled.clamp(0.0, 255.0) as u8
    }
}

impl TryFrom<u8> for Percentage {
    type Error = CodecError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

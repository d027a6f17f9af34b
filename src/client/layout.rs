use tracing::instrument;

use super::DeviceClient;
use crate::codec::{ChipType, ColorOrder, CommandFrame, count_to_hex, int_to_hex_byte};
use crate::error::DeviceError;
use crate::protocol::Opcode;

impl DeviceClient {
    /// Selects the attached LED driver chip.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::Transport`] when the write fails.
    #[instrument(skip(self), level = "debug", fields(chip = %chip))]
    pub async fn set_chip_type(&self, chip: ChipType) -> Result<(), DeviceError> {
        self.send(CommandFrame::encode(
            Opcode::SetChipType,
            &int_to_hex_byte(chip.index()),
        )?)
        .await?;
        Ok(())
    }

    /// Selects the attached LED driver chip by its table name.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::Codec`] without touching the network when the
    /// name is not in the chip table.
    pub async fn set_chip_type_by_name(&self, name: &str) -> Result<(), DeviceError> {
        let chip = ChipType::from_name(name)?;
        self.set_chip_type(chip).await
    }

    /// Selects the strip's channel byte order.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::Transport`] when the write fails.
    #[instrument(skip(self), level = "debug", fields(order = %order))]
    pub async fn set_color_order(&self, order: ColorOrder) -> Result<(), DeviceError> {
        self.send(CommandFrame::encode(
            Opcode::SetColorOrder,
            &int_to_hex_byte(order.index()),
        )?)
        .await?;
        Ok(())
    }

    /// Selects the strip's channel byte order by its table name.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::Codec`] without touching the network when the
    /// name is not in the colour-order table.
    pub async fn set_color_order_by_name(&self, name: &str) -> Result<(), DeviceError> {
        let order = ColorOrder::from_name(name)?;
        self.set_color_order(order).await
    }

    /// Sets the number of segments.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::Transport`] when the write fails.
    #[instrument(skip(self), level = "debug")]
    pub async fn set_segments(&self, segments: u16) -> Result<(), DeviceError> {
        self.send(CommandFrame::encode(
            Opcode::SetSegments,
            &count_to_hex(segments),
        )?)
        .await?;
        Ok(())
    }

    /// Sets the number of LEDs in each segment.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::Transport`] when the write fails.
    #[instrument(skip(self), level = "debug")]
    pub async fn set_leds_per_segment(&self, leds: u16) -> Result<(), DeviceError> {
        self.send(CommandFrame::encode(
            Opcode::SetLedsPerSegment,
            &count_to_hex(leds),
        )?)
        .await?;
        Ok(())
    }
}

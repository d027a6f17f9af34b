use tracing::{debug, instrument};

use super::DeviceClient;
use crate::codec::{AnimationMode, CodecError, CommandFrame, Percentage, Rgb, int_to_hex_byte};
use crate::error::DeviceError;
use crate::protocol::Opcode;

/// Mode code the device reports before any animation has been chosen.
const NO_ANIMATION_CODE: u8 = 0x00;
const MIN_WHITE_BRIGHTNESS: u8 = 1;

fn brightness_frame(opcode: Opcode, value: u8) -> Result<CommandFrame, CodecError> {
    CommandFrame::encode(opcode, &int_to_hex_byte(value))
}

impl DeviceClient {
    /// Sets the RGB brightness byte.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::Transport`] when the write fails.
    #[instrument(skip(self), level = "debug")]
    pub async fn set_brightness(&self, value: u8) -> Result<(), DeviceError> {
        self.send(brightness_frame(Opcode::SetBrightness, value)?)
            .await?;
        Ok(())
    }

    /// Sets the RGB brightness from a percentage, rounding up.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::Transport`] when the write fails.
    pub async fn set_brightness_percentage(&self, value: Percentage) -> Result<(), DeviceError> {
        self.set_brightness(value.to_raw()).await
    }

    /// Sets the white-channel brightness byte.
    ///
    /// Zero is raised to one; the white channel cannot be switched fully
    /// off this way.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::Transport`] when the write fails.
    #[instrument(skip(self), level = "debug")]
    pub async fn set_white_brightness(&self, value: u8) -> Result<(), DeviceError> {
        let value = value.max(MIN_WHITE_BRIGHTNESS);
        self.send(brightness_frame(Opcode::SetWhiteBrightness, value)?)
            .await?;
        Ok(())
    }

    /// Sets the white-channel brightness from a percentage, rounding up.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::Transport`] when the write fails.
    pub async fn set_white_brightness_percentage(
        &self,
        value: Percentage,
    ) -> Result<(), DeviceError> {
        self.set_white_brightness(value.to_raw()).await
    }

    /// Writes a static colour.
    ///
    /// The status is read first. When no animation has been chosen yet the
    /// device is switched to the static preset before the colour write,
    /// otherwise the colour would not show. The two writes are separate
    /// commands.
    ///
    /// # Errors
    ///
    /// Returns the status-read or write error.
    #[instrument(skip(self), level = "debug", fields(colour = %colour))]
    pub async fn set_color(&self, colour: Rgb) -> Result<(), DeviceError> {
        let status = self.get_status().await?;
        if status.animation_mode_code() == NO_ANIMATION_CODE {
            debug!("no animation selected; switching to static before colour write");
            self.set_animation_mode(AnimationMode::Static).await?;
        }
        self.send(CommandFrame::encode(Opcode::SetColor, &colour.to_string())?)
            .await?;
        Ok(())
    }
}

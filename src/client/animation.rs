use tracing::instrument;

use super::DeviceClient;
use crate::codec::{AnimationMode, CommandFrame, ModeTarget, Percentage, int_to_hex_byte};
use crate::error::DeviceError;
use crate::protocol::Opcode;

const MIN_DREAM_MODE: u8 = 1;
const MAX_DREAM_MODE: u8 = 180;

impl DeviceClient {
    /// Selects a preset animation.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::Transport`] when the write fails.
    #[instrument(skip(self), level = "debug", fields(mode = %mode))]
    pub async fn set_animation_mode(&self, mode: AnimationMode) -> Result<(), DeviceError> {
        self.send(CommandFrame::mode(ModeTarget::AnimationMode, mode.code()))
            .await?;
        Ok(())
    }

    /// Sets the animation speed byte.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::Transport`] when the write fails.
    #[instrument(skip(self), level = "debug")]
    pub async fn set_animation_speed(&self, value: u8) -> Result<(), DeviceError> {
        self.send(CommandFrame::encode(Opcode::SetSpeed, &int_to_hex_byte(value))?)
            .await?;
        Ok(())
    }

    /// Sets the animation speed from a percentage, rounding up.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::Transport`] when the write fails.
    pub async fn set_animation_speed_percentage(
        &self,
        value: Percentage,
    ) -> Result<(), DeviceError> {
        self.set_animation_speed(value.to_raw()).await
    }

    /// Selects one of the 180 dream-mode patterns, numbered from one.
    ///
    /// Out-of-range numbers are clamped into `1..=180`.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::Transport`] when the write fails.
    #[instrument(skip(self), level = "debug")]
    pub async fn set_dream_mode(&self, pattern: u8) -> Result<(), DeviceError> {
        let index = pattern.clamp(MIN_DREAM_MODE, MAX_DREAM_MODE) - 1;
        self.send(CommandFrame::mode(ModeTarget::DreamMode, index))
            .await?;
        Ok(())
    }

    /// Starts automatic cycling through the dream-mode patterns.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::Transport`] when the write fails.
    #[instrument(skip(self), level = "debug")]
    pub async fn set_dream_mode_auto(&self) -> Result<(), DeviceError> {
        self.send(CommandFrame::bare(Opcode::SetDreamModeAuto))
            .await?;
        Ok(())
    }
}

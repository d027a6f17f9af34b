//! Typed SP108E operations in domain units.

mod animation;
mod layout;
mod light;

use tracing::{debug, instrument};

use crate::codec::{CommandFrame, DeviceStatus};
use crate::config::DeviceConfig;
use crate::error::DeviceError;
use crate::hw::{DeviceTransport, TcpTransport, TcpTransportOptions};
use crate::protocol::{Opcode, opcode_metadata};
use crate::utils::format_hex;

/// Client for one SP108E controller.
///
/// Every operation is a full exchange on a fresh connection; the client
/// itself holds no connection state.
pub struct DeviceClient {
    transport: Box<dyn DeviceTransport>,
}

impl DeviceClient {
    /// Creates a client over an injected transport.
    ///
    /// ```
    /// use sp108e::{DeviceClient, FakeDevice};
    ///
    /// let client = DeviceClient::new(Box::new(FakeDevice::default()));
    /// assert_eq!("fake-sp108e", client.peer());
    /// ```
    #[must_use]
    pub fn new(transport: Box<dyn DeviceTransport>) -> Self {
        Self { transport }
    }

    /// Creates a client that talks TCP to the configured host.
    #[must_use]
    pub fn tcp(config: &DeviceConfig, options: TcpTransportOptions) -> Self {
        Self::new(Box::new(TcpTransport::new(config.address(), options)))
    }

    /// Describes the device this client talks to.
    #[must_use]
    pub fn peer(&self) -> String {
        self.transport.peer()
    }

    /// Sends one frame, reading as many reply bytes as its opcode produces.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::Transport`] when the exchange fails.
    #[instrument(skip(self, frame), level = "trace", fields(opcode = %frame.opcode()))]
    pub async fn send(&self, frame: CommandFrame) -> Result<Vec<u8>, DeviceError> {
        let metadata = opcode_metadata(frame.opcode());
        debug!(
            command = metadata.name(),
            frame = %format_hex(&frame.to_bytes()),
            "sending command"
        );
        Ok(self
            .transport
            .send(frame, metadata.response_len())
            .await?)
    }

    /// Reads and decodes the 17-byte status block.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::Transport`] when the exchange fails and
    /// [`DeviceError::Codec`] when the reply is not a status block.
    #[instrument(skip(self), level = "debug")]
    pub async fn get_status(&self) -> Result<DeviceStatus, DeviceError> {
        let reply = self.send(CommandFrame::bare(Opcode::GetStatus)).await?;
        Ok(DeviceStatus::decode(&reply)?)
    }

    /// Flips the power state and returns the status the device echoes.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::Transport`] when the exchange fails and
    /// [`DeviceError::Codec`] when the echo is not a status block.
    #[instrument(skip(self), level = "debug")]
    pub async fn toggle_on_off(&self) -> Result<DeviceStatus, DeviceError> {
        let reply = self.send(CommandFrame::bare(Opcode::Toggle)).await?;
        Ok(DeviceStatus::decode(&reply)?)
    }

    /// Turns the strip on, toggling only when it is currently off.
    ///
    /// # Errors
    ///
    /// Returns the status-read or toggle error.
    #[instrument(skip(self), level = "debug")]
    pub async fn on(&self) -> Result<(), DeviceError> {
        self.switch_to(true).await
    }

    /// Turns the strip off, toggling only when it is currently on.
    ///
    /// # Errors
    ///
    /// Returns the status-read or toggle error.
    #[instrument(skip(self), level = "debug")]
    pub async fn off(&self) -> Result<(), DeviceError> {
        self.switch_to(false).await
    }

    async fn switch_to(&self, on: bool) -> Result<(), DeviceError> {
        let status = self.get_status().await?;
        if status.is_on() == on {
            debug!(on, "power already in requested state");
            return Ok(());
        }
        self.toggle_on_off().await?;
        Ok(())
    }
}

impl std::fmt::Debug for DeviceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceClient")
            .field("peer", &self.transport.peer())
            .finish()
    }
}

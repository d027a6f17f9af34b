use std::time::Duration;

use async_trait::async_trait;
use bon::Builder;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::{sleep, timeout};
use tracing::{instrument, trace};

use super::transport::DeviceTransport;
use crate::codec::CommandFrame;
use crate::error::TransportError;
use crate::utils::format_hex;

/// TCP port the controller listens on out of the box.
pub const DEFAULT_PORT: u16 = 8189;

const DEFAULT_IO_TIMEOUT: Duration = Duration::from_secs(3);
const DEFAULT_WRITE_COOLDOWN: Duration = Duration::from_millis(250);

/// Tuning for [`TcpTransport`].
///
/// ```
/// use std::time::Duration;
/// use sp108e::TcpTransportOptions;
///
/// let options = TcpTransportOptions::builder()
///     .io_timeout(Duration::from_secs(1))
///     .build();
/// assert_eq!(Duration::from_millis(250), options.write_cooldown());
/// ```
#[derive(Debug, Clone, Copy, Eq, PartialEq, Builder)]
pub struct TcpTransportOptions {
    /// Upper bound for connect, write and read combined.
    #[builder(default = DEFAULT_IO_TIMEOUT)]
    io_timeout: Duration,
    /// Pause after every command that expects no reply.
    #[builder(default = DEFAULT_WRITE_COOLDOWN)]
    write_cooldown: Duration,
}

impl TcpTransportOptions {
    #[must_use]
    pub fn io_timeout(&self) -> Duration {
        self.io_timeout
    }

    #[must_use]
    pub fn write_cooldown(&self) -> Duration {
        self.write_cooldown
    }
}

impl Default for TcpTransportOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Connection-per-command TCP transport.
#[derive(Debug, Clone)]
pub struct TcpTransport {
    address: String,
    options: TcpTransportOptions,
}

impl TcpTransport {
    /// Creates a transport for `address` (`host:port`).
    #[must_use]
    pub fn new(address: impl Into<String>, options: TcpTransportOptions) -> Self {
        Self {
            address: address.into(),
            options,
        }
    }

    /// Returns the configured options.
    #[must_use]
    pub fn options(&self) -> TcpTransportOptions {
        self.options
    }

    async fn exchange(
        &self,
        frame: CommandFrame,
        response_len: usize,
    ) -> Result<Vec<u8>, TransportError> {
        let mut stream = TcpStream::connect(&self.address)
            .await
            .map_err(|source| TransportError::Connect {
                address: self.address.clone(),
                source,
            })?;
        stream
            .write_all(&frame.to_bytes())
            .await
            .map_err(|source| TransportError::Write {
                address: self.address.clone(),
                source,
            })?;

        let mut response = vec![0; response_len];
        if response_len > 0 {
            stream
                .read_exact(&mut response)
                .await
                .map_err(|source| TransportError::Read {
                    address: self.address.clone(),
                    source,
                })?;
        }

        if let Err(error) = stream.shutdown().await {
            trace!(?error, "device closed the connection first");
        }
        Ok(response)
    }
}

#[async_trait]
impl DeviceTransport for TcpTransport {
    #[instrument(
        skip(self, frame),
        level = "debug",
        fields(address = %self.address, frame = %format_hex(&frame.to_bytes()))
    )]
    async fn send(
        &self,
        frame: CommandFrame,
        response_len: usize,
    ) -> Result<Vec<u8>, TransportError> {
        let io_timeout = self.options.io_timeout;
        let response = timeout(io_timeout, self.exchange(frame, response_len))
            .await
            .map_err(|_elapsed| TransportError::Timeout {
                address: self.address.clone(),
                timeout_ms: u64::try_from(io_timeout.as_millis()).unwrap_or(u64::MAX),
            })??;
        trace!(response = %format_hex(&response), "exchange complete");

        if response_len == 0 {
            sleep(self.options.write_cooldown).await;
        }
        Ok(response)
    }

    fn peer(&self) -> String {
        self.address.clone()
    }
}

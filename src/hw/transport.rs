use async_trait::async_trait;
use tracing::info;

use super::fake_backend::FakeDevice;
use super::tcp_backend::{TcpTransport, TcpTransportOptions};
use crate::codec::CommandFrame;
use crate::error::TransportError;

/// Runtime transport selection.
#[derive(Debug)]
pub(crate) enum TransportBackend {
    Tcp {
        address: String,
        options: TcpTransportOptions,
    },
    Fake(FakeDevice),
}

/// Builds an injected transport for the selected runtime backend.
pub(crate) fn transport_from_backend(backend: TransportBackend) -> Box<dyn DeviceTransport> {
    match backend {
        TransportBackend::Tcp { address, options } => {
            Box::new(TcpTransport::new(address, options))
        }
        TransportBackend::Fake(device) => {
            info!("using fake SP108E backend");
            Box::new(device)
        }
    }
}

/// One request/response exchange with the controller.
///
/// Implementations open a fresh connection per call and release it before
/// returning, whatever the outcome.
#[async_trait]
pub trait DeviceTransport: Send + Sync {
    /// Sends `frame` and reads exactly `response_len` reply bytes.
    ///
    /// When `response_len` is zero nothing is read, and the call only
    /// returns once the device is ready to accept the next command.
    async fn send(
        &self,
        frame: CommandFrame,
        response_len: usize,
    ) -> Result<Vec<u8>, TransportError>;

    /// Human-readable peer description used in logs.
    fn peer(&self) -> String;
}

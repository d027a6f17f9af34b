mod fake_backend;
mod tcp_backend;
mod transport;

pub use self::fake_backend::{FakeDevice, FakeDeviceConfig};
pub use self::tcp_backend::{DEFAULT_PORT, TcpTransport, TcpTransportOptions};
pub use self::transport::DeviceTransport;
pub(crate) use self::transport::{TransportBackend, transport_from_backend};

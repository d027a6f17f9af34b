//! Client library and command-line tool for SP108E Wi-Fi LED strip controllers.
//!
//! [`CommandFrame`] and [`DeviceStatus`] are the wire layer. A
//! [`DeviceTransport`] carries one exchange, [`DeviceClient`] exposes typed
//! operations on top of it, and [`SyncEngine`] keeps a bounded-staleness
//! status cache for interactive front ends.

mod app;
mod cli;
mod client;
mod codec;
mod config;
mod error;
mod hw;
mod protocol;
mod sync;
mod telemetry;
mod terminal;
mod utils;

pub use app::{DeviceTarget, run, run_with_clients_and_log_level, run_with_log_level};
pub use cli::{
    Args, ColourArgs, Command, DreamArgs, DreamPattern, LogLevel, ModeArgs, OutputFormat,
    PercentageArgs, PowerArgs, PowerState, WatchArgs,
};
pub use client::DeviceClient;
pub use codec::{
    AnimationKind, AnimationMode, ChipType, CodecError, ColorOrder, CommandFrame, DeviceStatus,
    Hsv, ModeTarget, Parameter, Percentage, Rgb, int_to_hex_byte, percentage_of,
};
pub use config::DeviceConfig;
pub use error::{ConfigError, DeviceError, TransportError};
pub use hw::{
    DEFAULT_PORT, DeviceTransport, FakeDevice, FakeDeviceConfig, TcpTransport, TcpTransportOptions,
};
pub use protocol::Opcode;
pub use sync::{AnimationSelection, CachedStatus, Freshness, LayoutChange, SyncEngine};
pub use terminal::{SystemTerminalClient, TerminalClient};

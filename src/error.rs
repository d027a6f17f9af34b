use std::path::PathBuf;

use derive_more::From;
use thiserror::Error;

use crate::codec::CodecError;

/// Errors returned by a single request/response exchange with the controller.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to connect to {address}")]
    Connect {
        address: String,
        source: std::io::Error,
    },
    #[error("failed to write command to {address}")]
    Write {
        address: String,
        source: std::io::Error,
    },
    #[error("failed to read response from {address}")]
    Read {
        address: String,
        source: std::io::Error,
    },
    #[error("{address} did not answer within {timeout_ms} ms")]
    Timeout { address: String, timeout_ms: u64 },
}

/// Errors returned when loading device configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file `{}`", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid device configuration")]
    Parse(#[from] serde_json::Error),
}

/// Errors returned when validating command-line backend options.
#[derive(Debug, Error)]
pub(crate) enum CliConfigError {
    #[error("no device host given; pass --host, set it in --config, or use --fake")]
    MissingHost,
}

/// Errors returned by telemetry initialisation.
#[derive(Debug, Error)]
pub(crate) enum TelemetryError {
    #[error("failed to install tracing subscriber")]
    Subscriber(#[from] tracing_subscriber::util::TryInitError),
}

/// Top-level device errors wrapping module-specific error types.
#[derive(Debug, Error, From)]
pub enum DeviceError {
    #[error(transparent)]
    #[from(CodecError, Box<CodecError>)]
    Codec(Box<CodecError>),
    #[error(transparent)]
    #[from(TransportError, Box<TransportError>)]
    Transport(Box<TransportError>),
    #[error(transparent)]
    #[from(ConfigError, Box<ConfigError>)]
    Config(Box<ConfigError>),
    /// No status has been read yet, or the cached one is older than the poll interval.
    #[error("device status is stale or unavailable")]
    StaleOrUnavailable,
}

impl DeviceError {
    /// Returns whether the error means the device could not be reached.
    ///
    /// Stale caches, connection failures and timeouts all collapse into this
    /// one signal; invalid arguments and configuration do not.
    #[must_use]
    pub fn is_communication_failure(&self) -> bool {
        matches!(self, Self::StaleOrUnavailable | Self::Transport(_))
    }
}

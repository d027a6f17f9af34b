use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::filter::LevelFilter;

use crate::app::DeviceTarget;
use crate::cli::control::{ColourArgs, DreamArgs, ModeArgs, PercentageArgs, PowerArgs};
use crate::cli::status::WatchArgs;
use crate::config::DeviceConfig;
use crate::error::CliConfigError;

const FAKE_HOST: &str = "fake";

/// Command-line options for the SP108E tool.
#[derive(Debug, Parser)]
#[command(name = "sp108e", about = "Control SP108E Wi-Fi LED strip controllers.")]
pub struct Args {
    /// Controller host name or IP address.
    #[arg(long, global = true)]
    host: Option<String>,
    /// Controller TCP port (default 8189).
    #[arg(long, global = true)]
    port: Option<u16>,
    /// JSON device configuration; `--host` and `--port` override its values.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Uses an in-memory fake controller instead of the network.
    #[arg(long, global = true, conflicts_with = "host")]
    fake: bool,
    /// Log verbosity; overrides `RUST_LOG`.
    #[arg(long, global = true, value_enum)]
    log_level: Option<LogLevel>,
    /// Output format; defaults to pretty on a terminal and JSON otherwise.
    #[arg(long, global = true, value_enum)]
    output_format: Option<OutputFormat>,
    #[command(subcommand)]
    command: Command,
}

impl Args {
    /// Creates argument values directly without CLI parsing.
    ///
    /// ```
    /// use sp108e::{Args, Command};
    ///
    /// let args = Args::new(Command::Status).with_fake();
    /// let _ = args;
    /// ```
    #[must_use]
    pub fn new(command: Command) -> Self {
        Self {
            host: None,
            port: None,
            config: None,
            fake: false,
            log_level: None,
            output_format: None,
            command,
        }
    }

    /// Targets a controller by host name or address.
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Targets the in-memory fake controller.
    #[must_use]
    pub fn with_fake(mut self) -> Self {
        self.fake = true;
        self
    }

    /// Returns the requested log level, if any.
    #[must_use]
    pub fn log_level(&self) -> Option<LogLevel> {
        self.log_level
    }

    /// Returns the requested output format, if any.
    #[must_use]
    pub fn output_format(&self) -> Option<OutputFormat> {
        self.output_format
    }

    /// Resolves the device configuration and splits off the command.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file cannot be loaded or no
    /// host is known outside fake mode.
    pub fn into_command_and_config(self) -> anyhow::Result<(Command, DeviceConfig, bool)> {
        let Args {
            host,
            port,
            config,
            fake,
            log_level: _,
            output_format: _,
            command,
        } = self;

        let mut resolved = match (config, host) {
            (Some(path), host) => {
                let loaded = DeviceConfig::from_json_file(&path)?;
                match host {
                    Some(host) => loaded.with_host(host),
                    None => loaded,
                }
            }
            (None, Some(host)) => DeviceConfig::builder().host(host).build(),
            (None, None) if fake => DeviceConfig::builder().host(FAKE_HOST).build(),
            (None, None) => return Err(CliConfigError::MissingHost.into()),
        };
        if let Some(port) = port {
            resolved = resolved.with_port(port);
        }

        Ok((command, resolved, fake))
    }

    /// Resolves the configuration and builds the matching transport.
    ///
    /// # Errors
    ///
    /// As for [`Args::into_command_and_config`].
    pub fn into_command_and_target(self) -> anyhow::Result<(Command, DeviceTarget)> {
        let (command, config, fake) = self.into_command_and_config()?;
        let target = if fake {
            DeviceTarget::fake(config)
        } else {
            DeviceTarget::tcp(config)
        };
        Ok((command, target))
    }
}

/// Supported CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Read the controller status once and print it.
    Status,
    /// Switch the strip on or off, or flip it.
    Power(PowerArgs),
    /// Set RGB brightness (0..=100 percent).
    Brightness(PercentageArgs),
    /// Set white-channel brightness (0..=100 percent).
    White(PercentageArgs),
    /// Set a static colour as six hex digits.
    Colour(ColourArgs),
    /// Set animation speed (0..=100 percent).
    Speed(PercentageArgs),
    /// Select a preset animation.
    Mode(ModeArgs),
    /// Select a dream-mode pattern (1..=180) or `auto`.
    Dream(DreamArgs),
    /// Write chip type, colour order and strip size where the device differs from the configuration.
    Setup,
    /// Poll the controller and print every refreshed status.
    Watch(WatchArgs),
}

impl Command {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::Power(_) => "power",
            Self::Brightness(_) => "brightness",
            Self::White(_) => "white",
            Self::Colour(_) => "colour",
            Self::Speed(_) => "speed",
            Self::Mode(_) => "mode",
            Self::Dream(_) => "dream",
            Self::Setup => "setup",
            Self::Watch(_) => "watch",
        }
    }
}

/// Log verbosity accepted by `--log-level`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub(crate) fn as_level_filter(self) -> LevelFilter {
        match self {
            Self::Error => LevelFilter::ERROR,
            Self::Warn => LevelFilter::WARN,
            Self::Info => LevelFilter::INFO,
            Self::Debug => LevelFilter::DEBUG,
            Self::Trace => LevelFilter::TRACE,
        }
    }
}

/// Output format accepted by `--output-format`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable tables.
    Pretty,
    /// One JSON object per line.
    Json,
}

pub(crate) fn parse_duration(value: &str) -> Result<Duration, String> {
    humantime::parse_duration(value).map_err(|error| error.to_string())
}

use std::io;

use anyhow::Result;
use tracing::instrument;

use crate::cli::control::{
    PercentageTarget, run_colour, run_dream, run_mode, run_percentage, run_power,
};
use crate::cli::status::{run_setup, run_status, run_watch, watch_interval};
use crate::cli::ui::Painter;
use crate::cli::{Command, LogLevel, OutputFormat};
use crate::client::DeviceClient;
use crate::config::DeviceConfig;
use crate::hw::{
    DeviceTransport, FakeDevice, TcpTransportOptions, TransportBackend, transport_from_backend,
};
use crate::sync::SyncEngine;
use crate::telemetry;
use crate::terminal::{SystemTerminalClient, TerminalClient};

/// A resolved device configuration paired with the transport that reaches it.
pub struct DeviceTarget {
    config: DeviceConfig,
    transport: Box<dyn DeviceTransport>,
}

impl DeviceTarget {
    /// Targets a device over an injected transport.
    ///
    /// ```
    /// use sp108e::{DeviceConfig, DeviceTarget, FakeDevice};
    ///
    /// let device = FakeDevice::default();
    /// let target = DeviceTarget::new(
    ///     DeviceConfig::builder().host("10.0.0.2").build(),
    ///     Box::new(device.clone()),
    /// );
    /// assert_eq!("10.0.0.2", target.config().host());
    /// ```
    #[must_use]
    pub fn new(config: DeviceConfig, transport: Box<dyn DeviceTransport>) -> Self {
        Self { config, transport }
    }

    /// Targets the configured host over TCP with default timeouts.
    #[must_use]
    pub fn tcp(config: DeviceConfig) -> Self {
        let transport = transport_from_backend(TransportBackend::Tcp {
            address: config.address(),
            options: TcpTransportOptions::default(),
        });
        Self::new(config, transport)
    }

    /// Targets a fresh in-memory fake controller.
    #[must_use]
    pub fn fake(config: DeviceConfig) -> Self {
        let transport = transport_from_backend(TransportBackend::Fake(FakeDevice::default()));
        Self::new(config, transport)
    }

    /// Replaces the transport, keeping the configuration.
    #[must_use]
    pub fn with_transport(self, transport: Box<dyn DeviceTransport>) -> Self {
        Self {
            config: self.config,
            transport,
        }
    }

    #[must_use]
    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }
}

impl std::fmt::Debug for DeviceTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceTarget")
            .field("config", &self.config)
            .field("peer", &self.transport.peer())
            .finish()
    }
}

/// Runs the CLI command against `target`.
///
/// ```
/// # async fn run() -> anyhow::Result<()> {
/// use clap::Parser;
///
/// let args = sp108e::Args::try_parse_from(["sp108e", "--fake", "status"])?;
/// let (command, target) = args.into_command_and_target()?;
/// let mut out = Vec::new();
/// sp108e::run(command, &mut out, target, sp108e::OutputFormat::Json).await?;
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns an error if tracing initialisation fails, the device exchange
/// fails, or output writing fails.
pub async fn run<W>(
    command: Command,
    out: &mut W,
    target: DeviceTarget,
    output_format: OutputFormat,
) -> Result<()>
where
    W: io::Write,
{
    run_with_log_level(command, out, target, None, output_format).await
}

/// Runs the CLI command with an explicit telemetry log-level override.
///
/// # Errors
///
/// As for [`run`].
pub async fn run_with_log_level<W>(
    command: Command,
    out: &mut W,
    target: DeviceTarget,
    log_level: Option<LogLevel>,
    output_format: OutputFormat,
) -> Result<()>
where
    W: io::Write,
{
    run_with_clients_and_log_level(
        command,
        out,
        &SystemTerminalClient,
        target,
        log_level,
        output_format,
    )
    .await
}

/// Runs the CLI command with an injected terminal and explicit telemetry settings.
///
/// ```
/// # async fn run() -> anyhow::Result<()> {
/// use clap::Parser;
///
/// struct FakeTerminal;
/// impl sp108e::TerminalClient for FakeTerminal {
///     fn stdout_is_terminal(&self) -> bool { false }
///     fn stderr_is_terminal(&self) -> bool { false }
/// }
///
/// let args = sp108e::Args::try_parse_from(["sp108e", "--fake", "power", "off"])?;
/// let log_level = args.log_level();
/// let (command, target) = args.into_command_and_target()?;
/// let mut out = Vec::new();
/// sp108e::run_with_clients_and_log_level(
///     command,
///     &mut out,
///     &FakeTerminal,
///     target,
///     log_level,
///     sp108e::OutputFormat::Pretty,
/// ).await?;
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// As for [`run`].
#[instrument(
    skip(out, terminal_client, target),
    level = "info",
    fields(command = command.name(), peer = %target.transport.peer(), ?log_level)
)]
pub async fn run_with_clients_and_log_level<W>(
    command: Command,
    out: &mut W,
    terminal_client: &dyn TerminalClient,
    target: DeviceTarget,
    log_level: Option<LogLevel>,
    output_format: OutputFormat,
) -> Result<()>
where
    W: io::Write,
{
    telemetry::initialise_tracing(
        terminal_client.stderr_is_terminal(),
        log_level.map(LogLevel::as_level_filter),
    )?;

    let painter = Painter::new(
        terminal_client.stdout_is_terminal() && output_format == OutputFormat::Pretty,
    );
    let DeviceTarget { config, transport } = target;
    let client = DeviceClient::new(transport);

    match command {
        Command::Status => run_status(&client, out, output_format, &painter).await,
        Command::Power(args) => run_power(&client, &args, out, output_format).await,
        Command::Brightness(args) => {
            run_percentage(&client, PercentageTarget::Brightness, &args, out, output_format).await
        }
        Command::White(args) => {
            run_percentage(&client, PercentageTarget::White, &args, out, output_format).await
        }
        Command::Speed(args) => {
            run_percentage(&client, PercentageTarget::Speed, &args, out, output_format).await
        }
        Command::Colour(args) => run_colour(&client, &args, out, output_format).await,
        Command::Mode(args) => run_mode(&client, &args, out, output_format).await,
        Command::Dream(args) => run_dream(&client, &args, out, output_format).await,
        Command::Setup => {
            let engine = SyncEngine::from_config(client, &config);
            run_setup(&engine, &config, out, output_format, &painter).await
        }
        Command::Watch(args) => {
            let engine = SyncEngine::new(client, watch_interval(&args, &config));
            run_watch(engine, &args, out, output_format, &painter).await
        }
    }
}

use std::io;
use std::time::Duration;

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tokio_stream::StreamExt;
use tracing::{info, instrument};

use crate::cli::OutputFormat;
use crate::cli::command::parse_duration;
use crate::cli::control::write_json_line;
use crate::cli::ui::{Painter, StatusView};
use crate::client::DeviceClient;
use crate::codec::{ChipType, ColorOrder, DeviceStatus, Hsv, Rgb};
use crate::config::DeviceConfig;
use crate::sync::{LayoutChange, SyncEngine};

/// Arguments for `watch`.
#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Poll interval, e.g. `500ms` or `2s`; defaults to the configured interval.
    #[arg(long, value_parser = parse_duration)]
    interval: Option<Duration>,
    /// Stop after this many updates; runs until Ctrl-C when omitted.
    #[arg(long)]
    count: Option<usize>,
}

impl WatchArgs {
    #[must_use]
    pub fn new(interval: Option<Duration>, count: Option<usize>) -> Self {
        Self { interval, count }
    }
}

/// Machine-readable form of one status read.
#[derive(Debug, Serialize)]
struct StatusReport {
    peer: String,
    on: bool,
    mode: String,
    mode_code: u8,
    animated: bool,
    speed: u8,
    speed_percentage: f64,
    brightness: u8,
    brightness_percentage: f64,
    colour: Rgb,
    hsv: Hsv,
    white_brightness: u8,
    white_brightness_percentage: f64,
    chip: Option<ChipType>,
    chip_index: u8,
    color_order: Option<ColorOrder>,
    color_order_index: u8,
    segments: u16,
    leds_per_segment: u16,
    recorded_patterns: u8,
    raw: String,
}

impl StatusReport {
    fn new(peer: String, status: &DeviceStatus) -> Self {
        Self {
            peer,
            on: status.is_on(),
            mode: status.animation_mode_name(),
            mode_code: status.animation_mode_code(),
            animated: status.animation_kind().is_animated(),
            speed: status.animation_speed(),
            speed_percentage: status.animation_speed_percentage(),
            brightness: status.brightness(),
            brightness_percentage: status.brightness_percentage(),
            colour: status.colour(),
            hsv: status.hsv(),
            white_brightness: status.white_brightness(),
            white_brightness_percentage: status.white_brightness_percentage(),
            chip: status.chip_type(),
            chip_index: status.chip_type_index(),
            color_order: status.color_order(),
            color_order_index: status.color_order_index(),
            segments: status.segment_count(),
            leds_per_segment: status.leds_per_segment(),
            recorded_patterns: status.recorded_patterns(),
            raw: status.raw_hex(),
        }
    }
}

#[derive(Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
enum SetupResult<'a> {
    Setup { changes: &'a [LayoutChange] },
}

fn write_status<W>(
    out: &mut W,
    peer: &str,
    status: &DeviceStatus,
    output_format: OutputFormat,
    painter: &Painter,
) -> Result<()>
where
    W: io::Write,
{
    match output_format {
        OutputFormat::Pretty => writeln!(out, "{}", StatusView::new(peer, status, painter))?,
        OutputFormat::Json => write_json_line(out, &StatusReport::new(peer.to_string(), status))?,
    }
    Ok(())
}

#[instrument(skip(client, out, painter), level = "info", fields(peer = %client.peer()))]
pub(crate) async fn run_status<W>(
    client: &DeviceClient,
    out: &mut W,
    output_format: OutputFormat,
    painter: &Painter,
) -> Result<()>
where
    W: io::Write,
{
    let status = client.get_status().await?;
    write_status(out, &client.peer(), &status, output_format, painter)
}

#[instrument(skip(engine, config, out, painter), level = "info", fields(chip = %config.chip()))]
pub(crate) async fn run_setup<W>(
    engine: &SyncEngine,
    config: &DeviceConfig,
    out: &mut W,
    output_format: OutputFormat,
    painter: &Painter,
) -> Result<()>
where
    W: io::Write,
{
    let changes = engine.apply_layout(config).await?;
    match output_format {
        OutputFormat::Pretty if changes.is_empty() => {
            writeln!(out, "{}", painter.muted("Layout already matches the configuration"))?;
        }
        OutputFormat::Pretty => {
            for change in &changes {
                writeln!(out, "{} {change}", painter.applied())?;
            }
        }
        OutputFormat::Json => write_json_line(out, &SetupResult::Setup { changes: &changes })?,
    }
    Ok(())
}

#[instrument(skip(engine, args, out, painter), level = "info", fields(interval = ?engine.poll_interval(), count = ?args.count))]
pub(crate) async fn run_watch<W>(
    mut engine: SyncEngine,
    args: &WatchArgs,
    out: &mut W,
    output_format: OutputFormat,
    painter: &Painter,
) -> Result<()>
where
    W: io::Write,
{
    let peer = engine.client().peer();
    let mut updates = engine.subscribe();
    engine.start_polling();

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut seen = 0_usize;
    let outcome = loop {
        if args.count.is_some_and(|count| seen >= count) {
            break Ok(());
        }
        let status = tokio::select! {
            next = updates.next() => match next {
                Some(status) => status,
                None => break Ok(()),
            },
            signal = &mut ctrl_c => {
                info!("interrupted; stopping watch");
                break signal.map_err(anyhow::Error::from);
            }
        };
        if let Err(error) = write_status(out, &peer, &status, output_format, painter) {
            break Err(error);
        }
        seen += 1;
    };

    engine.stop_polling().await;
    outcome
}

/// Poll interval for `watch`: the flag if given, otherwise the configured one.
pub(crate) fn watch_interval(args: &WatchArgs, config: &DeviceConfig) -> Duration {
    args.interval.unwrap_or_else(|| config.poll_interval())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn report_carries_decoded_and_raw_fields() -> anyhow::Result<()> {
        let status = DeviceStatus::from_hex("3801d380ff02003c0001ff6717030010ff")?;
        let report = serde_json::to_value(StatusReport::new("10.0.0.2:8189".into(), &status))?;

        assert_eq!(serde_json::json!(true), report["on"]);
        assert_eq!(serde_json::json!("STATIC"), report["mode"]);
        assert_eq!(serde_json::json!(false), report["animated"]);
        assert_eq!(serde_json::json!("ff6717"), report["colour"]);
        assert_eq!(serde_json::json!("WS2811"), report["chip"]);
        assert_eq!(serde_json::json!("GRB"), report["color_order"]);
        assert_eq!(serde_json::json!(60), report["leds_per_segment"]);
        assert_eq!(
            serde_json::json!("3801d380ff02003c0001ff6717030010ff"),
            report["raw"]
        );
        Ok(())
    }

    #[test]
    fn unknown_chip_serialises_as_null() -> anyhow::Result<()> {
        let status = DeviceStatus::from_hex("3801d380ff02003c0001ff6717630010ff")?;
        let report = serde_json::to_value(StatusReport::new("peer".into(), &status))?;
        assert_eq!(serde_json::Value::Null, report["chip"]);
        assert_eq!(serde_json::json!(99), report["chip_index"]);
        Ok(())
    }

    #[test]
    fn watch_interval_prefers_the_flag() {
        let config = DeviceConfig::builder().host("h").build();
        assert_eq!(
            Duration::from_millis(1000),
            watch_interval(&WatchArgs::new(None, None), &config)
        );
        assert_eq!(
            Duration::from_millis(250),
            watch_interval(&WatchArgs::new(Some(Duration::from_millis(250)), None), &config)
        );
    }
}

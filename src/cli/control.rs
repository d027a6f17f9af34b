use std::io;
use std::str::FromStr;

use anyhow::Result;
use clap::{Args, ValueEnum};
use serde::Serialize;
use tracing::instrument;

use crate::cli::OutputFormat;
use crate::client::DeviceClient;
use crate::codec::{AnimationMode, Percentage, Rgb};

const MIN_DREAM_PATTERN: u8 = 1;
const MAX_DREAM_PATTERN: u8 = 180;

/// JSON result emitted by a control command.
#[derive(Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
enum ControlResult {
    Power { state: String, on: bool },
    Brightness { percentage: u8, raw: u8 },
    White { percentage: u8, raw: u8 },
    Colour { colour: Rgb },
    Speed { percentage: u8, raw: u8 },
    Mode { mode: AnimationMode },
    Dream { pattern: String },
}

/// Requested power change.
#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
pub enum PowerState {
    /// Turn the strip on (no-op when already on).
    On,
    /// Turn the strip off (no-op when already off).
    Off,
    /// Flip the current state.
    Toggle,
}

impl std::fmt::Display for PowerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::On => write!(f, "on"),
            Self::Off => write!(f, "off"),
            Self::Toggle => write!(f, "toggle"),
        }
    }
}

/// Arguments for `power`.
#[derive(Debug, Args)]
pub struct PowerArgs {
    #[arg(value_enum)]
    state: PowerState,
}

impl PowerArgs {
    #[must_use]
    pub fn new(state: PowerState) -> Self {
        Self { state }
    }
}

/// Arguments for commands that take a percentage.
#[derive(Debug, Args)]
pub struct PercentageArgs {
    #[arg(value_parser = parse_percentage)]
    percentage: Percentage,
}

impl PercentageArgs {
    /// Creates percentage arguments.
    ///
    /// ```
    /// use sp108e::PercentageArgs;
    ///
    /// let args = PercentageArgs::new(75)?;
    /// assert_eq!(75, args.value());
    /// # Ok::<(), sp108e::CodecError>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error when `value` is above 100.
    pub fn new(value: u8) -> Result<Self, crate::CodecError> {
        Ok(Self {
            percentage: Percentage::new(value)?,
        })
    }

    #[must_use]
    pub fn value(&self) -> u8 {
        self.percentage.value()
    }
}

/// Arguments for `colour`.
#[derive(Debug, Args)]
pub struct ColourArgs {
    /// Colour as `rrggbb`, with or without a leading `#`.
    colour: Rgb,
}

impl ColourArgs {
    #[must_use]
    pub fn new(colour: Rgb) -> Self {
        Self { colour }
    }
}

/// Arguments for `mode`.
#[derive(Debug, Args)]
pub struct ModeArgs {
    /// Preset name, e.g. `static`, `meteor`, `breathing`.
    mode: AnimationMode,
}

impl ModeArgs {
    #[must_use]
    pub fn new(mode: AnimationMode) -> Self {
        Self { mode }
    }
}

/// Dream-mode pattern selection.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DreamPattern {
    /// Cycle through patterns automatically.
    Auto,
    /// One pattern, numbered from one.
    Pattern(u8),
}

impl FromStr for DreamPattern {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.eq_ignore_ascii_case("auto") {
            return Ok(Self::Auto);
        }
        let pattern = value
            .parse::<u8>()
            .map_err(|_| format!("expected `auto` or a pattern number, got `{value}`"))?;
        if !(MIN_DREAM_PATTERN..=MAX_DREAM_PATTERN).contains(&pattern) {
            return Err(format!(
                "pattern {pattern} is out of range ({MIN_DREAM_PATTERN}..={MAX_DREAM_PATTERN})"
            ));
        }
        Ok(Self::Pattern(pattern))
    }
}

impl std::fmt::Display for DreamPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Pattern(pattern) => write!(f, "{pattern}"),
        }
    }
}

/// Arguments for `dream`.
#[derive(Debug, Args)]
pub struct DreamArgs {
    /// Pattern number (1..=180) or `auto`.
    pattern: DreamPattern,
}

impl DreamArgs {
    #[must_use]
    pub fn new(pattern: DreamPattern) -> Self {
        Self { pattern }
    }
}

fn parse_percentage(value: &str) -> Result<Percentage, String> {
    let parsed = value.parse::<u8>().map_err(|error| error.to_string())?;
    Percentage::new(parsed).map_err(|error| error.to_string())
}

#[instrument(skip(client, args, out), level = "info", fields(state = %args.state))]
pub(crate) async fn run_power<W>(
    client: &DeviceClient,
    args: &PowerArgs,
    out: &mut W,
    output_format: OutputFormat,
) -> Result<()>
where
    W: io::Write,
{
    let state = args.state;
    let on = match state {
        PowerState::On => {
            client.on().await?;
            true
        }
        PowerState::Off => {
            client.off().await?;
            false
        }
        PowerState::Toggle => client.toggle_on_off().await?.is_on(),
    };
    match output_format {
        OutputFormat::Pretty => {
            writeln!(out, "Applied power {state}: strip is {}", if on { "on" } else { "off" })?;
        }
        OutputFormat::Json => write_json_line(
            out,
            &ControlResult::Power {
                state: state.to_string(),
                on,
            },
        )?,
    }
    Ok(())
}

/// Which byte a percentage command drives.
#[derive(Debug, Clone, Copy)]
pub(crate) enum PercentageTarget {
    Brightness,
    White,
    Speed,
}

#[instrument(skip(client, args, out), level = "info", fields(?target, percentage = args.value()))]
pub(crate) async fn run_percentage<W>(
    client: &DeviceClient,
    target: PercentageTarget,
    args: &PercentageArgs,
    out: &mut W,
    output_format: OutputFormat,
) -> Result<()>
where
    W: io::Write,
{
    let percentage = args.percentage;
    let (label, result) = match target {
        PercentageTarget::Brightness => {
            client.set_brightness_percentage(percentage).await?;
            (
                "brightness",
                ControlResult::Brightness {
                    percentage: percentage.value(),
                    raw: percentage.to_raw(),
                },
            )
        }
        PercentageTarget::White => {
            client.set_white_brightness_percentage(percentage).await?;
            (
                "white brightness",
                ControlResult::White {
                    percentage: percentage.value(),
                    raw: percentage.to_raw().max(1),
                },
            )
        }
        PercentageTarget::Speed => {
            client.set_animation_speed_percentage(percentage).await?;
            (
                "animation speed",
                ControlResult::Speed {
                    percentage: percentage.value(),
                    raw: percentage.to_raw(),
                },
            )
        }
    };
    match output_format {
        OutputFormat::Pretty => writeln!(out, "Applied {label}: {}%", percentage.value())?,
        OutputFormat::Json => write_json_line(out, &result)?,
    }
    Ok(())
}

#[instrument(skip(client, args, out), level = "info", fields(colour = %args.colour))]
pub(crate) async fn run_colour<W>(
    client: &DeviceClient,
    args: &ColourArgs,
    out: &mut W,
    output_format: OutputFormat,
) -> Result<()>
where
    W: io::Write,
{
    client.set_color(args.colour).await?;
    match output_format {
        OutputFormat::Pretty => writeln!(out, "Applied colour: #{}", args.colour)?,
        OutputFormat::Json => write_json_line(
            out,
            &ControlResult::Colour {
                colour: args.colour,
            },
        )?,
    }
    Ok(())
}

#[instrument(skip(client, args, out), level = "info", fields(mode = %args.mode))]
pub(crate) async fn run_mode<W>(
    client: &DeviceClient,
    args: &ModeArgs,
    out: &mut W,
    output_format: OutputFormat,
) -> Result<()>
where
    W: io::Write,
{
    client.set_animation_mode(args.mode).await?;
    match output_format {
        OutputFormat::Pretty => writeln!(out, "Applied animation: {}", args.mode)?,
        OutputFormat::Json => write_json_line(out, &ControlResult::Mode { mode: args.mode })?,
    }
    Ok(())
}

#[instrument(skip(client, args, out), level = "info", fields(pattern = %args.pattern))]
pub(crate) async fn run_dream<W>(
    client: &DeviceClient,
    args: &DreamArgs,
    out: &mut W,
    output_format: OutputFormat,
) -> Result<()>
where
    W: io::Write,
{
    match args.pattern {
        DreamPattern::Auto => client.set_dream_mode_auto().await?,
        DreamPattern::Pattern(pattern) => client.set_dream_mode(pattern).await?,
    }
    match output_format {
        OutputFormat::Pretty => writeln!(out, "Applied dream mode: {}", args.pattern)?,
        OutputFormat::Json => write_json_line(
            out,
            &ControlResult::Dream {
                pattern: args.pattern.to_string(),
            },
        )?,
    }
    Ok(())
}

pub(crate) fn write_json_line<W, T>(out: &mut W, value: &T) -> Result<()>
where
    W: io::Write,
    T: Serialize,
{
    serde_json::to_writer(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("auto", Ok(DreamPattern::Auto))]
    #[case("AUTO", Ok(DreamPattern::Auto))]
    #[case("1", Ok(DreamPattern::Pattern(1)))]
    #[case("180", Ok(DreamPattern::Pattern(180)))]
    #[case("0", Err("pattern 0 is out of range (1..=180)".to_string()))]
    #[case("181", Err("pattern 181 is out of range (1..=180)".to_string()))]
    #[case("soon", Err("expected `auto` or a pattern number, got `soon`".to_string()))]
    fn dream_pattern_parses(#[case] input: &str, #[case] expected: Result<DreamPattern, String>) {
        assert_eq!(expected, input.parse::<DreamPattern>());
    }

    #[test]
    fn percentage_parser_rejects_out_of_range() {
        assert_eq!(
            Err("percentage 101 is out of range (0..=100)".to_string()),
            parse_percentage("101")
        );
        assert!(parse_percentage("-1").is_err());
    }

    #[test]
    fn json_results_are_tagged_by_action() -> anyhow::Result<()> {
        let mut out = Vec::new();
        write_json_line(
            &mut out,
            &ControlResult::Brightness {
                percentage: 50,
                raw: 128,
            },
        )?;
        assert_eq!(
            "{\"action\":\"brightness\",\"percentage\":50,\"raw\":128}\n",
            String::from_utf8(out)?
        );
        Ok(())
    }
}

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::Parser;
use clap::error::ErrorKind;
use insta::assert_snapshot;
use pretty_assertions::assert_eq;
use sp108e::{DeviceStatus, FakeDevice, Opcode};

#[derive(Debug, Default)]
struct FakeTerminalClient;

impl sp108e::TerminalClient for FakeTerminalClient {
    fn stdout_is_terminal(&self) -> bool {
        false
    }

    fn stderr_is_terminal(&self) -> bool {
        false
    }
}

/// Static warm white on a WS2811/GRB strip, one segment of 60 LEDs.
const STATIC_ON: &str = "3801d380ff02003c0001ff6717030010ff";
/// Same strip, off and showing dream pattern 1.
const DREAM_OFF: &str = "380000800002003c0001ff6717030010ff";

async fn run_against<const N: usize>(
    device: &FakeDevice,
    argv: [&str; N],
    output_format: sp108e::OutputFormat,
) -> anyhow::Result<String> {
    let args = sp108e::Args::try_parse_from(argv)?;
    let (command, target) = args.into_command_and_target()?;
    let target = target.with_transport(Box::new(device.clone()));

    let mut output = Vec::new();
    sp108e::run_with_clients_and_log_level(
        command,
        &mut output,
        &FakeTerminalClient,
        target,
        None,
        output_format,
    )
    .await?;
    Ok(String::from_utf8(output)?)
}

fn device_with(hex: &str) -> anyhow::Result<FakeDevice> {
    Ok(FakeDevice::with_status(DeviceStatus::from_hex(hex)?))
}

fn temp_config(contents: &str) -> anyhow::Result<PathBuf> {
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH)?.as_nanos();
    let path = std::env::temp_dir().join(format!("sp108e-config-{nanos}.json"));
    std::fs::write(&path, contents)?;
    Ok(path)
}

#[tokio::test]
async fn status_command_prints_json_report() -> anyhow::Result<()> {
    let device = device_with(STATIC_ON)?;

    let stdout = run_against(&device, ["sp108e", "--fake", "status"], sp108e::OutputFormat::Json)
        .await?;
    let report: serde_json::Value = serde_json::from_str(stdout.trim_end())?;

    assert_eq!(serde_json::json!("fake-sp108e"), report["peer"]);
    assert_eq!(serde_json::json!(true), report["on"]);
    assert_eq!(serde_json::json!("STATIC"), report["mode"]);
    assert_eq!(serde_json::json!(255), report["brightness"]);
    assert_eq!(serde_json::json!(STATIC_ON), report["raw"]);
    assert_eq!(vec![Opcode::GetStatus], device.sent_opcodes());
    Ok(())
}

#[tokio::test]
async fn status_command_prints_plain_table_without_a_terminal() -> anyhow::Result<()> {
    let device = device_with(STATIC_ON)?;

    let stdout = run_against(&device, ["sp108e", "--fake", "status"], sp108e::OutputFormat::Pretty)
        .await?;

    assert!(stdout.starts_with("SP108E at fake-sp108e\n"));
    assert!(stdout.contains("WS2811"));
    assert!(!stdout.contains('\u{1b}'), "no ANSI escapes expected: {stdout}");
    Ok(())
}

#[tokio::test]
async fn power_off_toggles_once() -> anyhow::Result<()> {
    let device = device_with(STATIC_ON)?;

    let stdout = run_against(
        &device,
        ["sp108e", "--fake", "power", "off"],
        sp108e::OutputFormat::Json,
    )
    .await?;

    assert_snapshot!(stdout.trim_end(), @r#"{"action":"power","state":"off","on":false}"#);
    assert_eq!(vec![Opcode::GetStatus, Opcode::Toggle], device.sent_opcodes());
    assert!(!device.status().is_on());
    Ok(())
}

#[tokio::test]
async fn power_on_when_already_on_sends_no_toggle() -> anyhow::Result<()> {
    let device = device_with(STATIC_ON)?;

    let stdout = run_against(
        &device,
        ["sp108e", "--fake", "power", "on"],
        sp108e::OutputFormat::Pretty,
    )
    .await?;

    assert_snapshot!(stdout.trim_end(), @"Applied power on: strip is on");
    assert_eq!(vec![Opcode::GetStatus], device.sent_opcodes());
    Ok(())
}

#[tokio::test]
async fn brightness_percentage_rounds_up() -> anyhow::Result<()> {
    let device = device_with(STATIC_ON)?;

    let stdout = run_against(
        &device,
        ["sp108e", "--fake", "brightness", "50"],
        sp108e::OutputFormat::Json,
    )
    .await?;

    assert_snapshot!(stdout.trim_end(), @r#"{"action":"brightness","percentage":50,"raw":128}"#);
    assert_eq!(128, device.status().brightness());
    Ok(())
}

#[tokio::test]
async fn colour_switches_dream_mode_to_static_first() -> anyhow::Result<()> {
    let device = device_with(DREAM_OFF)?;

    run_against(
        &device,
        ["sp108e", "--fake", "colour", "#00ff7f"],
        sp108e::OutputFormat::Json,
    )
    .await?;

    assert_eq!(
        vec![Opcode::GetStatus, Opcode::SetMode, Opcode::SetColor],
        device.sent_opcodes()
    );
    let status = device.status();
    assert_eq!(0xd3, status.animation_mode_code());
    assert_eq!("00ff7f", status.colour().to_string());
    Ok(())
}

#[tokio::test]
async fn mode_and_dream_commands_write_the_mode_byte() -> anyhow::Result<()> {
    let device = device_with(STATIC_ON)?;

    let stdout = run_against(
        &device,
        ["sp108e", "--fake", "mode", "meteor"],
        sp108e::OutputFormat::Pretty,
    )
    .await?;
    assert_snapshot!(stdout.trim_end(), @"Applied animation: METEOR");
    assert_eq!(0xcd, device.status().animation_mode_code());

    run_against(
        &device,
        ["sp108e", "--fake", "dream", "5"],
        sp108e::OutputFormat::Json,
    )
    .await?;
    assert_eq!(4, device.status().animation_mode_code());
    Ok(())
}

#[test]
fn dream_pattern_out_of_range_is_rejected_by_the_parser() {
    let error = sp108e::Args::try_parse_from(["sp108e", "--fake", "dream", "181"])
        .expect_err("pattern 181 should be rejected");
    assert_eq!(ErrorKind::ValueValidation, error.kind());
}

#[test]
fn percentage_above_100_is_rejected_by_the_parser() {
    let error = sp108e::Args::try_parse_from(["sp108e", "--fake", "white", "101"])
        .expect_err("101 percent should be rejected");
    assert_eq!(ErrorKind::ValueValidation, error.kind());
}

#[tokio::test]
async fn setup_writes_only_differing_layout_fields() -> anyhow::Result<()> {
    let device = device_with(STATIC_ON)?;
    let config = temp_config(r#"{ "host": "fake", "chip": "SK6812_RGBW", "segments": 2 }"#)?;
    let config_arg = config.display().to_string();

    let stdout = run_against(
        &device,
        ["sp108e", "--fake", "--config", config_arg.as_str(), "setup"],
        sp108e::OutputFormat::Json,
    )
    .await;
    std::fs::remove_file(&config)?;

    assert_snapshot!(
        stdout?.trim_end(),
        @r#"{"action":"setup","changes":[{"field":"chip_type","value":"SK6812_RGBW"},{"field":"segments","value":2}]}"#
    );
    assert_eq!(
        vec![Opcode::GetStatus, Opcode::SetChipType, Opcode::SetSegments],
        device.sent_opcodes()
    );
    assert_eq!(2, device.status().segment_count());
    Ok(())
}

#[tokio::test]
async fn setup_reports_when_nothing_changes() -> anyhow::Result<()> {
    let device = device_with(STATIC_ON)?;

    let stdout = run_against(&device, ["sp108e", "--fake", "setup"], sp108e::OutputFormat::Pretty)
        .await?;

    assert_snapshot!(stdout.trim_end(), @"Layout already matches the configuration");
    assert_eq!(vec![Opcode::GetStatus], device.sent_opcodes());
    Ok(())
}

#[tokio::test]
async fn watch_prints_the_requested_number_of_updates() -> anyhow::Result<()> {
    let device = device_with(STATIC_ON)?;

    let stdout = run_against(
        &device,
        [
            "sp108e",
            "--fake",
            "watch",
            "--interval",
            "10ms",
            "--count",
            "2",
        ],
        sp108e::OutputFormat::Json,
    )
    .await?;

    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(2, lines.len());
    for line in lines {
        let report: serde_json::Value = serde_json::from_str(line)?;
        assert_eq!(serde_json::json!(true), report["on"]);
    }
    Ok(())
}

#[tokio::test]
async fn unreachable_device_surfaces_a_transport_error() -> anyhow::Result<()> {
    let device = device_with(STATIC_ON)?;
    device.fail_next(1);

    let error = run_against(&device, ["sp108e", "--fake", "status"], sp108e::OutputFormat::Json)
        .await
        .expect_err("failed exchange should surface");

    assert_eq!("failed to connect to fake-sp108e", error.to_string());
    Ok(())
}

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bon::Builder;
use parking_lot::Mutex;
use tokio::time::sleep;
use tracing::{debug, instrument};

use super::transport::DeviceTransport;
use crate::codec::{CommandFrame, DeviceStatus};
use crate::error::TransportError;
use crate::protocol::{Opcode, STATUS_RESPONSE_LEN};
use crate::utils::format_hex;

const FAKE_PEER: &str = "fake-sp108e";

/// Powered-on, static warm white, WS2811/GRB, one segment of 60 LEDs.
const DEFAULT_STATUS: [u8; STATUS_RESPONSE_LEN] = [
    0x38, 0x01, 0xd3, 0x80, 0xff, 0x02, 0x00, 0x3c, 0x00, 0x01, 0xff, 0x67, 0x17, 0x03, 0x00,
    0x10, 0xff,
];

const POWER_BYTE: usize = 1;
const MODE_BYTE: usize = 2;
const SPEED_BYTE: usize = 3;
const BRIGHTNESS_BYTE: usize = 4;
const COLOR_ORDER_BYTE: usize = 5;
const LEDS_PER_SEGMENT_BYTES: usize = 6;
const SEGMENTS_BYTES: usize = 8;
const COLOUR_BYTES: usize = 10;
const CHIP_TYPE_BYTE: usize = 13;
const WHITE_BRIGHTNESS_BYTE: usize = 15;

/// Settings for constructing a fake device.
#[derive(Debug, Clone, Builder)]
pub struct FakeDeviceConfig {
    /// Status block the device starts with.
    initial_status: Option<DeviceStatus>,
    /// Delay before every reply.
    #[builder(default)]
    latency: Duration,
    /// Pause after every command that expects no reply.
    #[builder(default)]
    write_cooldown: Duration,
}

impl Default for FakeDeviceConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[derive(Debug)]
struct FakeState {
    status: [u8; STATUS_RESPONSE_LEN],
    sent: Vec<CommandFrame>,
    failures_remaining: usize,
}

/// In-memory SP108E used by tests and the `--fake` command-line flag.
///
/// Writes are applied to a simulated status block so later status reads
/// observe them. Clones share state, which lets a test keep a handle while
/// the client owns another.
#[derive(Debug, Clone)]
pub struct FakeDevice {
    state: Arc<Mutex<FakeState>>,
    latency: Duration,
    write_cooldown: Duration,
}

impl FakeDevice {
    /// Creates a fake device from explicit settings.
    #[must_use]
    pub fn new(config: FakeDeviceConfig) -> Self {
        let status = config
            .initial_status
            .map_or(DEFAULT_STATUS, |status| *status.raw());
        Self {
            state: Arc::new(Mutex::new(FakeState {
                status,
                sent: Vec::new(),
                failures_remaining: 0,
            })),
            latency: config.latency,
            write_cooldown: config.write_cooldown,
        }
    }

    /// Creates a fake device reporting `status`.
    #[must_use]
    pub fn with_status(status: DeviceStatus) -> Self {
        Self::new(FakeDeviceConfig::builder().initial_status(status).build())
    }

    /// Current simulated status.
    #[must_use]
    pub fn status(&self) -> DeviceStatus {
        DeviceStatus::from(self.state.lock().status)
    }

    /// Replaces the simulated status, as if changed from another controller app.
    pub fn set_status(&self, status: DeviceStatus) {
        self.state.lock().status = *status.raw();
    }

    /// Every frame the device accepted, oldest first.
    #[must_use]
    pub fn sent_frames(&self) -> Vec<CommandFrame> {
        self.state.lock().sent.clone()
    }

    /// Opcodes of every accepted frame, oldest first.
    #[must_use]
    pub fn sent_opcodes(&self) -> Vec<Opcode> {
        self.state
            .lock()
            .sent
            .iter()
            .map(CommandFrame::opcode)
            .collect()
    }

    /// Forgets the accepted-frame log.
    pub fn clear_sent_frames(&self) {
        self.state.lock().sent.clear();
    }

    /// Makes the next `count` exchanges fail with a refused connection.
    pub fn fail_next(&self, count: usize) {
        self.state.lock().failures_remaining = count;
    }

    fn accept(&self, frame: CommandFrame) -> Result<[u8; STATUS_RESPONSE_LEN], TransportError> {
        let mut state = self.state.lock();
        if state.failures_remaining > 0 {
            state.failures_remaining -= 1;
            return Err(TransportError::Connect {
                address: FAKE_PEER.to_string(),
                source: std::io::Error::from(std::io::ErrorKind::ConnectionRefused),
            });
        }
        state.sent.push(frame);
        apply(&mut state.status, frame);
        Ok(state.status)
    }
}

impl Default for FakeDevice {
    fn default() -> Self {
        Self::new(FakeDeviceConfig::default())
    }
}

#[async_trait]
impl DeviceTransport for FakeDevice {
    #[instrument(
        skip(self, frame),
        level = "debug",
        fields(frame = %format_hex(&frame.to_bytes()))
    )]
    async fn send(
        &self,
        frame: CommandFrame,
        response_len: usize,
    ) -> Result<Vec<u8>, TransportError> {
        if !self.latency.is_zero() {
            sleep(self.latency).await;
        }
        let status = self.accept(frame)?;
        debug!(opcode = %frame.opcode(), "fake device accepted frame");

        if response_len == 0 {
            if !self.write_cooldown.is_zero() {
                sleep(self.write_cooldown).await;
            }
            return Ok(Vec::new());
        }
        Ok(status.iter().copied().take(response_len).collect())
    }

    fn peer(&self) -> String {
        FAKE_PEER.to_string()
    }
}

fn apply(status: &mut [u8; STATUS_RESPONSE_LEN], frame: CommandFrame) {
    let [first, second, third] = frame.parameter().bytes();
    match frame.opcode() {
        Opcode::Toggle => status[POWER_BYTE] = u8::from(status[POWER_BYTE] != 0x01),
        Opcode::SetMode => status[MODE_BYTE] = first,
        Opcode::SetSpeed => status[SPEED_BYTE] = first,
        Opcode::SetBrightness => status[BRIGHTNESS_BYTE] = first,
        Opcode::SetWhiteBrightness => status[WHITE_BRIGHTNESS_BYTE] = first,
        Opcode::SetColorOrder => status[COLOR_ORDER_BYTE] = first,
        Opcode::SetChipType => status[CHIP_TYPE_BYTE] = first,
        Opcode::SetColor => {
            status[COLOUR_BYTES..COLOUR_BYTES + 3].copy_from_slice(&[first, second, third]);
        }
        Opcode::SetLedsPerSegment => {
            let count = count_from_parameter(frame);
            status[LEDS_PER_SEGMENT_BYTES..LEDS_PER_SEGMENT_BYTES + 2]
                .copy_from_slice(&count.to_be_bytes());
        }
        Opcode::SetSegments => {
            let count = count_from_parameter(frame);
            status[SEGMENTS_BYTES..SEGMENTS_BYTES + 2].copy_from_slice(&count.to_be_bytes());
        }
        // Auto cycling reports the first dream pattern.
        Opcode::SetDreamModeAuto => status[MODE_BYTE] = 0x00,
        Opcode::GetName | Opcode::GetStatus => {}
    }
}

/// Reads back a count encoded as right-padded natural-width hex.
///
/// The padding is indistinguishable from trailing zero digits (`0x10`,
/// `0x100` and `0x1000` all arrive as `100000`), so the shortest reading of
/// at least one byte is taken.
fn count_from_parameter(frame: CommandFrame) -> u16 {
    let digits = hex::encode(frame.parameter().bytes());
    let trimmed = digits.trim_end_matches('0');
    let significant = if trimmed.len() < 2 { &digits[..2] } else { trimmed };
    u16::from_str_radix(significant, 16).unwrap_or(u16::MAX)
}

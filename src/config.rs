use std::path::Path;
use std::time::Duration;

use bon::Builder;
use serde::{Deserialize, Serialize};
use serde_with::{DurationMilliSeconds, serde_as};

use crate::codec::{ChipType, ColorOrder};
use crate::error::ConfigError;
use crate::hw::DEFAULT_PORT;

const DEFAULT_NAME: &str = "SP108E";
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);
const DEFAULT_CHIP: ChipType = ChipType::Ws2811;
const DEFAULT_COLOR_ORDER: ColorOrder = ColorOrder::Grb;
const DEFAULT_SEGMENTS: u16 = 1;
const DEFAULT_LEDS_PER_SEGMENT: u16 = 60;

/// Connection and strip layout for one controller.
///
/// Chip type and colour order are resolved when the configuration is
/// loaded, so an unknown name fails here rather than on the first write.
///
/// ```
/// use sp108e::{ChipType, DeviceConfig};
///
/// let config = DeviceConfig::from_json_str(r#"{ "host": "10.0.0.2", "chip": "SK6812_RGBW" }"#)?;
/// assert_eq!("10.0.0.2:8189", config.address());
/// assert_eq!(ChipType::Sk6812Rgbw, config.chip());
/// assert!(config.has_white_channel());
/// # Ok::<(), sp108e::ConfigError>(())
/// ```
#[serde_as]
#[derive(Debug, Clone, Eq, PartialEq, Builder, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceConfig {
    #[builder(into, default = DEFAULT_NAME.to_string())]
    #[serde(default = "default_name")]
    name: String,
    #[builder(into)]
    host: String,
    #[builder(default = DEFAULT_PORT)]
    #[serde(default = "default_port")]
    port: u16,
    #[builder(default = DEFAULT_CHIP)]
    #[serde(default = "default_chip")]
    chip: ChipType,
    #[builder(default = DEFAULT_COLOR_ORDER)]
    #[serde(default = "default_color_order")]
    color_order: ColorOrder,
    #[builder(default = DEFAULT_SEGMENTS)]
    #[serde(default = "default_segments")]
    segments: u16,
    #[builder(default = DEFAULT_LEDS_PER_SEGMENT)]
    #[serde(default = "default_leds_per_segment")]
    leds_per_segment: u16,
    #[builder(default = DEFAULT_POLL_INTERVAL)]
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(default = "default_poll_interval")]
    poll_interval: Duration,
}

impl DeviceConfig {
    /// Parses a JSON configuration object.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the JSON is malformed, `host` is
    /// missing, or a chip type or colour order is not in its table.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when the file cannot be read, otherwise
    /// the same errors as [`DeviceConfig::from_json_str`].
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Replaces the host.
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Replaces the port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// `host:port` as passed to the TCP transport.
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    #[must_use]
    pub fn chip(&self) -> ChipType {
        self.chip
    }

    #[must_use]
    pub fn color_order(&self) -> ColorOrder {
        self.color_order
    }

    #[must_use]
    pub fn segments(&self) -> u16 {
        self.segments
    }

    #[must_use]
    pub fn leds_per_segment(&self) -> u16 {
        self.leds_per_segment
    }

    /// How often the sync engine polls, and how old a cached status may get.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Whether the configured chip drives a separate white channel.
    #[must_use]
    pub fn has_white_channel(&self) -> bool {
        self.chip.has_white_channel()
    }
}

fn default_name() -> String {
    DEFAULT_NAME.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_chip() -> ChipType {
    DEFAULT_CHIP
}

fn default_color_order() -> ColorOrder {
    DEFAULT_COLOR_ORDER
}

fn default_segments() -> u16 {
    DEFAULT_SEGMENTS
}

fn default_leds_per_segment() -> u16 {
    DEFAULT_LEDS_PER_SEGMENT
}

fn default_poll_interval() -> Duration {
    DEFAULT_POLL_INTERVAL
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn minimal_json_uses_defaults() {
        let config = DeviceConfig::from_json_str(r#"{ "host": "192.168.4.1" }"#)
            .expect("minimal config should parse");
        let expected = DeviceConfig::builder().host("192.168.4.1").build();
        assert_eq!(expected, config);
        assert_eq!(8189, config.port());
        assert_eq!(Duration::from_millis(1000), config.poll_interval());
        assert_eq!(ChipType::Ws2811, config.chip());
        assert_eq!(ColorOrder::Grb, config.color_order());
        assert!(!config.has_white_channel());
    }

    #[test]
    fn full_json_uses_camel_case_keys() {
        let config = DeviceConfig::from_json_str(
            r#"{
                "name": "Kitchen",
                "host": "10.0.0.7",
                "port": 9000,
                "chip": "SK6812_RGBW",
                "colorOrder": "RGB",
                "segments": 2,
                "ledsPerSegment": 150,
                "pollInterval": 2500
            }"#,
        )
        .expect("full config should parse");

        assert_eq!("Kitchen", config.name());
        assert_eq!("10.0.0.7:9000", config.address());
        assert_eq!(ChipType::Sk6812Rgbw, config.chip());
        assert_eq!(ColorOrder::Rgb, config.color_order());
        assert_eq!(2, config.segments());
        assert_eq!(150, config.leds_per_segment());
        assert_eq!(Duration::from_millis(2500), config.poll_interval());
        assert!(config.has_white_channel());
    }

    #[test]
    fn unknown_chip_fails_at_load_time() {
        let result = DeviceConfig::from_json_str(r#"{ "host": "h", "chip": "NOT_A_CHIP" }"#);
        assert_matches!(result, Err(ConfigError::Parse(_)));
    }

    #[test]
    fn missing_host_is_rejected() {
        assert_matches!(
            DeviceConfig::from_json_str(r#"{ "port": 8189 }"#),
            Err(ConfigError::Parse(_))
        );
    }

    #[test]
    fn missing_file_reports_path() {
        let error = DeviceConfig::from_json_file("/nonexistent/sp108e.json")
            .expect_err("missing file should fail");
        assert_matches!(error, ConfigError::Read { ref path, .. } if path.ends_with("sp108e.json"));
    }
}

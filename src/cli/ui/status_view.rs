use std::fmt::{self, Display, Formatter};

use crate::codec::DeviceStatus;
use crate::utils::format_percentage;

use super::painter::Painter;
use super::table::Table;

/// Renders a controller status as a key-value table under a heading.
pub(crate) struct StatusView<'a> {
    peer: &'a str,
    status: &'a DeviceStatus,
    painter: &'a Painter,
}

impl<'a> StatusView<'a> {
    pub(crate) fn new(peer: &'a str, status: &'a DeviceStatus, painter: &'a Painter) -> Self {
        Self {
            peer,
            status,
            painter,
        }
    }

    fn mode(&self) -> String {
        let name = self.status.animation_mode_name();
        let code = self.status.animation_mode_code();
        if name == "Unknown" {
            self.painter.unknown(format_args!("0x{code:02x}"))
        } else {
            self.painter.value(name)
        }
    }

    fn chip(&self) -> String {
        match self.status.chip_type() {
            Some(chip) => self.painter.value(chip.to_string()),
            None => self.painter.unknown(self.status.chip_type_index()),
        }
    }

    fn color_order(&self) -> String {
        match self.status.color_order() {
            Some(order) => self.painter.value(order.to_string()),
            None => self.painter.unknown(self.status.color_order_index()),
        }
    }
}

impl Display for StatusView<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let status = self.status;
        let painter = self.painter;
        let mut rows = vec![
            ("power", painter.power(status.is_on())),
            ("mode", self.mode()),
            (
                "speed",
                painter.value(format_percentage(status.animation_speed_percentage())),
            ),
            (
                "brightness",
                painter.value(format_percentage(status.brightness_percentage())),
            ),
            ("colour", painter.value(format!("#{}", status.colour()))),
        ];
        if status.chip_type().is_some_and(|chip| chip.has_white_channel()) {
            rows.push((
                "white",
                painter.value(format_percentage(status.white_brightness_percentage())),
            ));
        }
        rows.extend([
            ("chip", self.chip()),
            ("colour_order", self.color_order()),
            ("segments", painter.value(status.segment_count().to_string())),
            (
                "leds_per_segment",
                painter.value(status.leds_per_segment().to_string()),
            ),
            (
                "recorded_patterns",
                painter.value(status.recorded_patterns().to_string()),
            ),
        ]);

        writeln!(f, "{}", painter.heading(format!("SP108E at {}", self.peer)))?;
        write!(f, "{}", Table::key_value(painter, rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(hex: &str) -> String {
        let status = DeviceStatus::from_hex(hex).expect("status should decode");
        let painter = Painter::new(false);
        StatusView::new("10.0.0.2:8189", &status, &painter).to_string()
    }

    fn row<'a>(rendered: &'a str, field: &str) -> Option<&'a str> {
        rendered
            .lines()
            .find(|line| line.split('│').nth(1).is_some_and(|cell| cell.trim() == field))
    }

    #[test]
    fn renders_heading_and_decoded_fields() {
        let rendered = render("3801d380ff02003c0001ff6717030010ff");

        assert!(rendered.starts_with("SP108E at 10.0.0.2:8189\n"));
        for (field, value) in [
            ("power", "on"),
            ("mode", "STATIC"),
            ("speed", "50%"),
            ("brightness", "100%"),
            ("colour", "#ff6717"),
            ("chip", "WS2811"),
            ("colour_order", "GRB"),
            ("segments", "1"),
            ("leds_per_segment", "60"),
            ("recorded_patterns", "0"),
        ] {
            let line = row(&rendered, field).unwrap_or_else(|| panic!("missing row {field}"));
            assert!(line.contains(value), "row {field} should show {value}: {line}");
        }
    }

    #[test]
    fn white_row_only_for_rgbw_chips() {
        assert!(row(&render("3801d380ff02003c0001ff6717030010ff"), "white").is_none());

        // Chip index 24 is SK6812_RGBW.
        let rendered = render("3801d380ff02003c0001ff6717180080ff");
        let line = row(&rendered, "white").expect("RGBW chip should show white row");
        assert!(line.contains("50%"));
    }

    #[test]
    fn unknown_codes_are_flagged() {
        let rendered = render("3800d380ff09003c0001ff6717630010ff");
        assert!(row(&rendered, "power").is_some_and(|line| line.contains("off")));
        assert!(row(&rendered, "chip").is_some_and(|line| line.contains("unknown (99)")));
        assert!(row(&rendered, "colour_order").is_some_and(|line| line.contains("unknown (9)")));
    }
}

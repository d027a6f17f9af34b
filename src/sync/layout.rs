use serde::Serialize;

use crate::codec::{ChipType, ColorOrder, DeviceStatus};
use crate::config::DeviceConfig;

/// One configuration write made while reconciling the strip layout.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, derive_more::Display)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum LayoutChange {
    #[display("chip type -> {_0}")]
    ChipType(ChipType),
    #[display("colour order -> {_0}")]
    ColorOrder(ColorOrder),
    #[display("segments -> {_0}")]
    Segments(u16),
    #[display("LEDs per segment -> {_0}")]
    LedsPerSegment(u16),
}

/// Lists the writes needed to bring the device in line with `config`.
///
/// Fields the device already reports correctly are left out.
pub(crate) fn layout_changes(status: &DeviceStatus, config: &DeviceConfig) -> Vec<LayoutChange> {
    let mut changes = Vec::new();
    if status.chip_type_index() != config.chip().index() {
        changes.push(LayoutChange::ChipType(config.chip()));
    }
    if status.color_order_index() != config.color_order().index() {
        changes.push(LayoutChange::ColorOrder(config.color_order()));
    }
    if status.segment_count() != config.segments() {
        changes.push(LayoutChange::Segments(config.segments()));
    }
    if status.leds_per_segment() != config.leds_per_segment() {
        changes.push(LayoutChange::LedsPerSegment(config.leds_per_segment()));
    }
    changes
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn status() -> DeviceStatus {
        // WS2811, GRB, one segment of 60 LEDs.
        DeviceStatus::from_hex("3801d380ff02003c0001ff6717030010ff").expect("status should decode")
    }

    #[test]
    fn matching_layout_needs_no_writes() {
        let config = DeviceConfig::builder().host("h").build();
        assert_eq!(Vec::<LayoutChange>::new(), layout_changes(&status(), &config));
    }

    #[test]
    fn only_differing_fields_are_written() {
        let config = DeviceConfig::builder()
            .host("h")
            .chip(ChipType::Sk6812Rgbw)
            .leds_per_segment(150)
            .build();
        assert_eq!(
            vec![
                LayoutChange::ChipType(ChipType::Sk6812Rgbw),
                LayoutChange::LedsPerSegment(150),
            ],
            layout_changes(&status(), &config)
        );
    }

    #[test]
    fn changes_serialise_with_field_tag() {
        let json = serde_json::to_string(&LayoutChange::ColorOrder(ColorOrder::Rgb))
            .expect("change should serialise");
        assert_eq!(r#"{"field":"color_order","value":"RGB"}"#, json);
    }
}

use crate::codec::{Hsv, Rgb};

/// Hue and saturation received separately, waiting to be written together.
///
/// The device only accepts a full RGB colour, so a hue change alone cannot
/// be written without knowing the saturation the caller wants with it.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub(crate) struct PendingColourEdit {
    hue: Option<u16>,
    saturation: Option<u8>,
}

impl PendingColourEdit {
    pub(crate) fn with_hue(self, hue: u16) -> Self {
        Self {
            hue: Some(hue),
            ..self
        }
    }

    pub(crate) fn with_saturation(self, saturation: u8) -> Self {
        Self {
            saturation: Some(saturation),
            ..self
        }
    }

    /// Returns both halves once each has arrived.
    pub(crate) fn complete(self) -> Option<(u16, u8)> {
        Some((self.hue?, self.saturation?))
    }

    pub(crate) fn is_empty(self) -> bool {
        self.hue.is_none() && self.saturation.is_none()
    }
}

/// Combines a completed edit with the brightness component last read from the device.
pub(crate) fn combine(hue: u16, saturation: u8, value: u8) -> Rgb {
    Hsv::new(hue, saturation, value).to_rgb()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn one_half_is_not_complete() {
        assert_eq!(None, PendingColourEdit::default().with_hue(120).complete());
        assert_eq!(None, PendingColourEdit::default().with_saturation(50).complete());
    }

    #[test]
    fn both_halves_complete_in_either_order() {
        let hue_first = PendingColourEdit::default().with_hue(120).with_saturation(50);
        let saturation_first = PendingColourEdit::default().with_saturation(50).with_hue(120);
        assert_eq!(Some((120, 50)), hue_first.complete());
        assert_eq!(hue_first, saturation_first);
    }

    #[test]
    fn later_value_replaces_earlier_one() {
        let edit = PendingColourEdit::default()
            .with_hue(10)
            .with_hue(200)
            .with_saturation(30);
        assert_eq!(Some((200, 30)), edit.complete());
    }

    #[test]
    fn combine_uses_device_value_component() {
        assert_eq!(Rgb::new(128, 255, 128), combine(120, 50, 100));
        assert_eq!(Rgb::new(0, 0, 0), combine(120, 50, 0));
    }
}

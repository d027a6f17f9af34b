/// Formats bytes as uppercase hexadecimal pairs separated by spaces.
pub(crate) fn format_hex(bytes: &[u8]) -> String {
    if bytes.is_empty() {
        return "<empty>".to_string();
    }

    let mut rendered = String::with_capacity(bytes.len().saturating_mul(3));
    for (index, value) in bytes.iter().enumerate() {
        if index > 0 {
            rendered.push(' ');
        }
        rendered.push(nibble_to_hex(value >> 4));
        rendered.push(nibble_to_hex(value & 0x0F));
    }
    rendered
}

/// Formats a `0..=100` percentage derived from a device byte for display.
pub(crate) fn format_percentage(value: f64) -> String {
    format!("{value:.0}%")
}

fn nibble_to_hex(value: u8) -> char {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    HEX[usize::from(value)] as char
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn format_hex_handles_empty_payload() {
        assert_eq!("<empty>", format_hex(&[]));
    }

    #[test]
    fn format_hex_formats_uppercase_pairs() {
        assert_eq!("38 00 00 00 10 83", format_hex(&[0x38, 0x00, 0x00, 0x00, 0x10, 0x83]));
    }

    #[test]
    fn format_percentage_rounds_to_whole_units() {
        assert_eq!("50%", format_percentage(50.19607843137255));
        assert_eq!("100%", format_percentage(100.0));
    }
}

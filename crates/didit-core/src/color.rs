use serde::Deserialize;
use serde::Serialize;

pub const DEFAULT_ACCENT: &str = "#38BDF8";

/// Dark gray used for actions that no longer exist.
pub const NEUTRAL_COLOR: &str = "#FF444444";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argb {
    pub alpha: u8,
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Argb {
    /// Accepts `#RGB`, `#RRGGBB` and `#AARRGGBB`. The leading `#` is required.
    pub fn parse(raw: &str) -> Option<Self> {
        let hex = raw.trim().strip_prefix('#')?;
        if hex.is_empty() || !hex.bytes().all(|byte| byte.is_ascii_hexdigit()) {
            return None;
        }
        let value = u32::from_str_radix(hex, 16).ok()?;
        match hex.len() {
            3 => Some(Self {
                alpha: 0xFF,
                red: nibble(value >> 8) * 17,
                green: nibble(value >> 4) * 17,
                blue: nibble(value) * 17,
            }),
            6 => Some(Self {
                alpha: 0xFF,
                red: byte(value >> 16),
                green: byte(value >> 8),
                blue: byte(value),
            }),
            8 => Some(Self {
                alpha: byte(value >> 24),
                red: byte(value >> 16),
                green: byte(value >> 8),
                blue: byte(value),
            }),
            _ => None,
        }
    }

    pub fn default_accent() -> Self {
        Self {
            alpha: 0xFF,
            red: 0x38,
            green: 0xBD,
            blue: 0xF8,
        }
    }

    pub fn to_hex(self) -> String {
        if self.alpha == 0xFF {
            format!("#{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
        } else {
            format!(
                "#{:02X}{:02X}{:02X}{:02X}",
                self.alpha, self.red, self.green, self.blue
            )
        }
    }
}

fn nibble(value: u32) -> u8 {
    (value & 0xF) as u8
}

fn byte(value: u32) -> u8 {
    (value & 0xFF) as u8
}

/// The stored color string when it parses, otherwise `fallback`. Never fails.
pub fn resolve_color(raw: Option<&str>, fallback: &str) -> String {
    match raw {
        Some(raw) if Argb::parse(raw).is_some() => raw.trim().to_string(),
        Some(raw) => {
            tracing::debug!(color = raw, "unparseable stored color, using accent");
            fallback.to_string()
        }
        None => fallback.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn parses_all_three_widths() {
        assert_eq!(
            Argb::parse("#38BDF8"),
            Some(Argb::default_accent())
        );
        assert_eq!(
            Argb::parse("#fa0"),
            Some(Argb {
                alpha: 0xFF,
                red: 0xFF,
                green: 0xAA,
                blue: 0x00,
            })
        );
        assert_eq!(
            Argb::parse("#80102030"),
            Some(Argb {
                alpha: 0x80,
                red: 0x10,
                green: 0x20,
                blue: 0x30,
            })
        );
    }

    #[test]
    fn rejects_other_lengths_and_signs() {
        assert_eq!(Argb::parse("#12345"), None);
        assert_eq!(Argb::parse("#+12345"), None);
        assert_eq!(Argb::parse("#"), None);
        assert_eq!(Argb::parse("blue"), None);
        assert_eq!(Argb::parse("38BDF8"), None);
        assert_eq!(Argb::parse("80102030"), None);
    }

    #[test]
    fn bare_hex_is_not_passed_through() {
        assert_eq!(resolve_color(Some("38BDF8"), DEFAULT_ACCENT), DEFAULT_ACCENT);
        assert_eq!(resolve_color(Some("80102030"), "#10B981"), "#10B981");
    }

    #[test]
    fn hex_output_omits_opaque_alpha() {
        assert_eq!(Argb::default_accent().to_hex(), DEFAULT_ACCENT);
        assert_eq!(Argb::parse(NEUTRAL_COLOR).map(Argb::to_hex).as_deref(), Some("#444444"));
    }

    #[test]
    fn resolve_keeps_valid_colors() {
        assert_eq!(resolve_color(Some(" #10B981 "), DEFAULT_ACCENT), "#10B981");
        assert_eq!(resolve_color(None, DEFAULT_ACCENT), DEFAULT_ACCENT);
    }

    proptest! {
        #[test]
        fn malformed_colors_fall_back_to_accent(raw in "[^0-9a-fA-F#]{1,12}") {
            prop_assert_eq!(resolve_color(Some(&raw), DEFAULT_ACCENT), DEFAULT_ACCENT);
        }

        #[test]
        fn resolved_color_always_parses(raw in ".{0,12}") {
            let resolved = resolve_color(Some(&raw), DEFAULT_ACCENT);
            prop_assert!(Argb::parse(&resolved).is_some());
        }
    }
}

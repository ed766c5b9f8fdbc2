#![forbid(unsafe_code)]

//! RGBA colors and their text notations.
//!
//! A color input remembers the notation its property was written in and
//! writes back in the same notation; short hex (`#123`) writes back as long
//! hex (`#112233`).

use std::fmt;
use std::str::FromStr;

/// An sRGB color with straight alpha in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color {
    r: u8,
    g: u8,
    b: u8,
    a: f64,
}

/// Text notation of a color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColorNotation {
    /// `#rgb` or `#rrggbb`
    HexRgb,
    /// `#rgba` or `#rrggbbaa`
    HexRgba,
    /// `rgb(r, g, b)`
    FunctionalRgb,
    /// `rgba(r, g, b, a)`
    FunctionalRgba,
}

impl ColorNotation {
    #[must_use]
    pub const fn has_alpha(self) -> bool {
        matches!(self, Self::HexRgba | Self::FunctionalRgba)
    }
}

/// Error for text that is not a supported color notation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseColorError {
    input: String,
}

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported color notation: {:?}", self.input)
    }
}

impl std::error::Error for ParseColorError {}

impl Default for Color {
    fn default() -> Self {
        Self::rgb(0, 0, 0)
    }
}

impl Color {
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Alpha is clamped to `[0, 1]`; NaN becomes opaque.
    #[must_use]
    pub fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self {
            r,
            g,
            b,
            a: clamp_alpha(a),
        }
    }

    #[must_use]
    pub const fn r(&self) -> u8 {
        self.r
    }

    #[must_use]
    pub const fn g(&self) -> u8 {
        self.g
    }

    #[must_use]
    pub const fn b(&self) -> u8 {
        self.b
    }

    #[must_use]
    pub const fn alpha(&self) -> f64 {
        self.a
    }

    #[must_use]
    pub fn with_alpha(self, a: f64) -> Self {
        Self::rgba(self.r, self.g, self.b, a)
    }

    // -----------------------------------------------------------------------
    // Numbers
    // -----------------------------------------------------------------------

    /// From `0xRRGGBB`.
    #[must_use]
    pub const fn from_rgb_number(n: u32) -> Self {
        Self::rgb((n >> 16) as u8, (n >> 8) as u8, n as u8)
    }

    /// From `0xRRGGBBAA`.
    #[must_use]
    pub fn from_rgba_number(n: u32) -> Self {
        Self::rgba(
            (n >> 24) as u8,
            (n >> 16) as u8,
            (n >> 8) as u8,
            f64::from(n as u8) / 255.0,
        )
    }

    #[must_use]
    pub const fn to_rgb_number(&self) -> u32 {
        (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }

    #[must_use]
    pub fn to_rgba_number(&self) -> u32 {
        self.to_rgb_number() << 8 | u32::from(alpha_byte(self.a))
    }

    // -----------------------------------------------------------------------
    // Text
    // -----------------------------------------------------------------------

    /// Parse any supported notation.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        Self::parse_with_notation(text).map(|(color, _)| color)
    }

    /// Parse and report the notation the text was written in.
    #[must_use]
    pub fn parse_with_notation(text: &str) -> Option<(Self, ColorNotation)> {
        let text = text.trim();
        if let Some(hex) = text.strip_prefix('#') {
            return parse_hex(hex);
        }
        let lower = text.to_ascii_lowercase();
        if let Some(args) = functional_args(&lower, "rgba") {
            return parse_functional(args, true).map(|c| (c, ColorNotation::FunctionalRgba));
        }
        if let Some(args) = functional_args(&lower, "rgb") {
            return parse_functional(args, false).map(|c| (c, ColorNotation::FunctionalRgb));
        }
        None
    }

    /// The notation of `text`, if it is a color.
    #[must_use]
    pub fn detect_notation(text: &str) -> Option<ColorNotation> {
        Self::parse_with_notation(text).map(|(_, notation)| notation)
    }

    /// `#rrggbb`
    #[must_use]
    pub fn to_hex_rgb_string(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// `#rrggbbaa`
    #[must_use]
    pub fn to_hex_rgba_string(&self) -> String {
        format!("{}{:02x}", self.to_hex_rgb_string(), alpha_byte(self.a))
    }

    /// `rgb(r, g, b)`
    #[must_use]
    pub fn to_functional_rgb_string(&self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }

    /// `rgba(r, g, b, a)`
    #[must_use]
    pub fn to_functional_rgba_string(&self) -> String {
        format!(
            "rgba({}, {}, {}, {})",
            self.r,
            self.g,
            self.b,
            format_alpha(self.a)
        )
    }

    /// Format in `notation`.
    #[must_use]
    pub fn to_notation_string(&self, notation: ColorNotation) -> String {
        match notation {
            ColorNotation::HexRgb => self.to_hex_rgb_string(),
            ColorNotation::HexRgba => self.to_hex_rgba_string(),
            ColorNotation::FunctionalRgb => self.to_functional_rgb_string(),
            ColorNotation::FunctionalRgba => self.to_functional_rgba_string(),
        }
    }
}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ParseColorError {
            input: s.to_owned(),
        })
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a < 1.0 {
            f.write_str(&self.to_hex_rgba_string())
        } else {
            f.write_str(&self.to_hex_rgb_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn clamp_alpha(a: f64) -> f64 {
    if a.is_nan() { 1.0 } else { a.clamp(0.0, 1.0) }
}

fn alpha_byte(a: f64) -> u8 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let byte = (clamp_alpha(a) * 255.0).round() as u8;
    byte
}

fn format_alpha(a: f64) -> String {
    let text = format!("{a:.2}");
    text.trim_end_matches('0').trim_end_matches('.').to_owned()
}

fn parse_hex(hex: &str) -> Option<(Color, ColorNotation)> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok().map(|n| n * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        3 => Some((
            Color::rgb(nibble(0)?, nibble(1)?, nibble(2)?),
            ColorNotation::HexRgb,
        )),
        4 => Some((
            Color::rgba(
                nibble(0)?,
                nibble(1)?,
                nibble(2)?,
                f64::from(nibble(3)?) / 255.0,
            ),
            ColorNotation::HexRgba,
        )),
        6 => Some((Color::rgb(byte(0)?, byte(2)?, byte(4)?), ColorNotation::HexRgb)),
        8 => Some((
            Color::rgba(byte(0)?, byte(2)?, byte(4)?, f64::from(byte(6)?) / 255.0),
            ColorNotation::HexRgba,
        )),
        _ => None,
    }
}

fn functional_args<'a>(text: &'a str, name: &str) -> Option<&'a str> {
    text.strip_prefix(name)?
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')
}

fn parse_functional(args: &str, alpha: bool) -> Option<Color> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    let expected = if alpha { 4 } else { 3 };
    if parts.len() != expected {
        return None;
    }
    let r = parse_channel(parts[0])?;
    let g = parse_channel(parts[1])?;
    let b = parse_channel(parts[2])?;
    let a = if alpha { parse_alpha(parts[3])? } else { 1.0 };
    Some(Color::rgba(r, g, b, a))
}

fn parse_channel(text: &str) -> Option<u8> {
    let value = match text.strip_suffix('%') {
        Some(pct) => pct.trim().parse::<f64>().ok()? * 255.0 / 100.0,
        None => text.parse::<f64>().ok()?,
    };
    if !value.is_finite() {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let channel = value.round().clamp(0.0, 255.0) as u8;
    Some(channel)
}

fn parse_alpha(text: &str) -> Option<f64> {
    let value = match text.strip_suffix('%') {
        Some(pct) => pct.trim().parse::<f64>().ok()? / 100.0,
        None => text.parse::<f64>().ok()?,
    };
    value.is_finite().then(|| clamp_alpha(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_hex_notations() {
        assert_eq!(
            Color::parse_with_notation("#123"),
            Some((Color::rgb(0x11, 0x22, 0x33), ColorNotation::HexRgb))
        );
        assert_eq!(
            Color::parse_with_notation("#224488"),
            Some((Color::rgb(0x22, 0x44, 0x88), ColorNotation::HexRgb))
        );
        let (c, n) = Color::parse_with_notation("#11223380").unwrap();
        assert_eq!(n, ColorNotation::HexRgba);
        assert_eq!(c.to_hex_rgba_string(), "#11223380");
        assert_eq!(
            Color::detect_notation("#f00f"),
            Some(ColorNotation::HexRgba)
        );
    }

    #[test]
    fn parses_functional_notations() {
        assert_eq!(
            Color::parse_with_notation("rgb(10, 20, 30)"),
            Some((Color::rgb(10, 20, 30), ColorNotation::FunctionalRgb))
        );
        assert_eq!(
            Color::parse_with_notation("RGBA(0,0,0,0.5)"),
            Some((Color::rgba(0, 0, 0, 0.5), ColorNotation::FunctionalRgba))
        );
        assert_eq!(Color::parse("rgb(100%, 0%, 300)"), Some(Color::rgb(255, 0, 255)));
    }

    #[test]
    fn rejects_other_text() {
        for text in ["", "#12", "#12345", "#ggg", "rgb(1, 2)", "rgba(1, 2, 3)", "red", "foo"] {
            assert_eq!(Color::parse(text), None, "{text}");
        }
        assert!("nope".parse::<Color>().is_err());
    }

    #[test]
    fn writes_back_in_notation() {
        let (c, n) = Color::parse_with_notation("#123").unwrap();
        assert_eq!(c.to_notation_string(n), "#112233");
        assert_eq!(
            Color::rgb(0, 127, 255).to_notation_string(ColorNotation::FunctionalRgb),
            "rgb(0, 127, 255)"
        );
        assert_eq!(
            Color::rgba(1, 2, 3, 0.25).to_notation_string(ColorNotation::FunctionalRgba),
            "rgba(1, 2, 3, 0.25)"
        );
        assert_eq!(
            Color::rgb(1, 2, 3).to_functional_rgba_string(),
            "rgba(1, 2, 3, 1)"
        );
    }

    #[test]
    fn packed_numbers() {
        assert_eq!(Color::from_rgb_number(0xff8800), Color::rgb(0xff, 0x88, 0x00));
        assert_eq!(Color::rgb(0x12, 0x34, 0x56).to_rgb_number(), 0x123456);
        let c = Color::from_rgba_number(0x12345600);
        assert_eq!(c.alpha(), 0.0);
        assert_eq!(c.to_rgba_number(), 0x12345600);
    }

    #[test]
    fn alpha_is_clamped() {
        assert_eq!(Color::rgba(0, 0, 0, 2.0).alpha(), 1.0);
        assert_eq!(Color::rgba(0, 0, 0, -1.0).alpha(), 0.0);
        assert_eq!(Color::rgba(0, 0, 0, f64::NAN).alpha(), 1.0);
    }

    #[test]
    fn display_uses_hex() {
        assert_eq!(Color::rgb(255, 0, 0).to_string(), "#ff0000");
        assert_eq!(Color::rgba(255, 0, 0, 0.0).to_string(), "#ff000000");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_roundtrip() {
        let c = Color::rgba(1, 2, 3, 0.5);
        let json = serde_json::to_string(&c).unwrap();
        let back: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(c, back);
    }

    proptest! {
        #[test]
        fn hex_text_preserves_rgb(n in 0u32..0x0100_0000) {
            let c = Color::from_rgb_number(n);
            prop_assert_eq!(Color::parse(&c.to_hex_rgb_string()), Some(c));
            prop_assert_eq!(Color::parse(&c.to_functional_rgb_string()), Some(c));
        }
    }
}

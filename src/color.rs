//! Color codes (`#rgb` / `#rrggbb`) and their parsed RGB form.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

/// Opaque 8-bit RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const WHITE: Rgb8 = Rgb8::new(255, 255, 255);
    pub const BLACK: Rgb8 = Rgb8::new(0, 0, 0);

    /// Parse a `#rgb` or `#rrggbb` code. Short codes expand by digit doubling.
    pub fn parse(code: &str) -> Option<Self> {
        if !is_color_code(code) {
            return None;
        }
        let hex = &code[1..];
        let digits: Vec<u8> = if hex.len() == 3 {
            hex.chars()
                .map(|c| {
                    let d = c.to_digit(16).unwrap_or(0) as u8;
                    d * 16 + d
                })
                .collect()
        } else {
            (0..3)
                .map(|i| u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).unwrap_or(0))
                .collect()
        };
        Some(Self::new(digits[0], digits[1], digits[2]))
    }
}

fn color_code_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^#[0-9A-Fa-f]{3}$|^#[0-9A-Fa-f]{6}$").expect("color code pattern is valid")
    })
}

/// True iff `code` is `#rgb` or `#rrggbb` (hex digits, either case).
pub fn is_color_code(code: &str) -> bool {
    color_code_re().is_match(code)
}

/// [`is_color_code`] over an arbitrary config value; non-strings are never color codes.
pub fn is_color_code_value(value: &Value) -> bool {
    value.as_str().is_some_and(is_color_code)
}

/// Parse an optional color code, treating `None` and invalid codes as "no color".
pub fn parse_opt(code: Option<&str>) -> Option<Rgb8> {
    code.and_then(Rgb8::parse)
}

//! Colour string parsing for colour-family config keys.

use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// An RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Error for a string that is not a recognised colour.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid color '{0}'")]
pub struct ColorParseError(pub String);

/// xterm default palette, used for palette slots left unset.
pub const DEFAULT_PALETTE: [Rgba; 16] = [
    Rgba::rgb(0x00, 0x00, 0x00),
    Rgba::rgb(0xcd, 0x00, 0x00),
    Rgba::rgb(0x00, 0xcd, 0x00),
    Rgba::rgb(0xcd, 0xcd, 0x00),
    Rgba::rgb(0x00, 0x00, 0xee),
    Rgba::rgb(0xcd, 0x00, 0xcd),
    Rgba::rgb(0x00, 0xcd, 0xcd),
    Rgba::rgb(0xe5, 0xe5, 0xe5),
    Rgba::rgb(0x7f, 0x7f, 0x7f),
    Rgba::rgb(0xff, 0x00, 0x00),
    Rgba::rgb(0x00, 0xff, 0x00),
    Rgba::rgb(0xff, 0xff, 0x00),
    Rgba::rgb(0x5c, 0x5c, 0xff),
    Rgba::rgb(0xff, 0x00, 0xff),
    Rgba::rgb(0x00, 0xff, 0xff),
    Rgba::rgb(0xff, 0xff, 0xff),
];

static RGB_FUNC_REGEX: OnceLock<Regex> = OnceLock::new();

fn rgb_func_regex() -> &'static Regex {
    RGB_FUNC_REGEX.get_or_init(|| {
        Regex::new(
            r"^rgba?\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*(?:,\s*(\d*\.?\d+)\s*)?\)$",
        )
        .expect("Failed to compile rgb() regex")
    })
}

/// Parse a colour string.
///
/// Accepted forms: `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)`,
/// `rgba(r, g, b, a)` with `a` in `0.0..=1.0`, and a handful of names.
pub fn parse_color(s: &str) -> Result<Rgba, ColorParseError> {
    let s = s.trim();
    let err = || ColorParseError(s.to_string());

    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex).ok_or_else(err);
    }

    if let Some(caps) = rgb_func_regex().captures(s) {
        let channel = |i: usize| -> Option<u8> { caps.get(i)?.as_str().parse::<u8>().ok() };
        let (r, g, b) = (
            channel(1).ok_or_else(err)?,
            channel(2).ok_or_else(err)?,
            channel(3).ok_or_else(err)?,
        );
        let a = match caps.get(4) {
            Some(m) => {
                let alpha: f64 = m.as_str().parse().map_err(|_| err())?;
                if !(0.0..=1.0).contains(&alpha) {
                    return Err(err());
                }
                (alpha * 255.0).round() as u8
            }
            None => 255,
        };
        return Ok(Rgba::new(r, g, b, a));
    }

    named_color(&s.to_ascii_lowercase()).ok_or_else(err)
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|n| n * 17);
    match hex.len() {
        3 => Some(Rgba::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
        6 => Some(Rgba::rgb(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(Rgba::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
        _ => None,
    }
}

fn named_color(name: &str) -> Option<Rgba> {
    let c = match name {
        "black" => Rgba::rgb(0, 0, 0),
        "white" => Rgba::rgb(255, 255, 255),
        "red" => Rgba::rgb(255, 0, 0),
        "green" => Rgba::rgb(0, 128, 0),
        "lime" => Rgba::rgb(0, 255, 0),
        "blue" => Rgba::rgb(0, 0, 255),
        "yellow" => Rgba::rgb(255, 255, 0),
        "cyan" => Rgba::rgb(0, 255, 255),
        "magenta" => Rgba::rgb(255, 0, 255),
        "gray" | "grey" => Rgba::rgb(128, 128, 128),
        "orange" => Rgba::rgb(255, 165, 0),
        "purple" => Rgba::rgb(128, 0, 128),
        "transparent" => Rgba::new(0, 0, 0, 0),
        _ => return None,
    };
    Some(c)
}

impl FromStr for Rgba {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_color(s)
    }
}

//! Enum-like string settings.
//!
//! These keys are stored as strings so scripts can set them naturally,
//! but only a closed set of spellings is accepted by the widget.

use std::fmt;
use std::str::FromStr;

/// Error for a string outside an enum-like key's accepted set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind} '{value}' (expected one of: {expected})")]
pub struct InvalidEnumValue {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorShape {
    #[default]
    Block,
    Ibeam,
    Underline,
}

impl CursorShape {
    pub fn as_str(self) -> &'static str {
        match self {
            CursorShape::Block => "block",
            CursorShape::Ibeam => "ibeam",
            CursorShape::Underline => "underline",
        }
    }
}

impl FromStr for CursorShape {
    type Err = InvalidEnumValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "block" => Ok(CursorShape::Block),
            "ibeam" => Ok(CursorShape::Ibeam),
            "underline" => Ok(CursorShape::Underline),
            _ => Err(InvalidEnumValue {
                kind: "cursor_shape",
                value: s.to_string(),
                expected: "block, ibeam, underline",
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorBlinkMode {
    /// Follow the desktop setting.
    #[default]
    System,
    On,
    Off,
}

impl CursorBlinkMode {
    pub fn as_str(self) -> &'static str {
        match self {
            CursorBlinkMode::System => "system",
            CursorBlinkMode::On => "on",
            CursorBlinkMode::Off => "off",
        }
    }
}

impl FromStr for CursorBlinkMode {
    type Err = InvalidEnumValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "system" => Ok(CursorBlinkMode::System),
            "on" => Ok(CursorBlinkMode::On),
            "off" => Ok(CursorBlinkMode::Off),
            _ => Err(InvalidEnumValue {
                kind: "cursor_blink_mode",
                value: s.to_string(),
                expected: "system, on, off",
            }),
        }
    }
}

/// Rendering width of East Asian ambiguous-width characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CjkWidth {
    #[default]
    Narrow,
    Wide,
}

impl CjkWidth {
    pub fn as_str(self) -> &'static str {
        match self {
            CjkWidth::Narrow => "narrow",
            CjkWidth::Wide => "wide",
        }
    }
}

impl FromStr for CjkWidth {
    type Err = InvalidEnumValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "narrow" => Ok(CjkWidth::Narrow),
            "wide" => Ok(CjkWidth::Wide),
            _ => Err(InvalidEnumValue {
                kind: "cjk_width",
                value: s.to_string(),
                expected: "narrow, wide",
            }),
        }
    }
}

impl fmt::Display for CursorShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for CursorBlinkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for CjkWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

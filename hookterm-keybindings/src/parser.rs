//! Accelerator parser.
//!
//! Parses accelerator strings into `KeyCombo` values. Two spellings are
//! accepted and produce identical combos:
//!
//! - GTK form: `<Ctrl><Shift>c`, `<Primary>r`, `<Alt>Return`
//! - plus form: `Ctrl+Shift+C`, `Alt+Enter`, `Ctrl+[KeyZ]`
//!
//! `<Primary>` (and `CmdOrCtrl` in the plus form) is resolved here, at parse
//! time: Super on macOS, Ctrl elsewhere.

use std::fmt;
use winit::keyboard::{KeyCode, NamedKey};

/// Error type for accelerator parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ParseError(pub String);

/// Set of active modifiers for a key combination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub super_key: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        alt: false,
        shift: false,
        super_key: false,
    };

    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        ..Modifiers::NONE
    };

    pub const CTRL_SHIFT: Modifiers = Modifiers {
        ctrl: true,
        shift: true,
        ..Modifiers::NONE
    };

    /// The platform's primary accelerator modifier.
    pub fn primary() -> Modifiers {
        if cfg!(target_os = "macos") {
            Modifiers {
                super_key: true,
                ..Modifiers::NONE
            }
        } else {
            Modifiers::CTRL
        }
    }

    fn set_primary(&mut self) {
        if cfg!(target_os = "macos") {
            self.super_key = true;
        } else {
            self.ctrl = true;
        }
    }

    /// Apply a modifier by name. Returns false for unknown names.
    fn apply(&mut self, name: &str) -> bool {
        match name.to_lowercase().as_str() {
            "ctrl" | "control" => self.ctrl = true,
            "alt" | "mod1" | "option" => self.alt = true,
            "shift" => self.shift = true,
            "super" | "meta" | "cmd" | "command" | "win" | "hyper" => self.super_key = true,
            "primary" | "cmdorctrl" => self.set_primary(),
            _ => return false,
        }
        true
    }
}

/// A parsed key combination (modifiers + key).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    pub modifiers: Modifiers,
    pub key: ParsedKey,
}

/// Renders the canonical GTK spelling, which parses back to the same combo.
impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.ctrl {
            f.write_str("<Ctrl>")?;
        }
        if self.modifiers.alt {
            f.write_str("<Alt>")?;
        }
        if self.modifiers.shift {
            f.write_str("<Shift>")?;
        }
        if self.modifiers.super_key {
            f.write_str("<Super>")?;
        }

        match &self.key {
            ParsedKey::Character(c) => match symbol_name(*c) {
                Some(name) => f.write_str(name),
                None => write!(f, "{}", c),
            },
            ParsedKey::Named(n) => write!(f, "{:?}", n),
            ParsedKey::Physical(k) => write!(f, "[{:?}]", k),
        }
    }
}

/// The actual key (either a character or a named key).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParsedKey {
    /// A single character key, stored uppercased (e.g., 'A', '1', '+')
    Character(char),
    /// A named key (e.g., F1, Enter, Escape)
    Named(NamedKey),
    /// A physical key code (e.g., KeyZ) matched by position rather than
    /// by the character produced.
    Physical(KeyCode),
}

/// Parse an accelerator string in either the GTK or the plus form.
pub fn parse_key_combo(s: &str) -> Result<KeyCombo, ParseError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ParseError("Empty key combination".to_string()));
    }
    if s.starts_with('<') {
        parse_gtk_form(s)
    } else {
        parse_plus_form(s)
    }
}

fn parse_gtk_form(s: &str) -> Result<KeyCombo, ParseError> {
    let mut modifiers = Modifiers::default();
    let mut rest = s;

    while let Some(after) = rest.strip_prefix('<') {
        let end = after
            .find('>')
            .ok_or_else(|| ParseError(format!("Unterminated modifier in '{}'", s)))?;
        let name = &after[..end];
        if !modifiers.apply(name) {
            return Err(ParseError(format!("Unknown modifier: '{}'", name)));
        }
        rest = &after[end + 1..];
    }

    let rest = rest.trim();
    if rest.is_empty() {
        return Err(ParseError(
            "Key combination ends with modifier, no key specified".to_string(),
        ));
    }

    let key = parse_key(rest)?;
    Ok(KeyCombo { modifiers, key })
}

fn parse_plus_form(s: &str) -> Result<KeyCombo, ParseError> {
    // A trailing "++" names the plus key itself.
    let (body, plus_key) = match s.strip_suffix("++") {
        Some(body) => (body, true),
        None => (s, false),
    };
    let parts: Vec<&str> = if body.is_empty() {
        Vec::new()
    } else {
        body.split('+').map(str::trim).collect()
    };

    let mut modifiers = Modifiers::default();
    let mut key_part = None;

    for (i, part) in parts.iter().enumerate() {
        let is_last = i == parts.len() - 1;

        if !modifiers.apply(part) {
            if key_part.is_some() || plus_key {
                return Err(ParseError(format!(
                    "Multiple keys specified: already have key, found '{}'",
                    part
                )));
            }
            key_part = Some(*part);
        } else if is_last && !plus_key {
            return Err(ParseError(
                "Key combination ends with modifier, no key specified".to_string(),
            ));
        }
    }

    let key = if plus_key {
        ParsedKey::Character('+')
    } else {
        let key_str = key_part.ok_or_else(|| ParseError("No key specified".to_string()))?;
        parse_key(key_str)?
    };

    Ok(KeyCombo { modifiers, key })
}

/// Parse a key string into a ParsedKey.
fn parse_key(s: &str) -> Result<ParsedKey, ParseError> {
    // Physical key syntax: [KeyCode]
    if let Some(code_str) = s.strip_prefix('[').and_then(|r| r.strip_suffix(']')) {
        if let Some(code) = parse_physical_key_code(code_str) {
            return Ok(ParsedKey::Physical(code));
        }
        return Err(ParseError(format!(
            "Unknown physical key code: '{}'",
            code_str
        )));
    }

    if let Some(named) = parse_named_key(s) {
        return Ok(ParsedKey::Named(named));
    }

    if let Some(c) = parse_symbol_name(s) {
        return Ok(ParsedKey::Character(c));
    }

    let mut chars = s.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Ok(ParsedKey::Character(c.to_ascii_uppercase()));
    }

    Err(ParseError(format!("Unknown key: '{}'", s)))
}

/// GTK keysym names for punctuation.
const SYMBOL_NAMES: &[(&str, char)] = &[
    ("plus", '+'),
    ("minus", '-'),
    ("equal", '='),
    ("comma", ','),
    ("period", '.'),
    ("slash", '/'),
    ("backslash", '\\'),
    ("semicolon", ';'),
    ("apostrophe", '\''),
    ("grave", '`'),
    ("bracketleft", '['),
    ("bracketright", ']'),
];

fn parse_symbol_name(s: &str) -> Option<char> {
    let lower = s.to_lowercase();
    SYMBOL_NAMES
        .iter()
        .find(|(name, _)| *name == lower)
        .map(|(_, c)| *c)
}

fn symbol_name(c: char) -> Option<&'static str> {
    SYMBOL_NAMES
        .iter()
        .find(|(_, sym)| *sym == c)
        .map(|(name, _)| *name)
}

/// Parse a physical key code string into a KeyCode.
fn parse_physical_key_code(s: &str) -> Option<KeyCode> {
    let code = match s.to_lowercase().as_str() {
        "keya" => KeyCode::KeyA,
        "keyb" => KeyCode::KeyB,
        "keyc" => KeyCode::KeyC,
        "keyd" => KeyCode::KeyD,
        "keye" => KeyCode::KeyE,
        "keyf" => KeyCode::KeyF,
        "keyg" => KeyCode::KeyG,
        "keyh" => KeyCode::KeyH,
        "keyi" => KeyCode::KeyI,
        "keyj" => KeyCode::KeyJ,
        "keyk" => KeyCode::KeyK,
        "keyl" => KeyCode::KeyL,
        "keym" => KeyCode::KeyM,
        "keyn" => KeyCode::KeyN,
        "keyo" => KeyCode::KeyO,
        "keyp" => KeyCode::KeyP,
        "keyq" => KeyCode::KeyQ,
        "keyr" => KeyCode::KeyR,
        "keys" => KeyCode::KeyS,
        "keyt" => KeyCode::KeyT,
        "keyu" => KeyCode::KeyU,
        "keyv" => KeyCode::KeyV,
        "keyw" => KeyCode::KeyW,
        "keyx" => KeyCode::KeyX,
        "keyy" => KeyCode::KeyY,
        "keyz" => KeyCode::KeyZ,

        "digit0" => KeyCode::Digit0,
        "digit1" => KeyCode::Digit1,
        "digit2" => KeyCode::Digit2,
        "digit3" => KeyCode::Digit3,
        "digit4" => KeyCode::Digit4,
        "digit5" => KeyCode::Digit5,
        "digit6" => KeyCode::Digit6,
        "digit7" => KeyCode::Digit7,
        "digit8" => KeyCode::Digit8,
        "digit9" => KeyCode::Digit9,

        "minus" => KeyCode::Minus,
        "equal" => KeyCode::Equal,
        "bracketleft" => KeyCode::BracketLeft,
        "bracketright" => KeyCode::BracketRight,
        "backslash" => KeyCode::Backslash,
        "semicolon" => KeyCode::Semicolon,
        "quote" => KeyCode::Quote,
        "backquote" => KeyCode::Backquote,
        "comma" => KeyCode::Comma,
        "period" => KeyCode::Period,
        "slash" => KeyCode::Slash,
        "numpadadd" => KeyCode::NumpadAdd,
        "numpadsubtract" => KeyCode::NumpadSubtract,

        "f1" => KeyCode::F1,
        "f2" => KeyCode::F2,
        "f3" => KeyCode::F3,
        "f4" => KeyCode::F4,
        "f5" => KeyCode::F5,
        "f6" => KeyCode::F6,
        "f7" => KeyCode::F7,
        "f8" => KeyCode::F8,
        "f9" => KeyCode::F9,
        "f10" => KeyCode::F10,
        "f11" => KeyCode::F11,
        "f12" => KeyCode::F12,

        "arrowup" => KeyCode::ArrowUp,
        "arrowdown" => KeyCode::ArrowDown,
        "arrowleft" => KeyCode::ArrowLeft,
        "arrowright" => KeyCode::ArrowRight,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        "insert" => KeyCode::Insert,
        "delete" => KeyCode::Delete,

        "enter" => KeyCode::Enter,
        "escape" => KeyCode::Escape,
        "space" => KeyCode::Space,
        "tab" => KeyCode::Tab,
        "backspace" => KeyCode::Backspace,

        _ => return None,
    };
    Some(code)
}

/// Parse a named key, accepting both winit and GTK keysym spellings
/// (`PageUp` / `Page_Up`, `Enter` / `Return`, `Backspace` / `BackSpace`).
fn parse_named_key(s: &str) -> Option<NamedKey> {
    let normalized = s.to_lowercase().replace('_', "");
    let named = match normalized.as_str() {
        "f1" => NamedKey::F1,
        "f2" => NamedKey::F2,
        "f3" => NamedKey::F3,
        "f4" => NamedKey::F4,
        "f5" => NamedKey::F5,
        "f6" => NamedKey::F6,
        "f7" => NamedKey::F7,
        "f8" => NamedKey::F8,
        "f9" => NamedKey::F9,
        "f10" => NamedKey::F10,
        "f11" => NamedKey::F11,
        "f12" => NamedKey::F12,

        "enter" | "return" | "kpenter" => NamedKey::Enter,
        "escape" | "esc" => NamedKey::Escape,
        "space" => NamedKey::Space,
        "tab" => NamedKey::Tab,
        "backspace" => NamedKey::Backspace,
        "delete" | "del" => NamedKey::Delete,
        "insert" | "ins" => NamedKey::Insert,
        "home" => NamedKey::Home,
        "end" => NamedKey::End,
        "pageup" | "pgup" | "prior" => NamedKey::PageUp,
        "pagedown" | "pgdn" | "next" => NamedKey::PageDown,

        "up" | "arrowup" => NamedKey::ArrowUp,
        "down" | "arrowdown" => NamedKey::ArrowDown,
        "left" | "arrowleft" => NamedKey::ArrowLeft,
        "right" | "arrowright" => NamedKey::ArrowRight,

        _ => return None,
    };
    Some(named)
}

/// Convert a parsed `KeyCombo` into the bytes a terminal would send.
///
/// - Ctrl+letter: control code (letter - 'A' + 1)
/// - Named keys (Enter, Tab, arrows, F-keys): standard escape sequences
/// - Plain characters: UTF-8 bytes
/// - Alt+key: ESC prefix + key bytes
pub fn key_combo_to_bytes(combo: &KeyCombo) -> Result<Vec<u8>, ParseError> {
    let has_ctrl = combo.modifiers.ctrl;
    let has_alt = combo.modifiers.alt;

    let mut bytes = match &combo.key {
        ParsedKey::Character(c) => {
            if has_ctrl {
                let upper = c.to_ascii_uppercase();
                if !upper.is_ascii_uppercase() {
                    return Err(ParseError(format!("Cannot compute Ctrl code for '{}'", c)));
                }
                vec![upper as u8 - b'A' + 1]
            } else {
                // Accelerators store letters uppercased; send what an
                // unshifted key would produce unless Shift is held.
                let ch = if combo.modifiers.shift {
                    *c
                } else {
                    c.to_ascii_lowercase()
                };
                let mut buf = [0u8; 4];
                ch.encode_utf8(&mut buf).as_bytes().to_vec()
            }
        }
        ParsedKey::Named(named) => {
            let seq: &[u8] = match named {
                NamedKey::Enter => b"\r",
                NamedKey::Tab => b"\t",
                NamedKey::Space => b" ",
                NamedKey::Backspace => b"\x7f",
                NamedKey::Escape => b"\x1b",
                NamedKey::Insert => b"\x1b[2~",
                NamedKey::Delete => b"\x1b[3~",
                NamedKey::ArrowUp => b"\x1b[A",
                NamedKey::ArrowDown => b"\x1b[B",
                NamedKey::ArrowRight => b"\x1b[C",
                NamedKey::ArrowLeft => b"\x1b[D",
                NamedKey::Home => b"\x1b[H",
                NamedKey::End => b"\x1b[F",
                NamedKey::PageUp => b"\x1b[5~",
                NamedKey::PageDown => b"\x1b[6~",
                NamedKey::F1 => b"\x1bOP",
                NamedKey::F2 => b"\x1bOQ",
                NamedKey::F3 => b"\x1bOR",
                NamedKey::F4 => b"\x1bOS",
                NamedKey::F5 => b"\x1b[15~",
                NamedKey::F6 => b"\x1b[17~",
                NamedKey::F7 => b"\x1b[18~",
                NamedKey::F8 => b"\x1b[19~",
                NamedKey::F9 => b"\x1b[20~",
                NamedKey::F10 => b"\x1b[21~",
                NamedKey::F11 => b"\x1b[23~",
                NamedKey::F12 => b"\x1b[24~",
                _ => return Err(ParseError(format!("Unsupported named key: {:?}", named))),
            };
            seq.to_vec()
        }
        ParsedKey::Physical(_) => {
            return Err(ParseError(
                "Physical key codes cannot be converted to bytes without a keyboard layout"
                    .to_string(),
            ));
        }
    };

    if has_alt {
        bytes.insert(0, 0x1b);
    }
    Ok(bytes)
}

/// Parse whitespace-separated accelerators into one byte sequence each.
///
/// `"Up Up Down Down"` gives four arrow-key sequences.
pub fn parse_key_sequence(keys: &str) -> Result<Vec<Vec<u8>>, ParseError> {
    let trimmed = keys.trim();
    if trimmed.is_empty() {
        return Err(ParseError("Empty key sequence".to_string()));
    }

    trimmed
        .split_whitespace()
        .map(|part| {
            let combo =
                parse_key_combo(part).map_err(|e| ParseError(format!("'{}': {}", part, e)))?;
            key_combo_to_bytes(&combo)
        })
        .collect()
}

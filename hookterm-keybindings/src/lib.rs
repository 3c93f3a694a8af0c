//! Keybinding system for hookterm.
//!
//! Features:
//! - Accelerator parsing in GTK (`<Ctrl><Shift>c`) and plus (`Ctrl+Shift+C`) forms
//! - An ordered, script-populated keymap with exact modifier matching
//! - The built-in command table (font scale, clipboard, reload)
//! - Accelerator to terminal byte encoding for synthetic key input

pub mod builtin;
pub mod keymap;
pub mod parser;

pub use builtin::{BuiltinCommand, BuiltinKeymap};
pub use keymap::{InputKey, KeyInput, Keymap, KeymapEntry, Resolution, modifiers_from_state};
pub use parser::{
    KeyCombo, Modifiers, ParseError, ParsedKey, key_combo_to_bytes, parse_key_combo,
    parse_key_sequence,
};

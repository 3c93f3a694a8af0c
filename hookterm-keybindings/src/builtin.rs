//! Built-in key bindings, consulted after the user's keymap unless
//! `ignore_default_keymap` is set.

use crate::keymap::KeyInput;
use crate::parser::{KeyCombo, parse_key_combo};

/// Commands the host performs without a script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinCommand {
    IncreaseFontScale,
    DecreaseFontScale,
    ResetFontScale,
    Copy,
    Paste,
    Reload,
}

impl BuiltinCommand {
    pub fn name(self) -> &'static str {
        match self {
            BuiltinCommand::IncreaseFontScale => "increase_font_scale",
            BuiltinCommand::DecreaseFontScale => "decrease_font_scale",
            BuiltinCommand::ResetFontScale => "reset_font_scale",
            BuiltinCommand::Copy => "copy",
            BuiltinCommand::Paste => "paste",
            BuiltinCommand::Reload => "reload",
        }
    }
}

const STANDARD_BINDINGS: &[(&str, BuiltinCommand)] = &[
    ("<Ctrl>plus", BuiltinCommand::IncreaseFontScale),
    ("<Ctrl><Shift>plus", BuiltinCommand::IncreaseFontScale),
    ("<Ctrl>minus", BuiltinCommand::DecreaseFontScale),
    ("<Ctrl>equal", BuiltinCommand::ResetFontScale),
    ("<Ctrl><Shift>c", BuiltinCommand::Copy),
    ("<Ctrl><Shift>v", BuiltinCommand::Paste),
    ("<Ctrl><Shift>r", BuiltinCommand::Reload),
];

/// Fixed accelerator → command table.
#[derive(Debug, Clone)]
pub struct BuiltinKeymap {
    entries: Vec<(KeyCombo, BuiltinCommand)>,
}

impl BuiltinKeymap {
    /// The standard built-in bindings.
    pub fn standard() -> Self {
        let entries = STANDARD_BINDINGS
            .iter()
            .filter_map(|(accel, cmd)| match parse_key_combo(accel) {
                Ok(combo) => Some((combo, *cmd)),
                Err(e) => {
                    log::warn!("Invalid built-in binding '{}': {}", accel, e);
                    None
                }
            })
            .collect();
        Self { entries }
    }

    pub fn lookup(&self, input: &KeyInput) -> Option<BuiltinCommand> {
        self.entries
            .iter()
            .find(|(combo, _)| input.matches(combo))
            .map(|(_, cmd)| *cmd)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for BuiltinKeymap {
    fn default() -> Self {
        Self::standard()
    }
}

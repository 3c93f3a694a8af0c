//! Keymap resolution.
//!
//! A `Keymap` holds the user's accelerator bindings in insertion order. Key
//! events are normalised into a `KeyInput` and resolved against the user
//! bindings first and the built-in table second. Modifier sets must match
//! exactly, so `<Ctrl><Shift>c` never fires on Ctrl+C and vice versa.

use crate::builtin::{BuiltinCommand, BuiltinKeymap};
use crate::parser::{KeyCombo, Modifiers, ParseError, ParsedKey, parse_key_combo};
use winit::event::KeyEvent;
use winit::keyboard::{Key, KeyCode, ModifiersState, NamedKey, PhysicalKey};

/// Logical key of an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKey {
    Character(char),
    Named(NamedKey),
}

/// A key press normalised for matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub modifiers: Modifiers,
    pub key: Option<InputKey>,
    pub physical: Option<KeyCode>,
}

impl KeyInput {
    /// Build from a winit key event and the current modifier state.
    pub fn from_event(event: &KeyEvent, state: ModifiersState) -> Self {
        let key = match &event.logical_key {
            Key::Character(c) => c
                .chars()
                .next()
                .map(|ch| InputKey::Character(ch.to_ascii_uppercase())),
            Key::Named(named) => Some(InputKey::Named(*named)),
            _ => None,
        };
        let physical = match event.physical_key {
            PhysicalKey::Code(code) => Some(code),
            PhysicalKey::Unidentified(_) => None,
        };
        Self {
            modifiers: modifiers_from_state(state),
            key,
            physical,
        }
    }

    pub fn character(c: char, modifiers: Modifiers) -> Self {
        Self {
            modifiers,
            key: Some(InputKey::Character(c.to_ascii_uppercase())),
            physical: None,
        }
    }

    pub fn named(key: NamedKey, modifiers: Modifiers) -> Self {
        Self {
            modifiers,
            key: Some(InputKey::Named(key)),
            physical: None,
        }
    }

    pub fn with_physical(mut self, code: KeyCode) -> Self {
        self.physical = Some(code);
        self
    }

    /// Exact match: same key and the same modifier set.
    pub fn matches(&self, combo: &KeyCombo) -> bool {
        if self.modifiers != combo.modifiers {
            return false;
        }
        match (&combo.key, self.key) {
            (ParsedKey::Physical(code), _) => self.physical == Some(*code),
            (ParsedKey::Character(expected), Some(InputKey::Character(got))) => {
                expected.eq_ignore_ascii_case(&got)
            }
            (ParsedKey::Named(expected), Some(InputKey::Named(got))) => *expected == got,
            _ => false,
        }
    }
}

pub fn modifiers_from_state(state: ModifiersState) -> Modifiers {
    Modifiers {
        ctrl: state.control_key(),
        alt: state.alt_key(),
        shift: state.shift_key(),
        super_key: state.super_key(),
    }
}

/// One user binding.
#[derive(Debug, Clone)]
pub struct KeymapEntry<C> {
    /// Accelerator as the user wrote it.
    pub accel: String,
    pub combo: KeyCombo,
    pub callback: C,
}

/// Outcome of resolving a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<C> {
    User(C),
    Builtin(BuiltinCommand),
    Unhandled,
}

/// Ordered accelerator → callback table.
#[derive(Debug, Clone)]
pub struct Keymap<C> {
    entries: Vec<KeymapEntry<C>>,
}

impl<C> Default for Keymap<C> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<C> Keymap<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `accel`, replacing any binding for the same key combination.
    ///
    /// Returns the displaced callback so the caller can release it. On a
    /// parse error nothing changes and `callback` is dropped.
    pub fn bind(&mut self, accel: &str, callback: C) -> Result<Option<C>, ParseError> {
        let combo = parse_key_combo(accel)?;
        let displaced = self.remove_combo(&combo);
        log::debug!("Bound {} ({})", accel, combo);
        self.entries.push(KeymapEntry {
            accel: accel.to_string(),
            combo,
            callback,
        });
        Ok(displaced)
    }

    /// Remove the binding for `accel`, returning its callback.
    pub fn unbind(&mut self, accel: &str) -> Result<Option<C>, ParseError> {
        let combo = parse_key_combo(accel)?;
        Ok(self.remove_combo(&combo))
    }

    fn remove_combo(&mut self, combo: &KeyCombo) -> Option<C> {
        let pos = self.entries.iter().position(|e| e.combo == *combo)?;
        Some(self.entries.remove(pos).callback)
    }

    /// Drop every binding, returning the callbacks in binding order.
    pub fn clear(&mut self) -> Vec<C> {
        self.entries.drain(..).map(|e| e.callback).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[KeymapEntry<C>] {
        &self.entries
    }

    pub fn lookup(&self, input: &KeyInput) -> Option<&C> {
        self.entries
            .iter()
            .find(|e| input.matches(&e.combo))
            .map(|e| &e.callback)
    }
}

impl<C: Clone> Keymap<C> {
    /// Resolve a key press: user bindings, then built-ins when supplied.
    pub fn resolve(&self, input: &KeyInput, builtins: Option<&BuiltinKeymap>) -> Resolution<C> {
        if let Some(cb) = self.lookup(input) {
            return Resolution::User(cb.clone());
        }
        match builtins.and_then(|b| b.lookup(input)) {
            Some(cmd) => Resolution::Builtin(cmd),
            None => Resolution::Unhandled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_modifier_match() {
        let mut keymap = Keymap::new();
        keymap.bind("<Ctrl><Shift>c", 1).unwrap();
        keymap.bind("<Ctrl>c", 2).unwrap();

        let ctrl_c = KeyInput::character('c', Modifiers::CTRL);
        let ctrl_shift_c = KeyInput::character('C', Modifiers::CTRL_SHIFT);
        assert_eq!(keymap.resolve(&ctrl_c, None), Resolution::User(2));
        assert_eq!(keymap.resolve(&ctrl_shift_c, None), Resolution::User(1));
    }

    #[test]
    fn test_rebind_replaces() {
        let mut keymap = Keymap::new();
        assert_eq!(keymap.bind("<Primary>r", "first").unwrap(), None);
        assert_eq!(keymap.bind("<Primary>r", "second").unwrap(), Some("first"));
        assert_eq!(keymap.len(), 1);

        let input = KeyInput::character('r', Modifiers::primary());
        assert_eq!(keymap.resolve(&input, None), Resolution::User("second"));
    }

    #[test]
    fn test_spellings_share_identity() {
        let mut keymap = Keymap::new();
        keymap.bind("Ctrl+Shift+C", 1).unwrap();
        assert_eq!(keymap.bind("<Ctrl><Shift>c", 2).unwrap(), Some(1));
        assert_eq!(keymap.unbind("CTRL+SHIFT+c").unwrap(), Some(2));
        assert!(keymap.is_empty());
    }

    #[test]
    fn test_bind_parse_error_leaves_map_unchanged() {
        let mut keymap = Keymap::new();
        keymap.bind("<Ctrl>a", 1).unwrap();
        assert!(keymap.bind("<Ctrl>", 2).is_err());
        assert_eq!(keymap.len(), 1);
    }

    #[test]
    fn test_clear_returns_callbacks_in_order() {
        let mut keymap = Keymap::new();
        keymap.bind("a", 1).unwrap();
        keymap.bind("b", 2).unwrap();
        assert_eq!(keymap.clear(), vec![1, 2]);
        assert!(keymap.is_empty());
    }

    #[test]
    fn test_physical_binding() {
        let mut keymap = Keymap::new();
        keymap.bind("Ctrl+[KeyZ]", 7).unwrap();
        let input = KeyInput::character('y', Modifiers::CTRL).with_physical(KeyCode::KeyZ);
        assert_eq!(keymap.resolve(&input, None), Resolution::User(7));
    }

    #[test]
    fn test_user_binding_shadows_builtin() {
        let builtins = BuiltinKeymap::standard();
        let mut keymap = Keymap::new();
        let paste = KeyInput::character('v', Modifiers::CTRL_SHIFT);

        assert_eq!(
            keymap.resolve(&paste, Some(&builtins)),
            Resolution::Builtin(BuiltinCommand::Paste)
        );
        assert_eq!(keymap.resolve(&paste, None), Resolution::Unhandled);

        keymap.bind("<Ctrl><Shift>v", 9).unwrap();
        assert_eq!(keymap.resolve(&paste, Some(&builtins)), Resolution::User(9));
    }

    #[test]
    fn test_modifiers_from_state() {
        let mods = modifiers_from_state(ModifiersState::CONTROL | ModifiersState::SHIFT);
        assert_eq!(mods, Modifiers::CTRL_SHIFT);
    }
}

//! Property bridge between config keys and the running widget.
//!
//! Keys with a live getter are read from the widget, so a manual resize is
//! visible to scripts. A write is checked against the schema and resolved
//! into a widget [`Update`] under a short store borrow. The update is then
//! pushed with no borrow held, so a widget may call back into its context,
//! and only then is the value mirrored into the store. A value that fails
//! to resolve leaves both untouched.

use crate::widget::{ColorChoice, TerminalWidget};
use hookterm_config::{
    CjkWidth, ColorRole, ColorSetting, ConfigError, ConfigStore, CursorBlinkMode, CursorShape,
    DEFAULT_PALETTE, LiveProperty, NONE_SENTINEL, PALETTE_KEYS, Rgba, Value, parse_color,
};
use std::cell::RefCell;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BridgeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },
}

fn invalid(key: &str, reason: impl ToString) -> BridgeError {
    BridgeError::InvalidValue {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

/// A validated widget change.
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    Columns(i64),
    Rows(i64),
    Scale(i64),
    Font(String),
    Title(String),
    Icon(String),
    Role(String),
    CursorShape(CursorShape),
    CursorBlinkMode(CursorBlinkMode),
    CjkWidth(CjkWidth),
    ScrollbackLength(i64),
    CellWidth(i64),
    CellHeight(i64),
    PaddingHorizontal(i64),
    PaddingVertical(i64),
    BoldIsBright(bool),
    Silent(bool),
    Autohide(bool),
    Color(ColorRole, ColorChoice),
    Palette([Rgba; 16]),
}

impl Update {
    pub fn push(&self, widget: &dyn TerminalWidget) {
        match self {
            Update::Columns(n) => widget.set_columns(*n),
            Update::Rows(n) => widget.set_rows(*n),
            Update::Scale(n) => widget.set_scale(*n),
            Update::Font(s) => widget.set_font(s),
            Update::Title(s) => widget.set_title(s),
            Update::Icon(s) => widget.set_icon(s),
            Update::Role(s) => widget.set_role(s),
            Update::CursorShape(shape) => widget.set_cursor_shape(*shape),
            Update::CursorBlinkMode(mode) => widget.set_cursor_blink_mode(*mode),
            Update::CjkWidth(width) => widget.set_cjk_width(*width),
            Update::ScrollbackLength(n) => widget.set_scrollback_length(*n),
            Update::CellWidth(n) => widget.set_cell_width(*n),
            Update::CellHeight(n) => widget.set_cell_height(*n),
            Update::PaddingHorizontal(n) => widget.set_padding_horizontal(*n),
            Update::PaddingVertical(n) => widget.set_padding_vertical(*n),
            Update::BoldIsBright(on) => widget.set_bold_is_bright(*on),
            Update::Silent(on) => widget.set_silent(*on),
            Update::Autohide(on) => widget.set_autohide(*on),
            Update::Color(role, choice) => widget.set_color(*role, *choice),
            Update::Palette(palette) => widget.set_palette(palette),
        }
    }
}

/// A write that passed every check. `update` is `None` for store-only keys.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingWrite {
    pub key: &'static str,
    pub value: Value,
    pub update: Option<Update>,
}

/// Read `key`, preferring the widget when the key has a live getter.
pub fn read(store: &ConfigStore, widget: &dyn TerminalWidget, key: &str) -> Option<Value> {
    let Some(entry) = store.meta().lookup(key) else {
        log::warn!("Read of unknown config key '{}'", key);
        return None;
    };
    entry
        .live
        .getter()
        .and_then(|prop| read_property(widget, prop))
        .or_else(|| store.get(key))
}

fn read_property(widget: &dyn TerminalWidget, prop: LiveProperty) -> Option<Value> {
    let value = match prop {
        LiveProperty::Columns => Value::Integer(widget.columns()),
        LiveProperty::Rows => Value::Integer(widget.rows()),
        LiveProperty::Scale => Value::Integer(widget.scale()),
        LiveProperty::Font => Value::String(widget.font()),
        LiveProperty::Title => Value::String(widget.title()),
        LiveProperty::CursorShape => Value::from(widget.cursor_shape().as_str()),
        LiveProperty::CursorBlinkMode => Value::from(widget.cursor_blink_mode().as_str()),
        LiveProperty::CjkWidth => Value::from(widget.cjk_width().as_str()),
        LiveProperty::ScrollbackLength => Value::Integer(widget.scrollback_length()),
        LiveProperty::CellWidth => Value::Integer(widget.cell_width()),
        LiveProperty::CellHeight => Value::Integer(widget.cell_height()),
        LiveProperty::BoldIsBright => Value::Boolean(widget.bold_is_bright()),
        LiveProperty::Silent => Value::Boolean(widget.silent()),
        LiveProperty::Autohide => Value::Boolean(widget.autohide()),
        LiveProperty::Icon
        | LiveProperty::Role
        | LiveProperty::PaddingHorizontal
        | LiveProperty::PaddingVertical
        | LiveProperty::Color(_)
        | LiveProperty::PaletteSlot(_) => return None,
    };
    Some(value)
}

/// Check `value` against the schema and resolve its widget update.
///
/// `initialized` freezes structural keys: once set, writes to them are
/// logged and `Ok(None)` is returned.
pub fn prepare(
    store: &ConfigStore,
    initialized: bool,
    key: &str,
    value: Value,
) -> Result<Option<PendingWrite>, BridgeError> {
    let entry = store
        .meta()
        .lookup(key)
        .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
    if entry.value_type != value.value_type() {
        return Err(ConfigError::TypeMismatch {
            key: key.to_string(),
            expected: entry.value_type,
            actual: value.value_type(),
        }
        .into());
    }

    if entry.live.is_structural() && initialized {
        log::info!("'{}' only takes effect at startup; ignoring change", key);
        return Ok(None);
    }

    let update = match entry.live.setter() {
        Some(prop) => Some(resolve(store, key, prop, &value)?),
        None => None,
    };
    Ok(Some(PendingWrite {
        key: entry.name,
        value,
        update,
    }))
}

/// Write `key` through the widget into the store.
///
/// The store is not borrowed while the widget setter runs.
pub fn write(
    store: &RefCell<ConfigStore>,
    widget: &dyn TerminalWidget,
    initialized: bool,
    key: &str,
    value: Value,
) -> Result<(), BridgeError> {
    let pending = prepare(&store.borrow(), initialized, key, value)?;
    let Some(pending) = pending else {
        return Ok(());
    };
    if let Some(update) = &pending.update {
        update.push(widget);
    }
    store.borrow_mut().set(pending.key, pending.value)?;
    Ok(())
}

/// Check and store `key` without touching the widget.
///
/// Used while loading, where [`apply_all`] pushes everything at the end.
pub fn stage(
    store: &mut ConfigStore,
    initialized: bool,
    key: &str,
    value: Value,
) -> Result<(), BridgeError> {
    if let Some(pending) = prepare(store, initialized, key, value)? {
        store.set(pending.key, pending.value)?;
    }
    Ok(())
}

fn int_at_least(key: &str, value: &Value, min: i64) -> Result<i64, BridgeError> {
    match value.as_int() {
        Some(i) if i >= min => Ok(i),
        Some(i) => Err(invalid(key, format!("{i} is below the minimum of {min}"))),
        None => Err(invalid(key, "expected an integer")),
    }
}

fn bool_of(key: &str, value: &Value) -> Result<bool, BridgeError> {
    value.as_bool().ok_or_else(|| invalid(key, "expected a boolean"))
}

fn str_of<'a>(key: &str, value: &'a Value) -> Result<&'a str, BridgeError> {
    value.as_str().ok_or_else(|| invalid(key, "expected a string"))
}

/// Interpret a colour-family string: `""` default, `NONE` disabled.
pub fn color_choice(key: &str, raw: &str) -> Result<ColorChoice, BridgeError> {
    match color_setting_of(raw) {
        ColorSetting::Default => Ok(ColorChoice::Default),
        ColorSetting::Disabled => Ok(ColorChoice::Disabled),
        ColorSetting::Value(s) => parse_color(&s)
            .map(ColorChoice::Custom)
            .map_err(|e| invalid(key, e)),
    }
}

fn color_setting_of(raw: &str) -> ColorSetting {
    if raw.is_empty() {
        ColorSetting::Default
    } else if raw == NONE_SENTINEL {
        ColorSetting::Disabled
    } else {
        ColorSetting::Value(raw.to_string())
    }
}

/// Resolve all 16 palette slots from the store, with `replace` substituted
/// for one slot. Unset slots take the default palette colour.
pub fn build_palette(
    store: &ConfigStore,
    replace: Option<(usize, &str)>,
) -> Result<[Rgba; 16], BridgeError> {
    let mut palette = DEFAULT_PALETTE;
    for (slot, key) in PALETTE_KEYS.iter().enumerate() {
        let raw = match replace {
            Some((n, s)) if n == slot => s.to_string(),
            _ => store.get_str(key),
        };
        match color_choice(key, &raw)? {
            ColorChoice::Custom(rgba) => palette[slot] = rgba,
            ColorChoice::Default | ColorChoice::Disabled => {}
        }
    }
    Ok(palette)
}

fn resolve(
    store: &ConfigStore,
    key: &str,
    prop: LiveProperty,
    value: &Value,
) -> Result<Update, BridgeError> {
    let update = match prop {
        LiveProperty::Columns => Update::Columns(int_at_least(key, value, 1)?),
        LiveProperty::Rows => Update::Rows(int_at_least(key, value, 1)?),
        LiveProperty::Scale => Update::Scale(int_at_least(key, value, 1)?),
        LiveProperty::Font => Update::Font(str_of(key, value)?.to_string()),
        LiveProperty::Title => Update::Title(str_of(key, value)?.to_string()),
        LiveProperty::Icon => Update::Icon(str_of(key, value)?.to_string()),
        LiveProperty::Role => Update::Role(str_of(key, value)?.to_string()),
        LiveProperty::CursorShape => {
            Update::CursorShape(str_of(key, value)?.parse().map_err(|e| invalid(key, e))?)
        }
        LiveProperty::CursorBlinkMode => {
            Update::CursorBlinkMode(str_of(key, value)?.parse().map_err(|e| invalid(key, e))?)
        }
        LiveProperty::CjkWidth => {
            Update::CjkWidth(str_of(key, value)?.parse().map_err(|e| invalid(key, e))?)
        }
        LiveProperty::ScrollbackLength => {
            Update::ScrollbackLength(int_at_least(key, value, 0)?)
        }
        LiveProperty::CellWidth => Update::CellWidth(int_at_least(key, value, 1)?),
        LiveProperty::CellHeight => Update::CellHeight(int_at_least(key, value, 1)?),
        LiveProperty::PaddingHorizontal => {
            Update::PaddingHorizontal(int_at_least(key, value, 0)?)
        }
        LiveProperty::PaddingVertical => Update::PaddingVertical(int_at_least(key, value, 0)?),
        LiveProperty::BoldIsBright => Update::BoldIsBright(bool_of(key, value)?),
        LiveProperty::Silent => Update::Silent(bool_of(key, value)?),
        LiveProperty::Autohide => Update::Autohide(bool_of(key, value)?),
        LiveProperty::Color(role) => {
            Update::Color(role, color_choice(key, str_of(key, value)?)?)
        }
        LiveProperty::PaletteSlot(slot) => Update::Palette(build_palette(
            store,
            Some((slot as usize, str_of(key, value)?)),
        )?),
    };
    Ok(update)
}

/// Every live key in the store resolved to a widget update.
///
/// Structural and store-only keys are skipped and the palette comes last,
/// once. A stored value that does not resolve is logged and skipped.
pub fn stored_updates(store: &ConfigStore) -> Vec<Update> {
    let mut updates = Vec::new();
    for entry in store.meta().entries() {
        let Some(prop) = entry.live.setter() else {
            continue;
        };
        if matches!(prop, LiveProperty::PaletteSlot(_)) {
            continue;
        }
        let Some(value) = store.get(entry.name) else {
            continue;
        };
        match resolve(store, entry.name, prop, &value) {
            Ok(update) => updates.push(update),
            Err(e) => log::warn!("Not applying stored value: {}", e),
        }
    }

    match build_palette(store, None) {
        Ok(palette) => updates.push(Update::Palette(palette)),
        Err(e) => log::warn!("Not applying palette: {}", e),
    }
    updates
}

/// Push every live key from the store to the widget.
pub fn apply_all(store: &RefCell<ConfigStore>, widget: &dyn TerminalWidget) {
    let updates = stored_updates(&store.borrow());
    for update in &updates {
        update.push(widget);
    }
}

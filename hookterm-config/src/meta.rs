//! Meta registry: the static schema of every configurable key.
//!
//! The registry is built once at startup and shared by `Arc` with every
//! context. Entry order is significant: it drives `--help` output, config
//! snapshots and the order in which live keys are pushed to the widget.

use crate::live::{ColorRole, Live, LiveProperty};
use crate::paths::login_shell;
use crate::value::{Value, ValueType};
use std::collections::HashMap;

/// Names of the 16 palette keys, indexed by slot.
pub const PALETTE_KEYS: [&str; 16] = [
    "color_0", "color_1", "color_2", "color_3", "color_4", "color_5", "color_6", "color_7",
    "color_8", "color_9", "color_10", "color_11", "color_12", "color_13", "color_14", "color_15",
];

/// Whether a key's CLI flag appears in `--help`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CliVisibility {
    #[default]
    Normal,
    Hidden,
}

/// One configurable property.
#[derive(Debug, Clone)]
pub struct MetaEntry {
    pub name: &'static str,
    pub short_flag: Option<char>,
    pub value_type: ValueType,
    /// Default value; `None` only for documentation-only entries.
    pub default: Option<Value>,
    pub visibility: CliVisibility,
    pub description: &'static str,
    pub live: Live,
}

impl MetaEntry {
    fn new(
        name: &'static str,
        value_type: ValueType,
        default: Option<Value>,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            short_flag: None,
            value_type,
            default,
            visibility: CliVisibility::Normal,
            description,
            live: Live::Static,
        }
    }

    pub fn string(name: &'static str, default: &str, description: &'static str) -> Self {
        Self::new(
            name,
            ValueType::String,
            Some(Value::String(default.to_string())),
            description,
        )
    }

    pub fn integer(name: &'static str, default: i64, description: &'static str) -> Self {
        Self::new(name, ValueType::Integer, Some(Value::Integer(default)), description)
    }

    pub fn boolean(name: &'static str, default: bool, description: &'static str) -> Self {
        Self::new(name, ValueType::Boolean, Some(Value::Boolean(default)), description)
    }

    /// Documentation-only entry: listed in help, absent from the key space.
    pub fn doc(name: &'static str, description: &'static str) -> Self {
        Self::new(name, ValueType::None, None, description)
    }

    pub fn with_live(mut self, live: Live) -> Self {
        self.live = live;
        self
    }

    pub fn with_short(mut self, short: char) -> Self {
        self.short_flag = Some(short);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visibility = CliVisibility::Hidden;
        self
    }

    pub fn is_doc_only(&self) -> bool {
        self.value_type == ValueType::None
    }

    /// Typed default; the zero value if the entry was declared without one.
    pub fn default_value(&self) -> Option<Value> {
        self.default.clone().or_else(|| self.value_type.zero())
    }
}

/// CLI flag descriptor derived from a schema entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliFlag {
    pub name: &'static str,
    pub short: Option<char>,
    pub value_type: ValueType,
    pub hidden: bool,
    pub help: &'static str,
    /// Help-only line with no flag behind it.
    pub doc_only: bool,
}

/// Ordered, immutable set of schema entries.
#[derive(Debug, Clone)]
pub struct MetaRegistry {
    entries: Vec<MetaEntry>,
    index: HashMap<&'static str, usize>,
}

impl MetaRegistry {
    /// Build the standard hookterm schema.
    pub fn new() -> Self {
        Self::from_entries(standard_entries())
    }

    /// Build a registry from an explicit entry list.
    ///
    /// Duplicate names are logged and dropped; the first declaration wins.
    pub fn from_entries(entries: Vec<MetaEntry>) -> Self {
        let mut kept = Vec::with_capacity(entries.len());
        let mut index = HashMap::with_capacity(entries.len());
        for entry in entries {
            if index.contains_key(entry.name) {
                log::warn!("Duplicate meta entry '{}' ignored", entry.name);
                continue;
            }
            index.insert(entry.name, kept.len());
            kept.push(entry);
        }
        Self {
            entries: kept,
            index,
        }
    }

    /// Look up a real (non documentation-only) key.
    pub fn lookup(&self, key: &str) -> Option<&MetaEntry> {
        self.index
            .get(key)
            .map(|&i| &self.entries[i])
            .filter(|e| !e.is_doc_only())
    }

    /// All entries, including documentation-only ones, in declaration order.
    pub fn entries(&self) -> &[MetaEntry] {
        &self.entries
    }

    /// Real keys in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries
            .iter()
            .filter(|e| !e.is_doc_only())
            .map(|e| e.name)
    }

    /// Number of real keys.
    pub fn len(&self) -> usize {
        self.keys().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// One CLI descriptor per entry.
    ///
    /// Hidden entries still receive a flag; documentation-only entries are
    /// emitted as help-only lines.
    pub fn cli_schema(&self) -> Vec<CliFlag> {
        self.entries
            .iter()
            .map(|e| CliFlag {
                name: e.name,
                short: e.short_flag,
                value_type: e.value_type,
                hidden: e.visibility == CliVisibility::Hidden,
                help: e.description,
                doc_only: e.is_doc_only(),
            })
            .collect()
    }

    /// Report entries with a live getter but no setter.
    ///
    /// These are logic errors in the schema, not user errors: they are logged
    /// as warnings and the entry stays usable (reads hit the widget, writes
    /// only reach the store).
    pub fn validate(&self) -> Vec<&'static str> {
        let mut read_only = Vec::new();
        for entry in &self.entries {
            if entry.live.getter().is_some() && entry.live.setter().is_none() {
                log::warn!("Meta entry '{}' has a getter without a setter", entry.name);
                read_only.push(entry.name);
            }
        }
        read_only
    }
}

impl Default for MetaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn standard_entries() -> Vec<MetaEntry> {
    use LiveProperty as P;

    let mut entries = vec![
        MetaEntry::string("shell", &login_shell(), "Shell to spawn in the terminal")
            .with_short('e')
            .with_live(Live::Structural),
        MetaEntry::string("term", "xterm-256color", "Value exported as $TERM")
            .with_live(Live::Structural),
        MetaEntry::string("title", "hookterm", "Window title").with_live(Live::ReadWrite(P::Title)),
        MetaEntry::string("font", "", "Font description, e.g. 'Monospace 11'")
            .with_live(Live::ReadWrite(P::Font)),
        MetaEntry::string("icon", "utilities-terminal", "Window icon name")
            .with_live(Live::WriteOnly(P::Icon)),
        MetaEntry::string("role", "", "Window role hint").with_live(Live::WriteOnly(P::Role)),
        MetaEntry::string("cursor_shape", "block", "Cursor shape: block, ibeam or underline")
            .with_live(Live::ReadWrite(P::CursorShape)),
        MetaEntry::string(
            "cursor_blink_mode",
            "system",
            "Cursor blink mode: system, on or off",
        )
        .with_live(Live::ReadWrite(P::CursorBlinkMode)),
        MetaEntry::string("cjk_width", "narrow", "Width of ambiguous CJK characters")
            .with_live(Live::ReadWrite(P::CjkWidth)),
        MetaEntry::string("background_image", "", "Path to a background image"),
        MetaEntry::string(
            "uri_schemes",
            "http https file mailto",
            "Space separated URI schemes made clickable",
        ),
    ];

    for role in ColorRole::ALL {
        entries.push(
            MetaEntry::string(role.key(), "", color_description(role))
                .with_live(Live::WriteOnly(P::Color(role))),
        );
    }

    for (slot, key) in PALETTE_KEYS.iter().enumerate() {
        entries.push(
            MetaEntry::string(key, "", "Palette colour")
                .with_live(Live::WriteOnly(P::PaletteSlot(slot as u8)))
                .hidden(),
        );
    }
    entries.push(MetaEntry::doc(
        "color_0 .. color_15",
        "Palette colours (--color_0 .. --color_15)",
    ));

    entries.extend([
        MetaEntry::integer("width", 80, "Initial number of columns")
            .with_live(Live::ReadWrite(P::Columns)),
        MetaEntry::integer("height", 22, "Initial number of rows")
            .with_live(Live::ReadWrite(P::Rows)),
        MetaEntry::integer("scale", 100, "Font scale in percent")
            .with_live(Live::ReadWrite(P::Scale)),
        MetaEntry::integer("cell_width", 100, "Cell width scale in percent")
            .with_live(Live::ReadWrite(P::CellWidth)),
        MetaEntry::integer("cell_height", 100, "Cell height scale in percent")
            .with_live(Live::ReadWrite(P::CellHeight)),
        MetaEntry::integer("padding_horizontal", 0, "Horizontal padding in pixels")
            .with_live(Live::WriteOnly(P::PaddingHorizontal)),
        MetaEntry::integer("padding_vertical", 0, "Vertical padding in pixels")
            .with_live(Live::WriteOnly(P::PaddingVertical)),
        MetaEntry::integer("scrollback_length", 512, "Scrollback lines kept")
            .with_live(Live::ReadWrite(P::ScrollbackLength)),
        MetaEntry::boolean(
            "ignore_default_keymap",
            false,
            "Disable the built-in key bindings",
        ),
        MetaEntry::boolean("autohide", false, "Hide the mouse pointer while typing")
            .with_live(Live::ReadWrite(P::Autohide)),
        MetaEntry::boolean("silent", false, "Disable the audible bell")
            .with_live(Live::ReadWrite(P::Silent)),
        MetaEntry::boolean("bold_is_bright", false, "Render bold text in bright colours")
            .with_live(Live::ReadWrite(P::BoldIsBright)),
    ]);

    entries
}

fn color_description(role: ColorRole) -> &'static str {
    match role {
        ColorRole::WindowBackground => "Window background colour (padding area)",
        ColorRole::Foreground => "Foreground colour",
        ColorRole::Background => "Background colour",
        ColorRole::Cursor => "Cursor colour; NONE follows the text colour",
        ColorRole::CursorForeground => "Text colour under the cursor",
        ColorRole::Highlight => "Selection background colour",
        ColorRole::HighlightForeground => "Selection text colour",
        ColorRole::Bold => "Bold text colour; NONE uses the foreground",
    }
}

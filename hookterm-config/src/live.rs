//! Live property descriptors.
//!
//! A schema entry either lives only in the config store or is bound to a
//! facet of the running terminal widget. The binding is described here as
//! plain data; the root crate's property bridge turns it into widget calls.

/// Colour roles other than the 16-slot palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorRole {
    WindowBackground,
    Foreground,
    Background,
    Cursor,
    CursorForeground,
    Highlight,
    HighlightForeground,
    Bold,
}

impl ColorRole {
    pub const ALL: [ColorRole; 8] = [
        ColorRole::WindowBackground,
        ColorRole::Foreground,
        ColorRole::Background,
        ColorRole::Cursor,
        ColorRole::CursorForeground,
        ColorRole::Highlight,
        ColorRole::HighlightForeground,
        ColorRole::Bold,
    ];

    /// Config key controlling this role.
    pub fn key(self) -> &'static str {
        match self {
            ColorRole::WindowBackground => "color_window_background",
            ColorRole::Foreground => "color_foreground",
            ColorRole::Background => "color_background",
            ColorRole::Cursor => "color_cursor",
            ColorRole::CursorForeground => "color_cursor_foreground",
            ColorRole::Highlight => "color_highlight",
            ColorRole::HighlightForeground => "color_highlight_foreground",
            ColorRole::Bold => "color_bold",
        }
    }
}

/// Widget facet a live key reads from or writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiveProperty {
    Columns,
    Rows,
    Scale,
    Font,
    Title,
    Icon,
    Role,
    CursorShape,
    CursorBlinkMode,
    CjkWidth,
    ScrollbackLength,
    CellWidth,
    CellHeight,
    PaddingHorizontal,
    PaddingVertical,
    BoldIsBright,
    Silent,
    Autohide,
    Color(ColorRole),
    PaletteSlot(u8),
}

/// Accessor capability of a schema entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Live {
    /// Store only.
    Static,
    /// Store only, and frozen once the context has finished initialising.
    Structural,
    ReadWrite(LiveProperty),
    WriteOnly(LiveProperty),
    /// A getter without a setter. Never declared on purpose; flagged by
    /// `MetaRegistry::validate`.
    ReadOnly(LiveProperty),
}

impl Live {
    /// Property read from the widget, if the entry has a live getter.
    pub fn getter(self) -> Option<LiveProperty> {
        match self {
            Live::ReadWrite(p) | Live::ReadOnly(p) => Some(p),
            _ => None,
        }
    }

    /// Property written to the widget, if the entry has a live setter.
    pub fn setter(self) -> Option<LiveProperty> {
        match self {
            Live::ReadWrite(p) | Live::WriteOnly(p) => Some(p),
            _ => None,
        }
    }

    pub fn is_structural(self) -> bool {
        matches!(self, Live::Structural)
    }
}

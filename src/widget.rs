//! The terminal widget seen by a context.
//!
//! Rendering and the PTY live behind [`TerminalWidget`]. Methods take `&self`
//! so script builtins can reach the widget while other parts of the context
//! are borrowed; implementations use interior mutability.

use hookterm_config::{CjkWidth, ColorRole, CursorBlinkMode, CursorShape, DEFAULT_PALETTE, Rgba};
use std::cell::{Ref, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

/// What a colour key asks of the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorChoice {
    /// Use the widget's built-in colour.
    Default,
    /// Turn the colour off (e.g. no separate bold colour).
    Disabled,
    Custom(Rgba),
}

pub trait TerminalWidget {
    fn columns(&self) -> i64;
    fn set_columns(&self, columns: i64);
    fn rows(&self) -> i64;
    fn set_rows(&self, rows: i64);

    /// Font scale in percent.
    fn scale(&self) -> i64;
    fn set_scale(&self, percent: i64);
    fn font(&self) -> String;
    fn set_font(&self, font: &str);

    fn title(&self) -> String;
    fn set_title(&self, title: &str);
    fn set_icon(&self, icon: &str);
    fn set_role(&self, role: &str);

    fn cursor_shape(&self) -> CursorShape;
    fn set_cursor_shape(&self, shape: CursorShape);
    fn cursor_blink_mode(&self) -> CursorBlinkMode;
    fn set_cursor_blink_mode(&self, mode: CursorBlinkMode);
    fn cjk_width(&self) -> CjkWidth;
    fn set_cjk_width(&self, width: CjkWidth);

    fn scrollback_length(&self) -> i64;
    fn set_scrollback_length(&self, lines: i64);
    /// Cell width scale in percent.
    fn cell_width(&self) -> i64;
    fn set_cell_width(&self, percent: i64);
    fn cell_height(&self) -> i64;
    fn set_cell_height(&self, percent: i64);
    fn set_padding_horizontal(&self, px: i64);
    fn set_padding_vertical(&self, px: i64);

    fn bold_is_bright(&self) -> bool;
    fn set_bold_is_bright(&self, on: bool);
    fn silent(&self) -> bool;
    fn set_silent(&self, on: bool);
    fn autohide(&self) -> bool;
    fn set_autohide(&self, on: bool);

    fn set_color(&self, role: ColorRole, choice: ColorChoice);
    /// Replace the whole 16-colour palette at once.
    fn set_palette(&self, palette: &[Rgba; 16]);

    /// Write bytes to the child process as if typed.
    fn feed_child(&self, bytes: &[u8]);
    fn bell(&self);
    fn copy_clipboard(&self, text: &str);
    fn copy_selection(&self);
    fn paste_clipboard(&self);
    fn selection(&self) -> Option<String>;
}

/// Observable state of a [`HeadlessWidget`].
#[derive(Debug, Clone)]
pub struct HeadlessState {
    pub columns: i64,
    pub rows: i64,
    pub scale: i64,
    pub font: String,
    pub title: String,
    pub icon: String,
    pub role: String,
    pub cursor_shape: CursorShape,
    pub cursor_blink_mode: CursorBlinkMode,
    pub cjk_width: CjkWidth,
    pub scrollback_length: i64,
    pub cell_width: i64,
    pub cell_height: i64,
    pub padding_horizontal: i64,
    pub padding_vertical: i64,
    pub bold_is_bright: bool,
    pub silent: bool,
    pub autohide: bool,
    pub colors: HashMap<ColorRole, ColorChoice>,
    pub palette: [Rgba; 16],
    pub palette_pushes: usize,
    pub child_input: Vec<u8>,
    pub bells: usize,
    pub clipboard: String,
    pub selection: Option<String>,
}

impl Default for HeadlessState {
    fn default() -> Self {
        Self {
            columns: 80,
            rows: 24,
            scale: 100,
            font: String::new(),
            title: String::new(),
            icon: String::new(),
            role: String::new(),
            cursor_shape: CursorShape::default(),
            cursor_blink_mode: CursorBlinkMode::default(),
            cjk_width: CjkWidth::default(),
            scrollback_length: 512,
            cell_width: 100,
            cell_height: 100,
            padding_horizontal: 0,
            padding_vertical: 0,
            bold_is_bright: false,
            silent: false,
            autohide: false,
            colors: HashMap::new(),
            palette: DEFAULT_PALETTE,
            palette_pushes: 0,
            child_input: Vec::new(),
            bells: 0,
            clipboard: String::new(),
            selection: None,
        }
    }
}

/// In-memory widget for the daemon and tests.
///
/// Clones share state, so a caller can keep one handle and inspect what the
/// context did through another.
#[derive(Debug, Clone, Default)]
pub struct HeadlessWidget {
    state: Rc<RefCell<HeadlessState>>,
}

impl HeadlessWidget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> Ref<'_, HeadlessState> {
        self.state.borrow()
    }

    /// Simulate a manual resize by the user.
    pub fn resize(&self, columns: i64, rows: i64) {
        let mut s = self.state.borrow_mut();
        s.columns = columns;
        s.rows = rows;
    }

    pub fn select(&self, text: Option<&str>) {
        self.state.borrow_mut().selection = text.map(str::to_string);
    }
}

impl TerminalWidget for HeadlessWidget {
    fn columns(&self) -> i64 {
        self.state.borrow().columns
    }
    fn set_columns(&self, columns: i64) {
        self.state.borrow_mut().columns = columns;
    }
    fn rows(&self) -> i64 {
        self.state.borrow().rows
    }
    fn set_rows(&self, rows: i64) {
        self.state.borrow_mut().rows = rows;
    }

    fn scale(&self) -> i64 {
        self.state.borrow().scale
    }
    fn set_scale(&self, percent: i64) {
        self.state.borrow_mut().scale = percent;
    }
    fn font(&self) -> String {
        self.state.borrow().font.clone()
    }
    fn set_font(&self, font: &str) {
        self.state.borrow_mut().font = font.to_string();
    }

    fn title(&self) -> String {
        self.state.borrow().title.clone()
    }
    fn set_title(&self, title: &str) {
        self.state.borrow_mut().title = title.to_string();
    }
    fn set_icon(&self, icon: &str) {
        self.state.borrow_mut().icon = icon.to_string();
    }
    fn set_role(&self, role: &str) {
        self.state.borrow_mut().role = role.to_string();
    }

    fn cursor_shape(&self) -> CursorShape {
        self.state.borrow().cursor_shape
    }
    fn set_cursor_shape(&self, shape: CursorShape) {
        self.state.borrow_mut().cursor_shape = shape;
    }
    fn cursor_blink_mode(&self) -> CursorBlinkMode {
        self.state.borrow().cursor_blink_mode
    }
    fn set_cursor_blink_mode(&self, mode: CursorBlinkMode) {
        self.state.borrow_mut().cursor_blink_mode = mode;
    }
    fn cjk_width(&self) -> CjkWidth {
        self.state.borrow().cjk_width
    }
    fn set_cjk_width(&self, width: CjkWidth) {
        self.state.borrow_mut().cjk_width = width;
    }

    fn scrollback_length(&self) -> i64 {
        self.state.borrow().scrollback_length
    }
    fn set_scrollback_length(&self, lines: i64) {
        self.state.borrow_mut().scrollback_length = lines;
    }
    fn cell_width(&self) -> i64 {
        self.state.borrow().cell_width
    }
    fn set_cell_width(&self, percent: i64) {
        self.state.borrow_mut().cell_width = percent;
    }
    fn cell_height(&self) -> i64 {
        self.state.borrow().cell_height
    }
    fn set_cell_height(&self, percent: i64) {
        self.state.borrow_mut().cell_height = percent;
    }
    fn set_padding_horizontal(&self, px: i64) {
        self.state.borrow_mut().padding_horizontal = px;
    }
    fn set_padding_vertical(&self, px: i64) {
        self.state.borrow_mut().padding_vertical = px;
    }

    fn bold_is_bright(&self) -> bool {
        self.state.borrow().bold_is_bright
    }
    fn set_bold_is_bright(&self, on: bool) {
        self.state.borrow_mut().bold_is_bright = on;
    }
    fn silent(&self) -> bool {
        self.state.borrow().silent
    }
    fn set_silent(&self, on: bool) {
        self.state.borrow_mut().silent = on;
    }
    fn autohide(&self) -> bool {
        self.state.borrow().autohide
    }
    fn set_autohide(&self, on: bool) {
        self.state.borrow_mut().autohide = on;
    }

    fn set_color(&self, role: ColorRole, choice: ColorChoice) {
        self.state.borrow_mut().colors.insert(role, choice);
    }
    fn set_palette(&self, palette: &[Rgba; 16]) {
        let mut s = self.state.borrow_mut();
        s.palette = *palette;
        s.palette_pushes += 1;
    }

    fn feed_child(&self, bytes: &[u8]) {
        self.state.borrow_mut().child_input.extend_from_slice(bytes);
    }
    fn bell(&self) {
        let mut s = self.state.borrow_mut();
        if !s.silent {
            s.bells += 1;
        }
    }
    fn copy_clipboard(&self, text: &str) {
        self.state.borrow_mut().clipboard = text.to_string();
    }
    fn copy_selection(&self) {
        let mut s = self.state.borrow_mut();
        if let Some(sel) = s.selection.clone() {
            s.clipboard = sel;
        }
    }
    fn paste_clipboard(&self) {
        let mut s = self.state.borrow_mut();
        let text = s.clipboard.clone();
        s.child_input.extend_from_slice(text.as_bytes());
    }
    fn selection(&self) -> Option<String> {
        self.state.borrow().selection.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let a = HeadlessWidget::new();
        let b = a.clone();
        b.set_columns(132);
        assert_eq!(a.columns(), 132);
    }

    #[test]
    fn test_copy_then_paste_feeds_child() {
        let w = HeadlessWidget::new();
        w.select(Some("ls"));
        w.copy_selection();
        w.paste_clipboard();
        assert_eq!(w.state().child_input, b"ls");
    }

    #[test]
    fn test_silent_suppresses_bell() {
        let w = HeadlessWidget::new();
        w.bell();
        w.set_silent(true);
        w.bell();
        assert_eq!(w.state().bells, 1);
    }
}

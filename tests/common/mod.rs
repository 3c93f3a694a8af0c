//! Shared integration test helpers for hookterm.
//!
//! Include this module at the top of each test file that needs it:
//!
//! ```ignore
//! mod common;
//! use common::Fixture;
//! ```
//!
//! The `#[allow(dead_code)]` attribute suppresses warnings when only a subset
//! of helpers are used per file.

#![allow(dead_code)]

use hookterm::notify::Notifier;
use hookterm::{App, ColorChoice, Context, HeadlessWidget, TerminalWidget};
use hookterm_config::{
    CjkWidth, ColorRole, CursorBlinkMode, CursorShape, MetaRegistry, Rgba, Value, parse_args,
};
use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;
use std::rc::{Rc, Weak};
use std::sync::Arc;
use tempfile::TempDir;

/// Notifier that records every notification.
#[derive(Default, Clone)]
pub struct RecordingNotifier {
    pub seen: Rc<RefCell<Vec<(String, String)>>>,
}

impl Notifier for RecordingNotifier {
    fn notify(&self, title: &str, body: &str) {
        self.seen
            .borrow_mut()
            .push((title.to_string(), body.to_string()));
    }
}

impl RecordingNotifier {
    pub fn bodies(&self) -> Vec<String> {
        self.seen.borrow().iter().map(|(_, b)| b.clone()).collect()
    }
}

/// An app with scratch config/theme files. Keep the fixture alive for the
/// whole test: dropping it removes the files.
pub struct Fixture {
    pub app: App,
    pub notes: RecordingNotifier,
    pub dir: TempDir,
    pub config_path: PathBuf,
    pub theme_path: PathBuf,
}

impl Fixture {
    /// `config` / `theme` are written to scratch files; `None` leaves the
    /// file absent. `extra` is appended to the command line.
    pub fn new(config: Option<&str>, theme: Option<&str>, extra: &[&str]) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = dir.path().join("config.rhai");
        let theme_path = dir.path().join("theme.rhai");
        if let Some(src) = config {
            fs::write(&config_path, src).expect("write config");
        }
        if let Some(src) = theme {
            fs::write(&theme_path, src).expect("write theme");
        }

        let meta = Arc::new(MetaRegistry::new());
        let mut argv = vec![
            "hookterm".to_string(),
            "--use".to_string(),
            config_path.display().to_string(),
            "--theme".to_string(),
            theme_path.display().to_string(),
        ];
        argv.extend(extra.iter().map(|s| s.to_string()));
        let args = parse_args(argv, &meta).expect("parse args");

        let notes = RecordingNotifier::default();
        let app = App::new(meta, args, Rc::new(notes.clone()));
        Self {
            app,
            notes,
            dir,
            config_path,
            theme_path,
        }
    }

    pub fn with_config(config: &str) -> Self {
        Self::new(Some(config), None, &[])
    }

    /// Open a window backed by a fresh headless widget.
    pub fn open(&self) -> (Rc<Context>, HeadlessWidget) {
        let widget = HeadlessWidget::new();
        let ctx = self.app.open_window(Rc::new(widget.clone()));
        (ctx, widget)
    }

    /// Open a window backed by `widget`.
    pub fn open_with(&self, widget: Rc<dyn TerminalWidget>) -> Rc<Context> {
        self.app.open_window(widget)
    }

    /// Replace the config file contents (for reload tests).
    pub fn rewrite_config(&self, src: &str) {
        fs::write(&self.config_path, src).expect("rewrite config");
    }

    pub fn rewrite_theme(&self, src: &str) {
        fs::write(&self.theme_path, src).expect("rewrite theme");
    }
}

/// Headless widget that reads back through its context each time the title
/// is set, recording `(is_loading, stored title)`.
#[derive(Clone, Default)]
pub struct ReentrantWidget {
    pub inner: HeadlessWidget,
    ctx: Rc<RefCell<Weak<Context>>>,
    pub seen: Rc<RefCell<Vec<(bool, Option<Value>)>>>,
}

impl ReentrantWidget {
    pub fn attach(&self, ctx: &Rc<Context>) {
        *self.ctx.borrow_mut() = Rc::downgrade(ctx);
    }
}

impl TerminalWidget for ReentrantWidget {
    fn columns(&self) -> i64 {
        self.inner.columns()
    }
    fn set_columns(&self, columns: i64) {
        self.inner.set_columns(columns)
    }
    fn rows(&self) -> i64 {
        self.inner.rows()
    }
    fn set_rows(&self, rows: i64) {
        self.inner.set_rows(rows)
    }
    fn scale(&self) -> i64 {
        self.inner.scale()
    }
    fn set_scale(&self, percent: i64) {
        self.inner.set_scale(percent)
    }
    fn font(&self) -> String {
        self.inner.font()
    }
    fn set_font(&self, font: &str) {
        self.inner.set_font(font)
    }
    fn title(&self) -> String {
        self.inner.title()
    }
    fn set_title(&self, title: &str) {
        self.inner.set_title(title);
        let ctx = self.ctx.borrow().upgrade();
        if let Some(ctx) = ctx {
            let seen = (ctx.is_loading(), ctx.stored("title"));
            self.seen.borrow_mut().push(seen);
        }
    }
    fn set_icon(&self, icon: &str) {
        self.inner.set_icon(icon)
    }
    fn set_role(&self, role: &str) {
        self.inner.set_role(role)
    }
    fn cursor_shape(&self) -> CursorShape {
        self.inner.cursor_shape()
    }
    fn set_cursor_shape(&self, shape: CursorShape) {
        self.inner.set_cursor_shape(shape)
    }
    fn cursor_blink_mode(&self) -> CursorBlinkMode {
        self.inner.cursor_blink_mode()
    }
    fn set_cursor_blink_mode(&self, mode: CursorBlinkMode) {
        self.inner.set_cursor_blink_mode(mode)
    }
    fn cjk_width(&self) -> CjkWidth {
        self.inner.cjk_width()
    }
    fn set_cjk_width(&self, width: CjkWidth) {
        self.inner.set_cjk_width(width)
    }
    fn scrollback_length(&self) -> i64 {
        self.inner.scrollback_length()
    }
    fn set_scrollback_length(&self, lines: i64) {
        self.inner.set_scrollback_length(lines)
    }
    fn cell_width(&self) -> i64 {
        self.inner.cell_width()
    }
    fn set_cell_width(&self, percent: i64) {
        self.inner.set_cell_width(percent)
    }
    fn cell_height(&self) -> i64 {
        self.inner.cell_height()
    }
    fn set_cell_height(&self, percent: i64) {
        self.inner.set_cell_height(percent)
    }
    fn set_padding_horizontal(&self, px: i64) {
        self.inner.set_padding_horizontal(px)
    }
    fn set_padding_vertical(&self, px: i64) {
        self.inner.set_padding_vertical(px)
    }
    fn bold_is_bright(&self) -> bool {
        self.inner.bold_is_bright()
    }
    fn set_bold_is_bright(&self, on: bool) {
        self.inner.set_bold_is_bright(on)
    }
    fn silent(&self) -> bool {
        self.inner.silent()
    }
    fn set_silent(&self, on: bool) {
        self.inner.set_silent(on)
    }
    fn autohide(&self) -> bool {
        self.inner.autohide()
    }
    fn set_autohide(&self, on: bool) {
        self.inner.set_autohide(on)
    }
    fn set_color(&self, role: ColorRole, choice: ColorChoice) {
        self.inner.set_color(role, choice)
    }
    fn set_palette(&self, palette: &[Rgba; 16]) {
        self.inner.set_palette(palette)
    }
    fn feed_child(&self, bytes: &[u8]) {
        self.inner.feed_child(bytes)
    }
    fn bell(&self) {
        self.inner.bell()
    }
    fn copy_clipboard(&self, text: &str) {
        self.inner.copy_clipboard(text)
    }
    fn copy_selection(&self) {
        self.inner.copy_selection()
    }
    fn paste_clipboard(&self) {
        self.inner.paste_clipboard()
    }
    fn selection(&self) -> Option<String> {
        self.inner.selection()
    }
}

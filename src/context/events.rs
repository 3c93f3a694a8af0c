//! Terminal events entering a context: key presses and hook-backed
//! notifications from the widget.

use super::{Context, FONT_SCALE_STEP, MIN_FONT_SCALE};
use crate::shell_quote::quote_path;
use hookterm_config::Value;
use hookterm_keybindings::{BuiltinCommand, KeyInput, Resolution};
use hookterm_scripting::{HookName, HookOutcome, ScriptRuntime, ScriptValue, dispatch};

impl Context {
    /// Resolve a key press. Returns true when the key was consumed.
    ///
    /// A failing user callback is reported and still consumes the key.
    pub fn handle_key(&self, input: &KeyInput) -> bool {
        let use_builtins = !self.store.borrow().get_bool("ignore_default_keymap");
        let resolution = self
            .keymap
            .borrow()
            .resolve(input, use_builtins.then_some(&self.builtin_keys));

        match resolution {
            Resolution::User(handle) => {
                if let Err(e) = self.runtime.invoke(handle, Vec::new()) {
                    self.report("Key binding failed", &e);
                }
                true
            }
            Resolution::Builtin(command) => {
                self.run_builtin(command);
                true
            }
            Resolution::Unhandled => false,
        }
    }

    pub fn run_builtin(&self, command: BuiltinCommand) {
        log::debug!("Context {}: builtin {}", self.id, command.name());
        match command {
            BuiltinCommand::IncreaseFontScale => self.adjust_font_scale(FONT_SCALE_STEP),
            BuiltinCommand::DecreaseFontScale => self.adjust_font_scale(-FONT_SCALE_STEP),
            BuiltinCommand::ResetFontScale => self.reset_font_scale(),
            BuiltinCommand::Copy => self.widget.copy_selection(),
            BuiltinCommand::Paste => self.widget.paste_clipboard(),
            BuiltinCommand::Reload => {
                self.load_config();
            }
        }
    }

    pub fn adjust_font_scale(&self, delta: i64) {
        let current = self
            .get("scale")
            .and_then(|v| v.as_int())
            .unwrap_or(100);
        let next = (current + delta).max(MIN_FONT_SCALE);
        if let Err(e) = self.set("scale", Value::Integer(next)) {
            self.report("Font scale", &e);
        }
    }

    pub fn reset_font_scale(&self) {
        if let Err(e) = self.reset_key("scale") {
            self.report("Font scale", &e);
        }
    }

    /// Run the callback bound to `hook`, reporting script errors.
    fn fire(&self, hook: HookName, args: Vec<ScriptValue>) -> HookOutcome {
        let handle = self.hooks.borrow().get(hook);
        let outcome = dispatch(&self.runtime as &dyn ScriptRuntime, handle, args);
        if let Some(e) = &outcome.error {
            self.report(&format!("'{}' hook failed", hook), e);
        }
        outcome
    }

    /// The child changed its title. Returns the title actually shown.
    pub fn title_changed(&self, native: &str) -> String {
        let title = self
            .fire(HookName::Title, vec![ScriptValue::from(native)])
            .title_decision()
            .unwrap_or_else(|| native.to_string());
        self.widget.set_title(&title);
        title
    }

    /// The child rang the bell. The widget bells unless the hook consumed it.
    pub fn bell(&self) -> bool {
        let consumed = self.fire(HookName::Bell, Vec::new()).handled;
        if !consumed {
            self.widget.bell();
        }
        consumed
    }

    /// Mouse click, with the URI under the pointer if any.
    pub fn clicked(&self, button: i64, uri: Option<&str>) -> bool {
        let uri = uri.map(ScriptValue::from).unwrap_or_default();
        self.fire(HookName::Clicked, vec![ScriptValue::Int(button), uri])
            .handled
    }

    pub fn scrolled(&self, dx: f64, dy: f64, x: f64, y: f64) -> bool {
        let args = [dx, dy, x, y].into_iter().map(ScriptValue::Float).collect();
        self.fire(HookName::Scroll, args).handled
    }

    /// A file was dropped. Unless the hook consumes it, the quoted path is
    /// typed into the child.
    pub fn dropped(&self, path: &str) -> bool {
        let consumed = self
            .fire(HookName::Drag, vec![ScriptValue::from(path)])
            .handled;
        if !consumed {
            self.widget.feed_child(quote_path(path).as_bytes());
        }
        consumed
    }

    pub fn focus_in(&self) -> bool {
        self.fire(HookName::Activated, Vec::new()).handled
    }

    pub fn focus_out(&self) -> bool {
        self.fire(HookName::Deactivated, Vec::new()).handled
    }

    pub fn selection_changed(&self, text: Option<&str>) -> bool {
        match text {
            Some(text) => {
                self.fire(HookName::Selected, vec![ScriptValue::from(text)])
                    .handled
            }
            None => self.fire(HookName::Unselected, Vec::new()).handled,
        }
    }

    /// The widget changed size; the hook receives the new grid.
    pub fn resized(&self) -> bool {
        let args = vec![
            ScriptValue::Int(self.widget.columns()),
            ScriptValue::Int(self.widget.rows()),
        ];
        self.fire(HookName::Resized, args).handled
    }

    /// Deliver an IPC `hook` signal to the `signal` hook.
    pub fn signal_hook(&self, param: ScriptValue) -> HookOutcome {
        self.fire(HookName::Signal, vec![param])
    }
}

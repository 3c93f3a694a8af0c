//! Per-window scripting context.
//!
//! A `Context` owns the config store, keymap, hook table and script runtime
//! of one terminal window, and drives them through the load state machine:
//!
//! 1. reset the store and release every script callback; once initialised,
//!    structural keys keep their value
//! 2. resolve the login shell on the first load
//! 3. load the theme script
//! 4. run the config script
//! 5. apply command line overrides, checked like script writes
//! 6. push every live key to the widget
//!
//! Everything is single-threaded. Script builtins hold a `Weak<Context>` and
//! re-enter it while a script runs, so no `RefCell` borrow is ever held
//! across a call into the runtime.

mod events;
mod state;

pub use state::{LoadState, State};

use crate::bridge::{self, BridgeError};
use crate::builtins;
use crate::notify::{DEFAULT_TITLE, Notifier};
use crate::widget::TerminalWidget;
use hookterm_config::paths::{self, CONTEXT_ID_ENV};
use hookterm_config::{
    ColorSetting, ConfigStore, MetaRegistry, OptionValues, ParsedArgs, ScriptSource, Value,
};
use hookterm_keybindings::{BuiltinKeymap, Keymap, ParseError};
use hookterm_scripting::{
    CallbackHandle, HookName, HookTable, RhaiRuntime, ScriptError, ScriptRuntime, ScriptValue,
    UnknownHook,
};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;

/// Lowest font scale reachable through the scale builtins, in percent.
pub const MIN_FONT_SCALE: i64 = 10;
/// Step used by increase/decrease font scale, in percent.
pub const FONT_SCALE_STEP: i64 = 10;

pub struct Context {
    id: u64,
    args: Rc<ParsedArgs>,
    store: RefCell<ConfigStore>,
    keymap: RefCell<Keymap<CallbackHandle>>,
    hooks: RefCell<HookTable>,
    builtin_keys: BuiltinKeymap,
    runtime: RhaiRuntime,
    widget: Rc<dyn TerminalWidget>,
    notifier: Rc<dyn Notifier>,
    state: Cell<State>,
}

impl Context {
    /// Create a context. No script runs until [`Context::initialize`].
    pub fn new(
        id: u64,
        meta: Arc<MetaRegistry>,
        args: Rc<ParsedArgs>,
        widget: Rc<dyn TerminalWidget>,
        notifier: Rc<dyn Notifier>,
    ) -> Rc<Self> {
        Rc::new_cyclic(|weak| {
            let mut runtime = RhaiRuntime::new();
            let registrar = runtime.registrar();
            builtins::register(runtime.engine_mut(), registrar, weak.clone());
            Context {
                id,
                args,
                store: RefCell::new(ConfigStore::new(meta)),
                keymap: RefCell::new(Keymap::new()),
                hooks: RefCell::new(HookTable::new()),
                builtin_keys: BuiltinKeymap::standard(),
                runtime,
                widget,
                notifier,
                state: Cell::new(State::default()),
            }
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn widget(&self) -> &Rc<dyn TerminalWidget> {
        &self.widget
    }

    pub fn runtime(&self) -> &RhaiRuntime {
        &self.runtime
    }

    pub fn state(&self) -> State {
        self.state.get()
    }

    pub fn is_loading(&self) -> bool {
        self.state.get().is_loading()
    }

    pub fn is_initialized(&self) -> bool {
        self.state.get().initialized
    }

    /// Environment for processes spawned in this window.
    pub fn child_env(&self) -> Vec<(&'static str, String)> {
        vec![
            (CONTEXT_ID_ENV, self.id.to_string()),
            ("TERM", self.store.borrow().get_str("term")),
        ]
    }

    // ---------------------------------------------------------------------
    // Lifecycle
    // ---------------------------------------------------------------------

    /// Run the first load, then freeze structural keys.
    pub fn initialize(&self) {
        if self.is_initialized() {
            log::warn!("Context {} initialised twice", self.id);
            return;
        }
        self.load_config();
        let mut state = self.state.get();
        state.initialized = true;
        self.state.set(state);
        log::info!("Context {} initialised", self.id);
    }

    /// (Re)load theme and config. Returns false when a load is already
    /// running; the nested request is dropped.
    pub fn load_config(&self) -> bool {
        let mut state = self.state.get();
        if !state.begin_load() {
            log::warn!("Context {}: reload requested during load, ignored", self.id);
            return false;
        }
        self.state.set(state);

        if self.is_initialized() {
            self.store.borrow_mut().reset_keeping_structural();
        } else {
            self.store.borrow_mut().reset();
            if let Err(e) = self
                .store
                .borrow_mut()
                .set("shell", Value::from(paths::login_shell()))
            {
                log::warn!("Cannot set default shell: {}", e);
            }
        }
        self.release_script_handles();

        self.load_theme();
        self.run_config_script();
        self.apply_overrides();
        bridge::apply_all(&self.store, self.widget.as_ref());

        let mut state = self.state.get();
        state.finish_load();
        self.state.set(state);
        log::debug!("Context {}: config loaded", self.id);
        true
    }

    /// Reload only the theme. Outside a config load the result is pushed to
    /// the widget straight away.
    pub fn reload_theme(&self) {
        self.load_theme();
        if !self.is_loading() {
            bridge::apply_all(&self.store, self.widget.as_ref());
        }
    }

    /// Drop every script callback. Called on window close.
    pub fn shutdown(&self) {
        self.release_script_handles();
        log::debug!("Context {} shut down", self.id);
    }

    pub fn config_file(&self) -> ScriptSource {
        paths::resolve_script(
            self.args.options.config_file.as_deref(),
            paths::default_config_file(),
        )
    }

    pub fn theme_file(&self) -> ScriptSource {
        paths::resolve_script(
            self.args.options.theme_file.as_deref(),
            paths::default_theme_file(),
        )
    }

    fn load_theme(&self) {
        let source = self.theme_file();
        let Some(path) = source.path() else {
            log::debug!("Theme disabled");
            return;
        };
        if !path.exists() {
            log::debug!("No theme at {}", path.display());
            return;
        }

        let map = match self.runtime.eval_file(path) {
            Ok(ScriptValue::Map(map)) => map,
            Ok(other) => {
                self.report("Theme", &ScriptError::NotAMap(other.to_string()));
                return;
            }
            Err(e) => {
                self.report(&format!("Theme {}", path.display()), &e);
                return;
            }
        };

        let initialized = self.is_initialized();
        for (key, value) in map {
            let is_color = self
                .store
                .borrow()
                .meta()
                .lookup(&key)
                .is_some_and(|e| e.name.starts_with("color_"));
            match value {
                ScriptValue::Str(s) if is_color => {
                    let staged = bridge::stage(
                        &mut self.store.borrow_mut(),
                        initialized,
                        &key,
                        Value::String(s),
                    );
                    if let Err(e) = staged {
                        self.report("Theme", &e);
                    }
                }
                _ => log::warn!("Theme: skipping '{}' (not a colour key with a string value)", key),
            }
        }
    }

    /// Overlay the CLI values that pass the bridge checks.
    fn apply_overrides(&self) {
        let initialized = self.is_initialized();
        let mut accepted = OptionValues::default();
        for (key, value) in self.args.values.iter() {
            let checked = bridge::prepare(&self.store.borrow(), initialized, key, value.clone());
            match checked {
                Ok(Some(pending)) => accepted.insert(pending.key, pending.value),
                Ok(None) => {}
                Err(e) => self.report("Command line", &e),
            }
        }
        self.store.borrow_mut().apply_overrides(&accepted);
    }

    fn run_config_script(&self) {
        let source = self.config_file();
        let Some(path) = source.path() else {
            log::debug!("Config script disabled");
            return;
        };
        if !path.exists() {
            log::debug!("No config script at {}", path.display());
            return;
        }
        if let Err(e) = self.runtime.eval_file(path) {
            self.report(&format!("Config {}", path.display()), &e);
        }
    }

    fn release_script_handles(&self) {
        let mut handles = self.keymap.borrow_mut().clear();
        handles.extend(self.hooks.borrow_mut().clear());
        for handle in handles {
            self.runtime.release(handle);
        }
    }

    // ---------------------------------------------------------------------
    // Config access
    // ---------------------------------------------------------------------

    /// Read a key through the property bridge.
    pub fn get(&self, key: &str) -> Option<Value> {
        bridge::read(&self.store.borrow(), self.widget.as_ref(), key)
    }

    /// Write a key through the property bridge.
    pub fn set(&self, key: &str, value: Value) -> Result<(), BridgeError> {
        let initialized = self.is_initialized();
        bridge::write(
            &self.store,
            self.widget.as_ref(),
            initialized,
            key,
            value,
        )
    }

    pub fn default_of(&self, key: &str) -> Option<Value> {
        self.store.borrow().default_of(key)
    }

    /// Restore one key to its default through the bridge.
    pub fn reset_key(&self, key: &str) -> Result<(), BridgeError> {
        let default = self
            .default_of(key)
            .ok_or_else(|| hookterm_config::ConfigError::UnknownKey(key.to_string()))?;
        self.set(key, default)
    }

    /// Restore every key to its default through the bridge.
    pub fn reset_all(&self) {
        let keys: Vec<&'static str> = self.store.borrow().meta().keys().collect();
        for key in keys {
            if let Err(e) = self.reset_key(key) {
                log::warn!("Reset of '{}' failed: {}", key, e);
            }
        }
    }

    /// Every key with its current value, live keys read from the widget.
    pub fn snapshot(&self) -> Vec<(&'static str, Value)> {
        let keys: Vec<&'static str> = self.store.borrow().meta().keys().collect();
        keys.into_iter()
            .filter_map(|k| self.get(k).map(|v| (k, v)))
            .collect()
    }

    pub fn color_setting(&self, key: &str) -> ColorSetting {
        self.store.borrow().color_setting(key)
    }

    pub fn background_image(&self) -> Option<PathBuf> {
        self.store.borrow().path_setting("background_image")
    }

    /// The raw stored value, bypassing live getters.
    pub fn stored(&self, key: &str) -> Option<Value> {
        self.store.borrow().get(key)
    }

    // ---------------------------------------------------------------------
    // Keymap and hooks
    // ---------------------------------------------------------------------

    /// Bind `accel` to a callback. A displaced callback is released.
    pub fn bind_key(&self, accel: &str, handle: CallbackHandle) -> Result<(), ParseError> {
        let displaced = self.keymap.borrow_mut().bind(accel, handle)?;
        if let Some(old) = displaced {
            self.runtime.release(old);
        }
        Ok(())
    }

    /// Remove a binding. Returns whether one existed.
    pub fn unbind_key(&self, accel: &str) -> Result<bool, ParseError> {
        let removed = self.keymap.borrow_mut().unbind(accel)?;
        Ok(match removed {
            Some(old) => {
                self.runtime.release(old);
                true
            }
            None => false,
        })
    }

    pub fn reset_keymap(&self) {
        let handles = self.keymap.borrow_mut().clear();
        for handle in handles {
            self.runtime.release(handle);
        }
    }

    pub fn keymap_len(&self) -> usize {
        self.keymap.borrow().len()
    }

    /// Install a hook callback by name. A replaced callback is released.
    pub fn set_hook(&self, name: &str, handle: CallbackHandle) -> Result<(), UnknownHook> {
        let previous = self.hooks.borrow_mut().set_by_name(name, handle)?;
        if let Some(old) = previous {
            self.runtime.release(old);
        }
        Ok(())
    }

    pub fn hook(&self, hook: HookName) -> Option<CallbackHandle> {
        self.hooks.borrow().get(hook)
    }

    // ---------------------------------------------------------------------
    // Script evaluation
    // ---------------------------------------------------------------------

    pub fn eval(&self, source: &str) -> Result<ScriptValue, ScriptError> {
        self.runtime.eval(source)
    }

    pub fn eval_file(&self, path: &Path) -> Result<ScriptValue, ScriptError> {
        self.runtime.eval_file(path)
    }

    /// Log a recoverable user error and surface it as a notification.
    pub fn report(&self, what: &str, err: &dyn fmt::Display) {
        log::warn!("Context {}: {}: {}", self.id, what, err);
        self.notifier
            .notify(DEFAULT_TITLE, &format!("{what}: {err}"));
    }

    pub fn notify(&self, title: &str, body: &str) {
        self.notifier.notify(title, body);
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("id", &self.id)
            .field("state", &self.state.get())
            .field("bindings", &self.keymap_len())
            .finish_non_exhaustive()
    }
}

//! Scriptable terminal core.
//!
//! Each window gets a [`Context`](context::Context) holding its typed config
//! store, keymap, hook table and Rhai runtime. Config and theme scripts drive
//! the context through the builtins in `builtins`; the property bridge keeps
//! the store and the widget in step; the [`App`](app::App) routes IPC
//! requests to contexts.

/// Application version (root crate version, for use by sub-crates).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod app;
pub mod bridge;
mod builtins;
pub mod cli;
pub mod context;
pub mod debug;
pub mod ipc_handlers;
pub mod notify;
pub mod shell_quote;
pub mod widget;

pub use app::App;
pub use bridge::BridgeError;
pub use context::{Context, LoadState};
pub use widget::{ColorChoice, HeadlessWidget, TerminalWidget};

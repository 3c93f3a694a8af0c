//! Scripting support for hookterm.
//!
//! Provides the [`ScriptRuntime`] abstraction with its Rhai implementation,
//! opaque callback handles for script functions held by the host, and the
//! hook table that maps terminal events to those callbacks.

pub mod error;
pub mod handle;
pub mod hooks;
pub mod rhai_runtime;
pub mod runtime;
pub mod value;

pub use error::ScriptError;
pub use handle::CallbackHandle;
pub use hooks::{HookName, HookOutcome, HookTable, UnknownHook, dispatch};
pub use rhai_runtime::{CallbackRegistrar, RhaiRuntime};
pub use runtime::ScriptRuntime;
pub use value::ScriptValue;

/// Re-exported so host crates register functions against the same version.
pub use rhai;

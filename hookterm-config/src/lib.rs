//! Configuration schema and storage for hookterm.
//!
//! This crate provides:
//!
//! - The meta registry describing every configurable key
//! - The typed per-context config store
//! - Command line parsing generated from the registry
//! - Colour parsing and enum-like setting types
//! - Config, theme and socket path resolution

pub mod color;
pub mod error;
pub mod live;
pub mod meta;
pub mod options;
pub mod paths;
pub mod store;
pub mod types;
pub mod value;

pub use color::{ColorParseError, DEFAULT_PALETTE, Rgba, parse_color};
pub use error::{ConfigError, OptionError};
pub use live::{ColorRole, Live, LiveProperty};
pub use meta::{CliFlag, CliVisibility, MetaEntry, MetaRegistry, PALETTE_KEYS};
pub use options::{CliOptions, OptionValues, ParsedArgs, parse_args};
pub use paths::ScriptSource;
pub use store::{ColorSetting, ConfigStore, NONE_SENTINEL};
pub use types::{CjkWidth, CursorBlinkMode, CursorShape, InvalidEnumValue};
pub use value::{Value, ValueType};

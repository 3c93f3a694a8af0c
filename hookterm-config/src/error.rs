//! Typed error variants for the hookterm-config crate.

use crate::value::ValueType;
use thiserror::Error;

/// Errors raised by the config store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The key is not declared in the schema (or is documentation-only).
    #[error("unknown config key '{0}'")]
    UnknownKey(String),

    /// The value's type does not match the declared type.
    #[error("config key '{key}' expects {expected}, got {actual}")]
    TypeMismatch {
        key: String,
        expected: ValueType,
        actual: ValueType,
    },
}

/// Errors raised while parsing process arguments.
#[derive(Debug, Clone, Error)]
pub enum OptionError {
    /// Malformed arguments. Fatal: print and exit non-zero.
    #[error("{0}")]
    Invalid(String),

    /// `--help` was requested; carries the rendered help text.
    #[error("{0}")]
    Help(String),
}

//! Error types for script evaluation.

use crate::handle::CallbackHandle;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScriptError {
    /// Parse or evaluation failure reported by the runtime.
    #[error("{0}")]
    Runtime(String),

    #[error("failed to read script {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The script evaluated to unit where a value was required.
    #[error("script produced no result")]
    NoResult,

    /// The script evaluated to something other than a map.
    #[error("script must evaluate to a map, got {0}")]
    NotAMap(String),

    #[error("unknown callback {0}")]
    UnknownCallback(CallbackHandle),
}

impl From<Box<rhai::EvalAltResult>> for ScriptError {
    fn from(err: Box<rhai::EvalAltResult>) -> Self {
        ScriptError::Runtime(err.to_string())
    }
}

impl From<rhai::ParseError> for ScriptError {
    fn from(err: rhai::ParseError) -> Self {
        ScriptError::Runtime(err.to_string())
    }
}

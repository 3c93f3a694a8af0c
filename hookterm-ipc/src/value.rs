//! IPC payload values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A parameter or response value carried over IPC.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum IpcValue {
    #[default]
    Unit,
    Bool(bool),
    Int(i64),
    Str(String),
    Tuple(Vec<IpcValue>),
}

impl IpcValue {
    /// Build a parameter from `-p` command line values: none gives unit,
    /// one gives a string, several give a tuple of strings.
    pub fn from_params(params: Vec<String>) -> Self {
        match params.len() {
            0 => IpcValue::Unit,
            1 => params
                .into_iter()
                .next()
                .map(IpcValue::Str)
                .unwrap_or_default(),
            _ => IpcValue::Tuple(params.into_iter().map(IpcValue::Str).collect()),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            IpcValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_unit(&self) -> bool {
        matches!(self, IpcValue::Unit)
    }

    /// The empty tuple, used as the "no result" response.
    pub fn empty_tuple() -> Self {
        IpcValue::Tuple(Vec::new())
    }
}

impl fmt::Display for IpcValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IpcValue::Unit => f.write_str("()"),
            IpcValue::Bool(b) => write!(f, "{b}"),
            IpcValue::Int(i) => write!(f, "{i}"),
            IpcValue::Str(s) => f.write_str(s),
            IpcValue::Tuple(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str(")")
            }
        }
    }
}

impl From<&str> for IpcValue {
    fn from(s: &str) -> Self {
        IpcValue::Str(s.to_string())
    }
}

impl From<String> for IpcValue {
    fn from(s: String) -> Self {
        IpcValue::Str(s)
    }
}

impl From<i64> for IpcValue {
    fn from(i: i64) -> Self {
        IpcValue::Int(i)
    }
}

impl From<bool> for IpcValue {
    fn from(b: bool) -> Self {
        IpcValue::Bool(b)
    }
}

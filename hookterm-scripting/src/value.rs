//! Host-side view of script values.

use rhai::{Array, Dynamic, Map};
use std::collections::BTreeMap;
use std::fmt;

/// A value crossing the script boundary.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ScriptValue {
    #[default]
    Unit,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Array(Vec<ScriptValue>),
    Map(BTreeMap<String, ScriptValue>),
}

impl ScriptValue {
    /// Convert from a runtime value. Types without a host equivalent are
    /// rendered to their string form.
    pub fn from_dynamic(value: &Dynamic) -> Self {
        if value.is_unit() {
            return ScriptValue::Unit;
        }
        if let Ok(b) = value.as_bool() {
            return ScriptValue::Bool(b);
        }
        if let Ok(i) = value.as_int() {
            return ScriptValue::Int(i);
        }
        if let Ok(f) = value.as_float() {
            return ScriptValue::Float(f);
        }
        if let Ok(c) = value.as_char() {
            return ScriptValue::Str(c.to_string());
        }
        if value.is_string() {
            return ScriptValue::Str(value.to_string());
        }
        if let Some(items) = value.clone().try_cast::<Array>() {
            return ScriptValue::Array(items.iter().map(ScriptValue::from_dynamic).collect());
        }
        if let Some(map) = value.clone().try_cast::<Map>() {
            return ScriptValue::Map(
                map.iter()
                    .map(|(k, v)| (k.to_string(), ScriptValue::from_dynamic(v)))
                    .collect(),
            );
        }
        ScriptValue::Str(value.to_string())
    }

    pub fn into_dynamic(self) -> Dynamic {
        match self {
            ScriptValue::Unit => Dynamic::UNIT,
            ScriptValue::Bool(b) => Dynamic::from(b),
            ScriptValue::Int(i) => Dynamic::from(i),
            ScriptValue::Float(f) => Dynamic::from(f),
            ScriptValue::Str(s) => Dynamic::from(s),
            ScriptValue::Array(items) => {
                Dynamic::from_array(items.into_iter().map(ScriptValue::into_dynamic).collect())
            }
            ScriptValue::Map(map) => Dynamic::from_map(
                map.into_iter()
                    .map(|(k, v)| (k.into(), v.into_dynamic()))
                    .collect(),
            ),
        }
    }

    pub fn is_unit(&self) -> bool {
        matches!(self, ScriptValue::Unit)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ScriptValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ScriptValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

/// Strings render bare at the top level and quoted inside collections.
impl fmt::Display for ScriptValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptValue::Unit => f.write_str("()"),
            ScriptValue::Bool(b) => write!(f, "{b}"),
            ScriptValue::Int(i) => write!(f, "{i}"),
            ScriptValue::Float(x) => write!(f, "{x}"),
            ScriptValue::Str(s) => f.write_str(s),
            ScriptValue::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    fmt_nested(item, f)?;
                }
                f.write_str("]")
            }
            ScriptValue::Map(map) => {
                f.write_str("#{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: ")?;
                    fmt_nested(v, f)?;
                }
                f.write_str("}")
            }
        }
    }
}

fn fmt_nested(value: &ScriptValue, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match value {
        ScriptValue::Str(s) => write!(f, "{s:?}"),
        other => write!(f, "{other}"),
    }
}

impl From<&str> for ScriptValue {
    fn from(s: &str) -> Self {
        ScriptValue::Str(s.to_string())
    }
}

impl From<String> for ScriptValue {
    fn from(s: String) -> Self {
        ScriptValue::Str(s)
    }
}

impl From<i64> for ScriptValue {
    fn from(i: i64) -> Self {
        ScriptValue::Int(i)
    }
}

impl From<bool> for ScriptValue {
    fn from(b: bool) -> Self {
        ScriptValue::Bool(b)
    }
}

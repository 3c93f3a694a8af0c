//! Typed per-context configuration store.

use crate::error::ConfigError;
use crate::meta::MetaRegistry;
use crate::options::OptionValues;
use crate::value::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

/// Sentinel string that explicitly disables a string setting.
pub const NONE_SENTINEL: &str = "NONE";

/// Three-way reading of a colour-family key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorSetting {
    /// Empty string: use the widget's built-in default.
    Default,
    /// `NONE`: explicitly disable the role.
    Disabled,
    Value(String),
}

/// Key to value table holding exactly one value per real schema key.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    meta: Arc<MetaRegistry>,
    values: HashMap<&'static str, Value>,
}

impl ConfigStore {
    /// Create a store populated with every default.
    pub fn new(meta: Arc<MetaRegistry>) -> Self {
        let mut store = Self {
            meta,
            values: HashMap::new(),
        };
        store.reset();
        store
    }

    pub fn meta(&self) -> &Arc<MetaRegistry> {
        &self.meta
    }

    /// Restore every key to its compiled default.
    pub fn reset(&mut self) {
        self.values.clear();
        for entry in self.meta.entries() {
            if let Some(default) = entry.default_value() {
                self.values.insert(entry.name, default);
            }
        }
    }

    /// Current value of `key`.
    ///
    /// Returns `None` for keys outside the schema. A schema key missing from
    /// the table is an internal error: it is logged and the type's zero value
    /// is returned.
    pub fn get(&self, key: &str) -> Option<Value> {
        let entry = self.meta.lookup(key)?;
        match self.values.get(entry.name) {
            Some(v) => Some(v.clone()),
            None => {
                log::warn!("Config key '{}' has no stored value", key);
                entry.value_type.zero()
            }
        }
    }

    /// String value, or `""` when the key is unknown or not a string.
    pub fn get_str(&self, key: &str) -> String {
        match self.get(key) {
            Some(Value::String(s)) => s,
            _ => String::new(),
        }
    }

    pub fn get_int(&self, key: &str) -> i64 {
        self.get(key).and_then(|v| v.as_int()).unwrap_or(0)
    }

    pub fn get_bool(&self, key: &str) -> bool {
        self.get(key).and_then(|v| v.as_bool()).unwrap_or(false)
    }

    /// Store `value` under `key`.
    ///
    /// Unknown keys and type mismatches are rejected before anything is
    /// written.
    pub fn set(&mut self, key: &str, value: Value) -> Result<(), ConfigError> {
        let entry = self
            .meta
            .lookup(key)
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
        if value.value_type() != entry.value_type {
            return Err(ConfigError::TypeMismatch {
                key: key.to_string(),
                expected: entry.value_type,
                actual: value.value_type(),
            });
        }
        self.values.insert(entry.name, value);
        Ok(())
    }

    /// Restore every key to its default except structural ones, which keep
    /// their current value.
    pub fn reset_keeping_structural(&mut self) {
        let kept: Vec<(&'static str, Value)> = self
            .meta
            .entries()
            .iter()
            .filter(|e| e.live.is_structural())
            .filter_map(|e| self.values.get(e.name).map(|v| (e.name, v.clone())))
            .collect();
        self.reset();
        self.values.extend(kept);
    }

    /// Restore a single key to its default.
    pub fn reset_key(&mut self, key: &str) -> Result<(), ConfigError> {
        let default = self
            .default_of(key)
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
        self.set(key, default)
    }

    /// Compiled default of `key`.
    pub fn default_of(&self, key: &str) -> Option<Value> {
        self.meta.lookup(key).and_then(|e| e.default_value())
    }

    /// Overlay parsed CLI values. Absent keys are left untouched.
    pub fn apply_overrides(&mut self, overrides: &OptionValues) {
        for (key, value) in overrides.iter() {
            if let Err(e) = self.set(key, value.clone()) {
                log::warn!("Ignoring command line override: {}", e);
            }
        }
    }

    /// True when `key` holds a string that is neither empty nor `NONE`.
    pub fn has_string(&self, key: &str) -> bool {
        match self.get(key) {
            Some(Value::String(s)) => !s.is_empty() && s != NONE_SENTINEL,
            _ => false,
        }
    }

    pub fn color_setting(&self, key: &str) -> ColorSetting {
        let s = self.get_str(key);
        if s.is_empty() {
            ColorSetting::Default
        } else if s == NONE_SENTINEL {
            ColorSetting::Disabled
        } else {
            ColorSetting::Value(s)
        }
    }

    /// Path held by a path-like key; `None` for `""` and `NONE`.
    ///
    /// A leading `~/` is expanded to the home directory.
    pub fn path_setting(&self, key: &str) -> Option<PathBuf> {
        if !self.has_string(key) {
            return None;
        }
        let s = self.get_str(key);
        if let Some(rest) = s.strip_prefix("~/")
            && let Some(home) = dirs::home_dir()
        {
            return Some(home.join(rest));
        }
        Some(PathBuf::from(s))
    }

    /// Every key and its value in schema order.
    pub fn snapshot(&self) -> Vec<(&'static str, Value)> {
        self.meta
            .keys()
            .filter_map(|k| self.get(k).map(|v| (k, v)))
            .collect()
    }
}

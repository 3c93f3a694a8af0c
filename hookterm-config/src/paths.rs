//! Filesystem locations used by hookterm.

use crate::store::NONE_SENTINEL;
use std::path::PathBuf;

/// Environment variable overriding the config directory.
pub const CONFIG_DIR_ENV: &str = "HOOKTERM_CONFIG_DIR";

/// Environment variable overriding the IPC socket path.
pub const SOCKET_PATH_ENV: &str = "HOOKTERM_SOCKET_PATH";

/// Environment variable exported to child processes with the context id.
pub const CONTEXT_ID_ENV: &str = "HOOKTERM_ID";

pub const CONFIG_FILE_NAME: &str = "config.rhai";
pub const THEME_FILE_NAME: &str = "theme.rhai";
const SOCKET_FILE_NAME: &str = "hookterm.sock";

/// Where a config or theme script comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptSource {
    /// Disabled with `NONE`.
    Disabled,
    File(PathBuf),
}

impl ScriptSource {
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            ScriptSource::Disabled => None,
            ScriptSource::File(p) => Some(p),
        }
    }
}

/// Non-empty value of an environment variable.
fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var_os(name)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// `$HOOKTERM_CONFIG_DIR`, else `<config dir>/hookterm`.
pub fn config_dir() -> PathBuf {
    env_path(CONFIG_DIR_ENV).unwrap_or_else(|| {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("hookterm")
    })
}

pub fn default_config_file() -> PathBuf {
    config_dir().join(CONFIG_FILE_NAME)
}

pub fn default_theme_file() -> PathBuf {
    config_dir().join(THEME_FILE_NAME)
}

/// Resolve a `--use`/`--theme` override against its default location.
pub fn resolve_script(override_path: Option<&str>, default: PathBuf) -> ScriptSource {
    match override_path {
        Some(NONE_SENTINEL) => ScriptSource::Disabled,
        Some(p) => ScriptSource::File(PathBuf::from(p)),
        None => ScriptSource::File(default),
    }
}

/// `$HOOKTERM_SOCKET_PATH`, else `<runtime dir>/hookterm.sock`.
///
/// Falls back to the temp directory where no runtime directory exists.
pub fn socket_path() -> PathBuf {
    env_path(SOCKET_PATH_ENV).unwrap_or_else(|| {
        dirs::runtime_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join(SOCKET_FILE_NAME)
    })
}

/// The user's login shell: `$SHELL`, else `/bin/sh`.
pub fn login_shell() -> String {
    std::env::var("SHELL")
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "/bin/sh".to_string())
}

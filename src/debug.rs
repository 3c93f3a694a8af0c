use parking_lot::Mutex;
/// Logging infrastructure for hookterm
///
/// Routes every `log::info!()` etc. to /tmp/hookterm_debug.log on Unix/macOS,
/// or %TEMP%\hookterm_debug.log on Windows, keeping diagnostics out of the
/// terminal's own stdout/stderr. When RUST_LOG is set the records are also
/// mirrored to stderr.
///
/// Level precedence: `--log-level`, then RUST_LOG, then DEBUG_LEVEL (0-4),
/// then `warn`.
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

/// Path of the debug log file.
pub fn log_file_path() -> PathBuf {
    #[cfg(unix)]
    let log_path = PathBuf::from("/tmp/hookterm_debug.log");
    #[cfg(windows)]
    let log_path = std::env::temp_dir().join("hookterm_debug.log");
    log_path
}

/// Map the legacy numeric DEBUG_LEVEL to a filter.
fn level_from_debug_env(val: &str) -> Option<log::LevelFilter> {
    match val.trim().parse::<u8>().ok()? {
        0 => Some(log::LevelFilter::Off),
        1 => Some(log::LevelFilter::Error),
        2 => Some(log::LevelFilter::Info),
        3 => Some(log::LevelFilter::Debug),
        4 => Some(log::LevelFilter::Trace),
        _ => None,
    }
}

/// Resolve the effective level from the CLI flag and environment values.
pub fn resolve_level(
    cli: Option<&str>,
    rust_log: Option<&str>,
    debug_level: Option<&str>,
) -> log::LevelFilter {
    cli.and_then(|s| log::LevelFilter::from_str(s).ok())
        .or_else(|| rust_log.and_then(|s| log::LevelFilter::from_str(s.trim()).ok()))
        .or_else(|| debug_level.and_then(level_from_debug_env))
        .unwrap_or(log::LevelFilter::Warn)
}

struct LogBridge {
    level: log::LevelFilter,
    file: Option<Mutex<File>>,
    mirror_stderr: bool,
}

impl log::Log for LogBridge {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!(
            "[{}] [{:<5}] [{}] {}\n",
            get_timestamp(),
            record.level(),
            record.target(),
            record.args()
        );
        if let Some(file) = &self.file {
            let mut file = file.lock();
            let _ = file.write_all(line.as_bytes());
        }
        if self.mirror_stderr {
            eprint!("{line}");
        }
    }

    fn flush(&self) {
        if let Some(file) = &self.file {
            let _ = file.lock().flush();
        }
    }
}

static BRIDGE: OnceLock<LogBridge> = OnceLock::new();

fn get_timestamp() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}.{:06}", now.as_secs(), now.subsec_micros())
}

/// Install the log bridge. Later calls are no-ops.
pub fn init_log_bridge(cli_level: Option<&str>) {
    let rust_log = std::env::var("RUST_LOG").ok();
    let debug_level = std::env::var("DEBUG_LEVEL").ok();
    let level = resolve_level(cli_level, rust_log.as_deref(), debug_level.as_deref());

    let bridge = BRIDGE.get_or_init(|| {
        // Silently run without a file if it can't be opened
        let file = if level == log::LevelFilter::Off {
            None
        } else {
            OpenOptions::new()
                .write(true)
                .truncate(true)
                .create(true)
                .open(log_file_path())
                .ok()
                .map(|mut f| {
                    let _ = writeln!(
                        f,
                        "{}\nhookterm session started at {} (level={})\n{}",
                        "=".repeat(80),
                        get_timestamp(),
                        level,
                        "=".repeat(80)
                    );
                    Mutex::new(f)
                })
        };
        LogBridge {
            level,
            file,
            mirror_stderr: rust_log.is_some(),
        }
    });

    if log::set_logger(bridge).is_ok() {
        log::set_max_level(bridge.level);
    }
}

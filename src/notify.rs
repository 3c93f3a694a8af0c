//! User-facing error notifications.
//!
//! Recoverable user errors (a config script that fails, a bad colour) are
//! logged and also surfaced through a [`Notifier`]. The desktop notifier
//! uses:
//! - **macOS**: `osascript` AppleScript `display notification` command
//! - **Windows / Linux**: the `notify_rust` crate

/// Sink for in-app notifications.
pub trait Notifier {
    fn notify(&self, title: &str, body: &str);
}

/// Title used when the caller gives none.
pub const DEFAULT_TITLE: &str = "hookterm";

const TIMEOUT_MS: u32 = 5000;

/// Escape a string for embedding inside an AppleScript double-quoted string.
///
/// Backslashes must be escaped first so the later replacements are not
/// double-escaped.
pub fn escape_for_applescript(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}

/// Native desktop notifications. Fire-and-forget: failures are logged.
#[derive(Debug, Default, Clone, Copy)]
pub struct DesktopNotifier;

impl Notifier for DesktopNotifier {
    fn notify(&self, title: &str, body: &str) {
        let title = if title.is_empty() { DEFAULT_TITLE } else { title };

        #[cfg(not(target_os = "macos"))]
        {
            use notify_rust::Notification;
            if let Err(e) = Notification::new()
                .summary(title)
                .body(body)
                .appname(DEFAULT_TITLE)
                .timeout(notify_rust::Timeout::Milliseconds(TIMEOUT_MS))
                .show()
            {
                log::warn!("Failed to send desktop notification: {}", e);
            }
        }

        #[cfg(target_os = "macos")]
        {
            let _ = TIMEOUT_MS; // macOS duration is controlled by the OS
            let script = format!(
                r#"display notification "{}" with title "{}""#,
                escape_for_applescript(body),
                escape_for_applescript(title),
            );
            if let Err(e) = std::process::Command::new("osascript")
                .arg("-e")
                .arg(&script)
                .output()
            {
                log::warn!("Failed to send macOS desktop notification: {}", e);
            }
        }
    }
}

/// Notifications that only reach the log. Used headless and in the daemon
/// when no desktop session is present.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, title: &str, body: &str) {
        log::warn!("[{}] {}", if title.is_empty() { DEFAULT_TITLE } else { title }, body);
    }
}

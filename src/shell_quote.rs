//! Shell quoting for paths dropped onto the terminal.

/// Characters that need quoting in POSIX shells.
const SHELL_SPECIAL_CHARS: &[char] = &[
    ' ', '\t', '\n', '\r', // Whitespace
    '\'', '"', '`', // Quotes and backticks
    '$', '!', '&', '|', // Expansion and control operators
    ';', '(', ')', '{', '}', '[', ']', // Grouping and subshell
    '<', '>', // Redirection
    '*', '?', // Globs
    '\\', '#', '~', '^', // Escape, comment, home, history
];

fn needs_quoting(path: &str) -> bool {
    path.chars().any(|c| SHELL_SPECIAL_CHARS.contains(&c))
}

/// Quote `path` for typing into a shell.
///
/// Plain paths pass through. Anything else is single-quoted, with embedded
/// single quotes written as `'\''`.
pub fn quote_path(path: &str) -> String {
    if path.is_empty() {
        return "''".to_string();
    }
    if !needs_quoting(path) {
        return path.to_string();
    }
    format!("'{}'", path.replace('\'', "'\\''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_path_unchanged() {
        assert_eq!(quote_path("/usr/bin/env"), "/usr/bin/env");
    }

    #[test]
    fn test_spaces_and_quotes() {
        assert_eq!(quote_path("/tmp/my file"), "'/tmp/my file'");
        assert_eq!(quote_path("it's"), "'it'\\''s'");
    }

    #[test]
    fn test_empty() {
        assert_eq!(quote_path(""), "''");
    }
}

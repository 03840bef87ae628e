//! Engine tuning knobs and the tiny directive-file format used to seed a
//! user [`MapSet`](crate::mapset::MapSet) at startup.
//!
//! The line format is deliberately minimal — grounded in the old
//! `Config::load_str` line-oriented parser this crate grew out of, which
//! tolerated blank lines and `#`-comments and returned parse problems
//! alongside the parsed result rather than failing the whole load.

/// Sentinel meaning "never time out" for [`EngineConfig`]'s timeout fields.
///
/// The original C engine represented "forever" by letting an unsigned
/// timeout computation wrap around, which is easy to get wrong by accident.
/// This crate names the sentinel instead.
pub const FOREVER_MS: u64 = u64::MAX;

/// Tuning knobs for one [`crate::key_manager::KeyManager`].
///
/// `escape_timeout_ms` bounds how long the terminal-escape layer waits for
/// more bytes after a partial (but live) trie match before giving up and
/// replaying what it has; `macro_timeout_ms` is the same knob for the user
/// macro layer. Either may be [`FOREVER_MS`] to disable the timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub escape_timeout_ms: u64,
    pub macro_timeout_ms: u64,
}

impl Default for EngineConfig {
    /// 40ms for escape disambiguation (long enough to catch a real
    /// multi-byte escape sequence arriving over a slow link, short enough
    /// that a lone Escape keypress doesn't feel sluggish); 1000ms for
    /// macro chords, which are typed deliberately rather than emitted by a
    /// terminal in one burst.
    fn default() -> Self {
        Self { escape_timeout_ms: 40, macro_timeout_ms: 1000 }
    }
}

/// One line of a directive file, after comment/blank-line filtering, with
/// its 1-based line number for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveWarning {
    pub line: usize,
    pub text: String,
    pub message: String,
}

impl std::fmt::Display for DirectiveWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {} ({:?})", self.line, self.message, self.text)
    }
}

/// Parse a directive file of the form:
///
/// ```text
/// # comment
/// map <key> <value>
/// ```
///
/// Blank lines and lines starting with `#` are ignored. A `map` line must
/// have exactly a key and a value token separated by whitespace, with the
/// value taking the remainder of the line (so values may themselves
/// contain further whitespace-separated tokens, e.g. `map <F1> help topics`).
/// Lines that don't parse are collected as warnings rather than aborting
/// the whole file, matching the old config loader's "best effort" stance.
pub fn parse_map_directives(text: &str) -> (Vec<(String, String)>, Vec<DirectiveWarning>) {
    let mut directives = Vec::new();
    let mut warnings = Vec::new();

    for (idx, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut parts = line.splitn(3, char::is_whitespace);
        let keyword = parts.next().unwrap_or("");
        if keyword != "map" {
            warnings.push(DirectiveWarning {
                line: idx + 1,
                text: raw_line.to_owned(),
                message: format!("unrecognized directive {keyword:?}"),
            });
            continue;
        }

        let rest = line[keyword.len()..].trim_start();
        let mut rest_parts = rest.splitn(2, char::is_whitespace);
        let key = rest_parts.next().unwrap_or("").to_owned();
        let value = rest_parts.next().unwrap_or("").trim_start().to_owned();

        if key.is_empty() || value.is_empty() {
            warnings.push(DirectiveWarning {
                line: idx + 1,
                text: raw_line.to_owned(),
                message: "map directive needs a key and a value".to_owned(),
            });
            continue;
        }

        directives.push((key, value));
    }

    (directives, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_timeouts_are_finite() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.escape_timeout_ms, 40);
        assert_eq!(cfg.macro_timeout_ms, 1000);
    }

    #[test]
    fn parses_simple_map_lines() {
        let text = "# comment\nmap <F1> help\n\nmap <C-x><C-c> quit\n";
        let (directives, warnings) = parse_map_directives(text);
        assert!(warnings.is_empty());
        assert_eq!(
            directives,
            vec![
                ("<F1>".to_owned(), "help".to_owned()),
                ("<C-x><C-c>".to_owned(), "quit".to_owned()),
            ]
        );
    }

    #[test]
    fn value_may_contain_further_whitespace() {
        let (directives, warnings) = parse_map_directives("map <F2> run all tests\n");
        assert!(warnings.is_empty());
        assert_eq!(directives, vec![("<F2>".to_owned(), "run all tests".to_owned())]);
    }

    #[test]
    fn malformed_lines_become_warnings_not_failures() {
        let (directives, warnings) = parse_map_directives("bogus line\nmap onlykey\nmap <F3> ok\n");
        assert_eq!(directives, vec![("<F3>".to_owned(), "ok".to_owned())]);
        assert_eq!(warnings.len(), 2);
        assert_eq!(warnings[0].line, 1);
        assert_eq!(warnings[1].line, 2);
    }
}

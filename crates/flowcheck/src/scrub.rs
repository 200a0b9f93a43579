//! Removal of Flow server noise from status output.

use crate::error::{FlowError, Result};
use regex::Regex;

/// Ordered set of compiled ignore-line patterns.
///
/// Each prefix is matched literally from the start of a line through the end
/// of that line. Matching lines are blanked in place, so the line structure of
/// the output is kept.
#[derive(Debug, Clone)]
pub struct IgnoreLines {
    patterns: Vec<Regex>,
}

impl IgnoreLines {
    /// Compile the given prefixes, preserving their order.
    pub fn compile<S: AsRef<str>>(prefixes: &[S]) -> Result<Self> {
        let patterns = prefixes
            .iter()
            .map(|prefix| {
                let prefix = prefix.as_ref();
                // CRLF mode keeps `.` and `$` off the `\r` of Windows line endings.
                Regex::new(&format!("(?mR)^{}.*$", regex::escape(prefix))).map_err(|source| {
                    FlowError::InvalidIgnorePattern {
                        prefix: prefix.to_string(),
                        source,
                    }
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// Number of compiled patterns.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Blank every line that starts with one of the prefixes.
    ///
    /// Patterns are applied one after another, each to the text left by the
    /// previous pass.
    pub fn scrub(&self, text: &str) -> String {
        self.patterns
            .iter()
            .fold(text.to_string(), |acc, pattern| {
                pattern.replace_all(&acc, "").into_owned()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> IgnoreLines {
        IgnoreLines::compile(&crate::options::default_ignore_lines()).expect("compile")
    }

    #[test]
    fn test_matching_line_is_blanked_not_removed() {
        let out = defaults().scrub("Found 1 error\nLaunching Flow server (pid 123)\n");
        assert_eq!(out, "Found 1 error\n\n");
    }

    #[test]
    fn test_non_matching_lines_preserved_verbatim() {
        let text = "src/a.js:3\n  Cannot call `foo`\n\nFound 1 error\n";
        assert_eq!(defaults().scrub(text), text);
    }

    #[test]
    fn test_prefix_must_start_the_line() {
        let text = "note: Please wait for it\n";
        assert_eq!(defaults().scrub(text), text);
    }

    #[test]
    fn test_all_default_prefixes_blanked() {
        let text = "Please wait. Server is initializing\n\
                    Launching Flow server for /app\n\
                    Spawned flow server (pid=42)\n\
                    Logs will go to /tmp/flow.log\n\
                    Monitor logs will go to /tmp/flow.monitor_log\n\
                    Started a new flow server: -\n\
                    No errors!\n";
        assert_eq!(defaults().scrub(text), "\n\n\n\n\n\nNo errors!\n");
    }

    #[test]
    fn test_prefix_is_literal_not_regex() {
        let ignore = IgnoreLines::compile(&["a.c"]).expect("compile");
        assert_eq!(ignore.scrub("abc\na.c tail\n"), "abc\n\n");
    }

    #[test]
    fn test_crlf_line_endings_keep_carriage_return_structure() {
        let out = defaults().scrub("Please wait\r\nFound 0 errors\r\n");
        assert_eq!(out, "\r\nFound 0 errors\r\n");
    }

    #[test]
    fn test_later_pass_runs_over_blanked_text() {
        // "" matches every line, including the one blanked by "A".
        let ignore = IgnoreLines::compile(&["A", ""]).expect("compile");
        assert_eq!(ignore.len(), 2);
        assert_eq!(ignore.scrub("A\nB\n"), "\n\n");
    }

    #[test]
    fn test_empty_pattern_set_is_identity() {
        let ignore = IgnoreLines::compile::<&str>(&[]).expect("compile");
        assert!(ignore.is_empty());
        assert_eq!(ignore.scrub("Please wait\n"), "Please wait\n");
    }
}

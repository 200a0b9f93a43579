//! Checker options and the options file.

use crate::checker::Classification;
use crate::error::{FlowError, Result};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Programmatic message formatter, taking precedence over `format`.
pub type ErrorFormatter = Arc<dyn Fn(&Classification) -> String + Send + Sync>;

/// Default flags passed to the `flow` binary.
pub fn default_flags() -> Vec<String> {
    vec!["status".to_string(), "--color=always".to_string()]
}

/// Server lifecycle messages that carry no diagnostic value.
pub fn default_ignore_lines() -> Vec<String> {
    [
        "Please wait",
        "Launching Flow server",
        "Spawned flow server",
        "Logs will go to",
        "Monitor logs will go to",
        "Started a new flow server",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Options for [`StatusChecker`](crate::StatusChecker).
///
/// Deserialized from JSON with camelCase keys. Keys that are absent keep their
/// default; keys that are present replace it.
#[derive(Clone, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct FlowOptions {
    /// Report failures as warnings instead of errors.
    pub warn: bool,

    /// Flags passed to the tool.
    pub flags: Vec<String>,

    /// Line prefixes blanked from the tool output.
    pub ignore_lines: Vec<String>,

    /// Executable to invoke.
    pub bin: PathBuf,

    /// Message template with `{category}`, `{status}` and `{details}` placeholders.
    pub format: Option<String>,

    #[serde(skip)]
    formatter: Option<ErrorFormatter>,
}

impl Default for FlowOptions {
    fn default() -> Self {
        Self {
            warn: false,
            flags: default_flags(),
            ignore_lines: default_ignore_lines(),
            bin: PathBuf::from("flow"),
            format: None,
            formatter: None,
        }
    }
}

impl fmt::Debug for FlowOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlowOptions")
            .field("warn", &self.warn)
            .field("flags", &self.flags)
            .field("ignore_lines", &self.ignore_lines)
            .field("bin", &self.bin)
            .field("format", &self.format)
            .field("formatter", &self.formatter.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

impl FlowOptions {
    /// Load options from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| FlowError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw).map_err(|source| FlowError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse options from a JSON string.
    pub fn from_json(raw: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn with_warn(mut self, warn: bool) -> Self {
        self.warn = warn;
        self
    }

    pub fn with_flags(mut self, flags: Vec<String>) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_ignore_lines(mut self, ignore_lines: Vec<String>) -> Self {
        self.ignore_lines = ignore_lines;
        self
    }

    pub fn with_bin(mut self, bin: impl Into<PathBuf>) -> Self {
        self.bin = bin.into();
        self
    }

    pub fn with_format(mut self, template: impl Into<String>) -> Self {
        self.format = Some(template.into());
        self
    }

    /// Install a formatter closure; it overrides any `format` template.
    pub fn with_formatter<F>(mut self, formatter: F) -> Self
    where
        F: Fn(&Classification) -> String + Send + Sync + 'static,
    {
        self.formatter = Some(Arc::new(formatter));
        self
    }

    /// Render the diagnostic message for a classified result.
    pub fn format_message(&self, classification: &Classification) -> String {
        if let Some(formatter) = &self.formatter {
            return formatter(classification);
        }
        match &self.format {
            Some(template) => render_template(template, classification),
            None => default_message(classification),
        }
    }
}

/// `Flow: <category>`, the exit status, a blank line, then the details.
pub fn default_message(classification: &Classification) -> String {
    format!(
        "Flow: {}\nExit status: {}\n\n{}",
        classification.category.unwrap_or(""),
        classification.exit_status,
        classification.details
    )
}

fn render_template(template: &str, classification: &Classification) -> String {
    // details last, so placeholders inside the tool output stay untouched
    template
        .replace("{category}", classification.category.unwrap_or(""))
        .replace("{status}", &classification.exit_status.to_string())
        .replace("{details}", &classification.details)
}

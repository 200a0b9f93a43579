//! Staged diagnostics and the build report they are delivered into.

use crate::obs;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    /// `Warning` when non-fatal treatment was requested, else `Error`.
    pub fn from_warn(warn: bool) -> Self {
        if warn {
            Severity::Warning
        } else {
            Severity::Error
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// A formatted check failure awaiting delivery into the next report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDiagnostic {
    /// Where the message is delivered.
    pub severity: Severity,

    /// Formatted message.
    pub message: String,

    /// Exit status that produced it.
    pub exit_status: i32,

    /// Category label, when the exit status is known.
    pub category: Option<String>,
}

/// What triggered a build cycle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    /// Initial build.
    Run,
    /// Rebuild after a file change.
    WatchRun,
}

impl Trigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trigger::Run => "run",
            Trigger::WatchRun => "watch_run",
        }
    }
}

/// Warnings and errors assembled for one build cycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BuildReport {
    pub cycle_id: Uuid,
    pub trigger: Trigger,
    pub assembled_at: DateTime<Utc>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl BuildReport {
    pub fn new(trigger: Trigger) -> Self {
        Self {
            cycle_id: Uuid::new_v4(),
            trigger,
            assembled_at: Utc::now(),
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty() && self.errors.is_empty()
    }
}

/// Move the pending diagnostic, if any, into the report and clear the slot.
///
/// Returns whether the report was changed. Calling again before a new
/// diagnostic is staged does nothing.
pub fn flush_to_report(pending: &mut Option<PendingDiagnostic>, report: &mut BuildReport) -> bool {
    let Some(diagnostic) = pending.take() else {
        return false;
    };

    obs::emit_diagnostic_flushed(&report.cycle_id, diagnostic.severity);
    match diagnostic.severity {
        Severity::Warning => report.warnings.push(diagnostic.message),
        Severity::Error => report.errors.push(diagnostic.message),
    }
    true
}

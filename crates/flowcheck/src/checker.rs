//! Flow status checking: invoke, classify, stage.

use crate::diagnostic::{PendingDiagnostic, Severity};
use crate::error::{FlowError, Result};
use crate::obs;
use crate::options::FlowOptions;
use crate::runner::{FlowRunner, InvocationResult, ProcessRunner};
use crate::scrub::IgnoreLines;
use crate::status::category_for;
use std::time::Instant;

/// A non-zero result mapped to its category, with scrubbed output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub exit_status: i32,

    /// `None` when the exit status is not in the status table.
    pub category: Option<&'static str>,

    /// stdout then stderr, with ignore lines blanked.
    pub details: String,
}

/// Result of one check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Flow exited with status 0.
    Clean,
    /// Flow reported a problem; the diagnostic awaits the next report.
    Flagged(PendingDiagnostic),
}

impl CheckOutcome {
    pub fn is_clean(&self) -> bool {
        matches!(self, CheckOutcome::Clean)
    }

    /// The staged diagnostic, ready to hand to [`flush_to_report`](crate::flush_to_report).
    pub fn into_pending(self) -> Option<PendingDiagnostic> {
        match self {
            CheckOutcome::Clean => None,
            CheckOutcome::Flagged(diagnostic) => Some(diagnostic),
        }
    }
}

/// Runs the type checker and turns failures into diagnostics.
pub struct StatusChecker<R> {
    options: FlowOptions,
    ignore_lines: IgnoreLines,
    runner: R,
}

impl StatusChecker<ProcessRunner> {
    /// Checker that spawns `options.bin`.
    pub fn from_options(options: FlowOptions) -> Result<Self> {
        let runner = ProcessRunner::new(options.bin.clone());
        Self::new(options, runner)
    }
}

impl<R: FlowRunner> StatusChecker<R> {
    pub fn new(options: FlowOptions, runner: R) -> Result<Self> {
        let ignore_lines = IgnoreLines::compile(&options.ignore_lines)?;
        Ok(Self {
            options,
            ignore_lines,
            runner,
        })
    }

    pub fn options(&self) -> &FlowOptions {
        &self.options
    }

    /// Invoke the tool with `flags`, blocking until it exits.
    ///
    /// A non-zero exit status is returned as an ordinary result.
    pub fn run_check(&self, flags: &[String]) -> Result<InvocationResult> {
        if flags.is_empty() {
            return Err(FlowError::EmptyFlags);
        }

        obs::emit_check_started(flags);
        let start = Instant::now();
        let result = self.runner.run(flags)?;
        obs::emit_check_finished(result.exit_status, start.elapsed().as_millis() as u64);

        Ok(result)
    }

    /// Map a result to its category and scrub its output.
    pub fn classify(&self, result: &InvocationResult) -> Classification {
        Classification {
            exit_status: result.exit_status,
            category: category_for(result.exit_status),
            details: self.ignore_lines.scrub(&result.combined_output()),
        }
    }

    /// Format a classified failure as a diagnostic with the configured severity.
    pub fn stage_diagnostic(&self, classification: &Classification) -> PendingDiagnostic {
        let severity = Severity::from_warn(self.options.warn);
        obs::emit_diagnostic_staged(
            classification.exit_status,
            classification.category,
            severity,
        );

        PendingDiagnostic {
            severity,
            message: self.options.format_message(classification),
            exit_status: classification.exit_status,
            category: classification.category.map(str::to_string),
        }
    }

    /// Run with the configured flags and stage a diagnostic on failure.
    pub fn check(&self) -> Result<CheckOutcome> {
        let result = self.run_check(&self.options.flags)?;
        if result.passed() {
            return Ok(CheckOutcome::Clean);
        }

        let classification = self.classify(&result);
        Ok(CheckOutcome::Flagged(self.stage_diagnostic(&classification)))
    }
}

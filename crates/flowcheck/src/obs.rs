//! Structured observability hooks for check and build-cycle events.
//!
//! This module provides:
//! - Cycle-scoped tracing spans via `CycleSpan` RAII guard
//! - Emission functions for key lifecycle events: check start/finish,
//!   diagnostic staged/flushed, watch change, cycle finished
//! - `init_tracing` for binaries that want these events on stderr
//!
//! Events are emitted at `info!` level (configurable via `RUST_LOG`).

use crate::diagnostic::{BuildReport, Severity, Trigger};
use tracing::{debug, info, Level};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};
use uuid::Uuid;

/// Install the global subscriber, writing to stderr so stdout stays free for
/// the report. `RUST_LOG` takes precedence over `level`; an already
/// installed subscriber is kept.
pub fn init_tracing(json: bool, level: Level) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));
    let stderr = fmt::layer().with_target(false).with_writer(std::io::stderr);
    let registry = tracing_subscriber::registry().with(filter);

    let installed = if json {
        registry.with(stderr.json()).try_init()
    } else {
        registry.with(stderr).try_init()
    };
    if installed.is_err() {
        debug!("tracing subscriber already installed");
    }
}

/// RAII guard that enters a cycle-scoped tracing span for the duration of a cycle.
///
/// # Example
///
/// ```ignore
/// let _span = CycleSpan::enter(&report.cycle_id, Trigger::Run);
/// // All tracing calls are now associated with this cycle_id
/// ```
pub struct CycleSpan {
    _span: tracing::span::EnteredSpan,
}

impl CycleSpan {
    /// Create and enter a span tagged with the cycle id and trigger.
    pub fn enter(cycle_id: &Uuid, trigger: Trigger) -> Self {
        let span = tracing::info_span!(
            "flowcheck.cycle",
            cycle_id = %cycle_id,
            trigger = trigger.as_str()
        );
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: type checker invocation started.
pub fn emit_check_started(flags: &[String]) {
    info!(event = "check.started", flags = %flags.join(" "));
}

/// Emit event: type checker exited.
pub fn emit_check_finished(exit_status: i32, duration_ms: u64) {
    info!(
        event = "check.finished",
        exit_status = exit_status,
        duration_ms = duration_ms,
    );
}

/// Emit event: a failure was staged as a diagnostic.
pub fn emit_diagnostic_staged(exit_status: i32, category: Option<&str>, severity: Severity) {
    info!(
        event = "diagnostic.staged",
        exit_status = exit_status,
        category = category.unwrap_or("unknown"),
        severity = severity.as_str(),
    );
}

/// Emit event: the staged diagnostic was delivered into a report.
pub fn emit_diagnostic_flushed(cycle_id: &Uuid, severity: Severity) {
    debug!(
        event = "diagnostic.flushed",
        cycle_id = %cycle_id,
        severity = severity.as_str(),
    );
}

/// Emit event: the watched tree changed.
pub fn emit_watch_changed(root: &std::path::Path, fingerprint: &str) {
    info!(event = "watch.changed", root = %root.display(), fingerprint = %fingerprint);
}

/// Emit event: a build cycle finished with its report totals.
pub fn emit_cycle_finished(report: &BuildReport) {
    info!(
        event = "cycle.finished",
        cycle_id = %report.cycle_id,
        trigger = report.trigger.as_str(),
        warnings = report.warnings.len(),
        errors = report.errors.len(),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emitters_do_not_panic_without_subscriber() {
        let report = BuildReport::new(Trigger::Run);
        let _span = CycleSpan::enter(&report.cycle_id, Trigger::Run);
        emit_check_started(&["status".to_string()]);
        emit_check_finished(2, 10);
        emit_diagnostic_staged(2, Some("Type Error"), Severity::Error);
        emit_diagnostic_staged(5, None, Severity::Warning);
        emit_diagnostic_flushed(&report.cycle_id, Severity::Error);
        emit_watch_changed(std::path::Path::new("."), "abc");
        emit_cycle_finished(&report);
    }

    #[test]
    fn test_init_tracing_twice_keeps_first_subscriber() {
        init_tracing(false, Level::INFO);
        init_tracing(true, Level::DEBUG);
        emit_check_started(&["status".to_string()]);
    }
}

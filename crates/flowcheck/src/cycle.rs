//! Build cycle driver.
//!
//! Each trigger runs the checker once, delivers the staged diagnostic into a
//! fresh build report, then lets the caller assemble the rest of it.

use crate::checker::{CheckOutcome, StatusChecker};
use crate::diagnostic::{flush_to_report, BuildReport, Trigger};
use crate::error::Result;
use crate::obs::{self, CycleSpan};
use crate::runner::FlowRunner;

/// Drives check-then-report cycles for one checker.
pub struct BuildCycle<R> {
    checker: StatusChecker<R>,
}

impl<R: FlowRunner> BuildCycle<R> {
    pub fn new(checker: StatusChecker<R>) -> Self {
        Self { checker }
    }

    pub fn checker(&self) -> &StatusChecker<R> {
        &self.checker
    }

    /// Run one cycle.
    ///
    /// `assemble` is the build step; it sees the Flow diagnostic already in
    /// place and may add its own warnings and errors after it. A launch
    /// failure aborts the cycle before `assemble` runs.
    pub fn run<F>(&self, trigger: Trigger, assemble: F) -> Result<BuildReport>
    where
        F: FnOnce(&mut BuildReport),
    {
        let mut report = BuildReport::new(trigger);
        let _span = CycleSpan::enter(&report.cycle_id, trigger);

        let mut pending = self.checker.check()?.into_pending();
        flush_to_report(&mut pending, &mut report);

        assemble(&mut report);

        obs::emit_cycle_finished(&report);
        Ok(report)
    }

    /// Run a cycle with no build step of its own.
    pub fn run_check_only(&self, trigger: Trigger) -> Result<BuildReport> {
        self.run(trigger, |_| {})
    }

    /// Run the check without assembling a report.
    pub fn check(&self) -> Result<CheckOutcome> {
        self.checker.check()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FlowError;
    use crate::options::FlowOptions;
    use crate::runner::InvocationResult;

    fn cycle(exit_status: i32, warn: bool) -> BuildCycle<impl FlowRunner> {
        let runner = move |_: &[String]| -> Result<InvocationResult> {
            Ok(InvocationResult::new(exit_status, "Found 1 error\n", ""))
        };
        let options = FlowOptions::default().with_warn(warn);
        BuildCycle::new(StatusChecker::new(options, runner).expect("checker"))
    }

    #[test]
    fn test_clean_cycle_leaves_report_empty() {
        let report = cycle(0, false).run_check_only(Trigger::Run).unwrap();
        assert!(report.is_clean());
        assert_eq!(report.trigger, Trigger::Run);
    }

    #[test]
    fn test_flow_diagnostic_precedes_build_step_output() {
        let mut seen_by_build_step = Vec::new();
        let report = cycle(2, false)
            .run(Trigger::WatchRun, |report| {
                seen_by_build_step = report.errors.clone();
                report.errors.push("babel: syntax error".to_string());
            })
            .unwrap();
        assert_eq!(report.errors.len(), 2);
        assert!(report.errors[0].starts_with("Flow: Type Error"));
        assert_eq!(report.errors[1], "babel: syntax error");
        assert_eq!(seen_by_build_step.len(), 1);
    }

    #[test]
    fn test_each_cycle_delivers_its_own_diagnostic_once() {
        let cycle = cycle(2, true);
        let first = cycle.run_check_only(Trigger::Run).unwrap();
        let second = cycle.run_check_only(Trigger::WatchRun).unwrap();
        assert_eq!(first.warnings.len(), 1);
        assert_eq!(second.warnings.len(), 1);
        assert_ne!(first.cycle_id, second.cycle_id);
    }

    #[test]
    fn test_launch_failure_skips_build_step() {
        let runner = |_: &[String]| -> Result<InvocationResult> {
            Err(FlowError::Launch {
                program: "flow".to_string(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            })
        };
        let cycle = BuildCycle::new(StatusChecker::new(FlowOptions::default(), runner).unwrap());
        let mut built = false;
        let result = cycle.run(Trigger::Run, |_| built = true);
        assert!(result.is_err());
        assert!(!built);
    }
}

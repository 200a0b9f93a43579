//! flowcheck - Flow status checks for JavaScript build pipelines
//!
//! Provides a status checker that:
//! - Runs `flow status` before each build and each watch rebuild
//! - Maps the exit status to a category and scrubs server noise from the output
//! - Delivers at most one warning or error into the next build report

pub mod checker;
pub mod cycle;
pub mod diagnostic;
pub mod error;
pub mod obs;
pub mod options;
pub mod preset;
pub mod runner;
pub mod scrub;
pub mod status;
pub mod watch;

// Re-export key types
pub use checker::{CheckOutcome, Classification, StatusChecker};
pub use cycle::BuildCycle;
pub use diagnostic::{flush_to_report, BuildReport, PendingDiagnostic, Severity, Trigger};
pub use error::{FlowError, Result};
pub use options::FlowOptions;
pub use runner::{FlowRunner, InvocationResult, ProcessRunner};
pub use scrub::IgnoreLines;
pub use status::{category_for, FlowStatus};
pub use obs::init_tracing;
pub use watch::TreeWatcher;

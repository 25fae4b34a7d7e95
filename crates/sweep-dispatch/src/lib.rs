#![deny(missing_docs)]
#![doc = "Bounded worker pool that launches the external simulator once per sweep row."]

/// Worker pool submission and retry handling.
pub mod dispatch;
/// Simulator invocation seam.
pub mod launcher;
/// Completion records.
pub mod report;

pub use dispatch::{dispatch, dispatch_from_path, DispatchOpts};
pub use launcher::{ExitSummary, Launcher, RunTask, SimulatorLauncher};
pub use report::{DispatchReport, RunOutcome, RunState};

use std::path::Path;
use std::sync::mpsc;

use log::{debug, info, warn};
use sweep_core::{stable_hash_string, ErrorInfo, FailurePolicy, SweepConfig, SweepError};
use sweep_grid::{read_table, ParameterTable};

use crate::launcher::{Launcher, RunTask};
use crate::report::{DispatchReport, RunOutcome, RunState};

/// Options governing a dispatch pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOpts {
    /// Maximum number of concurrent simulator processes.
    pub workers: usize,
    /// Handling of unsuccessful runs.
    pub failure_policy: FailurePolicy,
    /// Additional launches allowed for a failing run.
    pub max_retries: u32,
}

impl Default for DispatchOpts {
    fn default() -> Self {
        Self {
            workers: 4,
            failure_policy: FailurePolicy::Ignore,
            max_retries: 0,
        }
    }
}

impl DispatchOpts {
    /// Reads the worker pool section of a sweep config.
    pub fn from_config(config: &SweepConfig) -> Self {
        Self {
            workers: config.dispatch.workers,
            failure_policy: config.dispatch.failure_policy,
            max_retries: config.dispatch.max_retries,
        }
    }
}

/// Submits one task per table row to a fixed-size pool and waits for the pool to drain.
///
/// Submission never waits on a running task; outcomes flow back over a
/// channel and are collected once every task has finished.
pub fn dispatch(
    table: &ParameterTable,
    opts: &DispatchOpts,
    launcher: &dyn Launcher,
) -> Result<DispatchReport, SweepError> {
    let workers = opts.workers.max(1);
    let table_hash = stable_hash_string(table)?;
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|index| format!("sweep-worker-{index}"))
        .build()
        .map_err(|err| SweepError::Dispatch(ErrorInfo::new("thread_pool", err.to_string())))?;

    let tasks: Vec<RunTask> = table.rows.iter().map(|row| RunTask::for_id(row.id)).collect();
    let submitted = tasks.len();
    let (tx, rx) = mpsc::channel();
    // fifo scope so runs start in row order
    pool.scope_fifo(move |scope| {
        for task in tasks {
            let tx = tx.clone();
            let label = task.config_file.clone();
            let id = task.id;
            scope.spawn_fifo(move |_| {
                let outcome = run_task(launcher, task, opts);
                // receiver outlives the scope
                let _ = tx.send(outcome);
            });
            info!("Submitted simulation for {label} with id {id}");
        }
    });

    let outcomes: Vec<RunOutcome> = rx.into_iter().collect();
    let report = DispatchReport::new(table_hash, workers, submitted, outcomes);
    info!(
        "dispatch finished: {} submitted, {} completed, {} failed",
        report.submitted, report.completed, report.failed
    );
    Ok(report)
}

/// Reads the parameter table at `table_path` and dispatches it.
pub fn dispatch_from_path(
    table_path: &Path,
    opts: &DispatchOpts,
    launcher: &dyn Launcher,
) -> Result<DispatchReport, SweepError> {
    let table = read_table(table_path)?;
    dispatch(&table, opts, launcher)
}

fn run_task(launcher: &dyn Launcher, task: RunTask, opts: &DispatchOpts) -> RunOutcome {
    let max_attempts = opts.max_retries.saturating_add(1);
    let mut attempt = 0u32;
    loop {
        attempt += 1;
        let (exit_code, error) = match launcher.launch(&task) {
            Ok(summary) if summary.success => {
                debug!("simulation {} completed after {} attempt(s)", task.id, attempt);
                return RunOutcome {
                    id: task.id,
                    config_file: task.config_file,
                    state: RunState::Complete,
                    attempts: attempt,
                    exit_code: summary.code,
                    error: None,
                };
            }
            Ok(summary) => (summary.code, None),
            Err(err) => (None, Some(err.to_string())),
        };
        if attempt < max_attempts {
            debug!("simulation {} failed on attempt {}, retrying", task.id, attempt);
            continue;
        }
        if opts.failure_policy == FailurePolicy::Report {
            match (&error, exit_code) {
                (Some(message), _) => warn!("simulation {} could not start: {}", task.id, message),
                (None, Some(code)) => warn!("simulation {} exited with status {}", task.id, code),
                (None, None) => warn!("simulation {} terminated by signal", task.id),
            }
        }
        return RunOutcome {
            id: task.id,
            config_file: task.config_file,
            state: RunState::Failed,
            attempts: attempt,
            exit_code,
            error,
        };
    }
}

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sweep_core::serde::{from_json_slice, to_canonical_json_bytes};
use sweep_core::SweepError;

/// Final state of a simulator run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunState {
    /// The simulator exited successfully.
    Complete,
    /// The simulator failed on every attempt.
    Failed,
}

/// Completion record for one submitted task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOutcome {
    /// Row identifier.
    pub id: u64,
    /// Input file passed to the simulator.
    pub config_file: String,
    /// Final state after retries.
    pub state: RunState,
    /// Number of launches performed.
    pub attempts: u32,
    /// Exit code of the last launch, when the process exited normally.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    /// Spawn error of the last launch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RunOutcome {
    /// Returns true when the run completed successfully.
    pub fn is_complete(&self) -> bool {
        self.state == RunState::Complete
    }
}

/// Summary of one dispatch pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchReport {
    /// Stable hash of the dispatched parameter table.
    pub table_hash: String,
    /// Worker pool size used.
    pub workers: usize,
    /// Number of tasks submitted to the pool.
    pub submitted: usize,
    /// Number of runs that completed successfully.
    pub completed: usize,
    /// Number of runs that failed.
    pub failed: usize,
    /// Per-task outcomes sorted by id.
    pub outcomes: Vec<RunOutcome>,
}

impl DispatchReport {
    pub(crate) fn new(
        table_hash: String,
        workers: usize,
        submitted: usize,
        mut outcomes: Vec<RunOutcome>,
    ) -> Self {
        outcomes.sort_by_key(|outcome| outcome.id);
        let completed = outcomes.iter().filter(|outcome| outcome.is_complete()).count();
        Self {
            table_hash,
            workers,
            submitted,
            completed,
            failed: outcomes.len() - completed,
            outcomes,
        }
    }

    /// Identifiers of failed runs.
    pub fn failed_ids(&self) -> Vec<u64> {
        self.outcomes
            .iter()
            .filter(|outcome| !outcome.is_complete())
            .map(|outcome| outcome.id)
            .collect()
    }

    /// Writes the report as canonical JSON.
    pub fn write(&self, path: &Path) -> Result<(), SweepError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|err| SweepError::io("report_dir", parent, err))?;
            }
        }
        let bytes = to_canonical_json_bytes(self)?;
        fs::write(path, bytes).map_err(|err| SweepError::io("report_write", path, err))
    }

    /// Loads a report previously written with [`DispatchReport::write`].
    pub fn read(path: &Path) -> Result<Self, SweepError> {
        let bytes = fs::read(path).map_err(|err| SweepError::io("report_read", path, err))?;
        from_json_slice(&bytes)
    }
}

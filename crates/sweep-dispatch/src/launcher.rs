use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::debug;
use serde::{Deserialize, Serialize};
use sweep_core::{config_file_name, ErrorInfo, SweepConfig, SweepError};

/// One simulator invocation: `<binary> -i <config_file> -j <id>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunTask {
    /// Input file name, relative to the simulator working directory.
    pub config_file: String,
    /// Row identifier passed as the job id.
    pub id: u64,
}

impl RunTask {
    /// Builds the task for row `id` using the shared input naming convention.
    pub fn for_id(id: u64) -> Self {
        Self {
            config_file: config_file_name(id),
            id,
        }
    }

    /// Simulator arguments for this task.
    pub fn args(&self) -> Vec<String> {
        vec![
            "-i".to_string(),
            self.config_file.clone(),
            "-j".to_string(),
            self.id.to_string(),
        ]
    }
}

/// Exit information of a finished invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitSummary {
    /// Whether the process reported success.
    pub success: bool,
    /// Exit code when the process exited normally.
    pub code: Option<i32>,
}

impl ExitSummary {
    /// Summary of a successful run.
    pub fn ok() -> Self {
        Self {
            success: true,
            code: Some(0),
        }
    }

    /// Summary of a run that exited with `code`.
    pub fn exited(code: i32) -> Self {
        Self {
            success: code == 0,
            code: Some(code),
        }
    }
}

/// Executes a single task to completion.
///
/// Implementations are shared by every worker thread.
pub trait Launcher: Send + Sync {
    /// Runs the task, blocking until it finishes. Errors mean the run never started.
    fn launch(&self, task: &RunTask) -> Result<ExitSummary, SweepError>;
}

/// Spawns the external simulator with inherited standard streams.
#[derive(Debug, Clone)]
pub struct SimulatorLauncher {
    binary: PathBuf,
    working_dir: PathBuf,
}

impl SimulatorLauncher {
    /// Creates a launcher. A relative `binary` with a directory part resolves
    /// against `working_dir`, and both are anchored to the current directory
    /// because the child changes directory before it execs.
    pub fn new(binary: impl AsRef<Path>, working_dir: impl Into<PathBuf>) -> Self {
        let working_dir = absolutize(working_dir.into());
        Self {
            binary: resolve_program(binary.as_ref(), &working_dir),
            working_dir,
        }
    }

    /// Builds a launcher for the simulator described by `config`.
    pub fn from_config(config: &SweepConfig) -> Self {
        Self::new(&config.simulator.binary, config.simulator_dir())
    }

    /// Resolved executable path.
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Directory every simulator process runs in.
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }
}

impl Launcher for SimulatorLauncher {
    fn launch(&self, task: &RunTask) -> Result<ExitSummary, SweepError> {
        debug!(
            "cd {} && {} {}",
            self.working_dir.display(),
            self.binary.display(),
            task.args().join(" ")
        );
        let status = Command::new(&self.binary)
            .args(task.args())
            .current_dir(&self.working_dir)
            .status()
            .map_err(|err| {
                SweepError::Dispatch(
                    ErrorInfo::new("simulator_spawn", err.to_string())
                        .with_context("id", task.id.to_string())
                        .with_context("binary", self.binary.display().to_string())
                        .with_path(&self.working_dir),
                )
            })?;
        Ok(ExitSummary {
            success: status.success(),
            code: status.code(),
        })
    }
}

/// Bare program names stay on `PATH`; anything with a directory part is
/// anchored to `working_dir`.
fn resolve_program(binary: &Path, working_dir: &Path) -> PathBuf {
    if binary.is_absolute() || binary.components().count() <= 1 {
        binary.to_path_buf()
    } else {
        working_dir.join(binary)
    }
}

fn absolutize(path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        return path;
    }
    match env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_arguments_follow_simulator_cli() {
        let task = RunTask::for_id(42);
        assert_eq!(task.config_file, "input_42.yml");
        assert_eq!(task.args(), vec!["-i", "input_42.yml", "-j", "42"]);
    }

    #[test]
    fn relative_binary_is_anchored_to_working_dir() {
        let launcher = SimulatorLauncher::new("./malasim", "/opt/malasim/bin");
        assert_eq!(launcher.binary(), Path::new("/opt/malasim/bin/./malasim"));
        let on_path = SimulatorLauncher::new("malasim", "/opt/malasim/bin");
        assert_eq!(on_path.binary(), Path::new("malasim"));
        let absolute = SimulatorLauncher::new("/usr/bin/true", "/tmp");
        assert_eq!(absolute.binary(), Path::new("/usr/bin/true"));
    }

    #[test]
    fn relative_working_dir_yields_absolute_program() {
        let cwd = env::current_dir().unwrap();
        let launcher = SimulatorLauncher::new("./malasim", "sim");
        assert!(launcher.binary().is_absolute());
        assert_eq!(launcher.binary(), cwd.join("sim").join("malasim"));
        assert_eq!(launcher.working_dir(), cwd.join("sim"));
    }
}

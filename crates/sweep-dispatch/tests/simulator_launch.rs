#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use sweep_core::{ParameterRange, SweepConfig};
use sweep_dispatch::{dispatch, DispatchOpts, Launcher, RunState, RunTask, SimulatorLauncher};
use sweep_grid::{generate_grid, write_table};

/// Stand-in simulator: records its cwd and arguments, fails for job 1.
const FAKE_SIMULATOR: &str = r#"#!/bin/sh
echo "$(pwd) $*" > "runs/job_$4.txt"
if [ "$4" = "1" ]; then
  exit 7
fi
exit 0
"#;

fn install_fake_simulator(dir: &Path) {
    let path = dir.join("malasim");
    fs::write(&path, FAKE_SIMULATOR).expect("write script");
    let mut perms = fs::metadata(&path).expect("metadata").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).expect("chmod");
    fs::create_dir_all(dir.join("runs")).expect("runs dir");
}

#[test]
fn simulator_runs_in_its_working_directory_with_row_arguments() {
    let temp = tempfile::tempdir().expect("tmp dir");
    let sim_dir = temp.path().canonicalize().expect("canonical");
    install_fake_simulator(&sim_dir);

    let launcher = SimulatorLauncher::new("./malasim", &sim_dir);
    let summary = launcher.launch(&RunTask::for_id(0)).expect("launch");
    assert!(summary.success);
    assert_eq!(summary.code, Some(0));

    let record = fs::read_to_string(sim_dir.join("runs/job_0.txt")).expect("record");
    assert_eq!(record.trim(), format!("{} -i input_0.yml -j 0", sim_dir.display()));
}

#[test]
fn relative_simulator_directory_runs_the_installed_binary() {
    let temp = tempfile::Builder::new()
        .prefix("relative-sim")
        .tempdir_in(".")
        .expect("tmp dir");
    let sim_dir = temp.path();
    assert!(sim_dir.is_relative());
    install_fake_simulator(sim_dir);

    let launcher = SimulatorLauncher::new("./malasim", sim_dir);
    let summary = launcher.launch(&RunTask::for_id(3)).expect("launch");
    assert!(summary.success);
    let record = fs::read_to_string(sim_dir.join("runs/job_3.txt")).expect("record");
    assert!(record.trim().ends_with("-i input_3.yml -j 3"));
}

#[test]
fn config_driven_dispatch_reports_exit_codes() {
    let temp = tempfile::tempdir().expect("tmp dir");
    let sim_dir = temp.path().canonicalize().expect("canonical");
    install_fake_simulator(&sim_dir);

    let mut config = SweepConfig::rooted_at(&sim_dir);
    config.parameters = vec![ParameterRange::new("mid_point", 0.1, 0.4, 3)];
    config.dispatch.workers = 2;
    let table = generate_grid(config.ranges()).expect("grid");
    write_table(&table, &config.params_path()).expect("write table");

    let launcher = SimulatorLauncher::from_config(&config);
    let report = sweep_dispatch::dispatch_from_path(
        &config.params_path(),
        &DispatchOpts::from_config(&config),
        &launcher,
    )
    .expect("dispatch");
    assert_eq!(report.submitted, 3);
    assert_eq!(report.completed, 2);
    assert_eq!(report.outcomes[1].state, RunState::Failed);
    assert_eq!(report.outcomes[1].exit_code, Some(7));
    for id in 0..3 {
        assert!(sim_dir.join(format!("runs/job_{id}.txt")).exists());
    }
}

#[test]
fn missing_binary_is_a_failed_outcome_not_an_error() {
    let temp = tempfile::tempdir().expect("tmp dir");
    let table = generate_grid(&[ParameterRange::new("mid_point", 0.1, 0.4, 2)]).expect("grid");
    let launcher = SimulatorLauncher::new("./does-not-exist", temp.path());
    let report = dispatch(&table, &DispatchOpts::default(), &launcher).expect("dispatch");
    assert_eq!(report.failed, 2);
    assert!(report.outcomes.iter().all(|outcome| outcome.error.is_some()));
}

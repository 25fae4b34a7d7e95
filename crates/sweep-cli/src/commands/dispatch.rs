use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use log::info;
use sweep_core::{FailurePolicy, SweepConfig};
use sweep_dispatch::{dispatch_from_path, DispatchOpts, DispatchReport, SimulatorLauncher};

use super::ConfigArgs;

#[derive(Args, Debug)]
pub struct DispatchArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
    #[command(flatten)]
    pub pool: PoolArgs,
}

/// Worker pool overrides applied on top of the config file.
#[derive(Args, Debug, Clone)]
pub struct PoolArgs {
    /// Maximum number of concurrent simulator processes.
    #[arg(long)]
    pub workers: Option<usize>,
    /// Additional launches allowed for a failing run.
    #[arg(long)]
    pub max_retries: Option<u32>,
    /// Log every failed run at warn level.
    #[arg(long)]
    pub report_failures: bool,
    /// Write the dispatch report as JSON to this path.
    #[arg(long)]
    pub report: Option<PathBuf>,
}

impl PoolArgs {
    pub fn opts(&self, config: &SweepConfig) -> DispatchOpts {
        let mut opts = DispatchOpts::from_config(config);
        if let Some(workers) = self.workers {
            opts.workers = workers;
        }
        if let Some(max_retries) = self.max_retries {
            opts.max_retries = max_retries;
        }
        if self.report_failures {
            opts.failure_policy = FailurePolicy::Report;
        }
        opts
    }
}

pub fn run(args: &DispatchArgs) -> Result<(), Box<dyn Error>> {
    let config = args.config.load()?;
    execute(&config, &args.pool)?;
    Ok(())
}

pub fn execute(config: &SweepConfig, pool: &PoolArgs) -> Result<DispatchReport, Box<dyn Error>> {
    let launcher = SimulatorLauncher::from_config(config);
    info!(
        "dispatching {} from {}",
        launcher.binary().display(),
        launcher.working_dir().display()
    );
    let report = dispatch_from_path(&config.params_path(), &pool.opts(config), &launcher)?;
    if let Some(path) = &pool.report {
        report.write(path)?;
        info!("dispatch report written to {}", path.display());
    }
    Ok(report)
}

use std::error::Error;

use clap::Args;
use sweep_grid::generate_to_path;
use sweep_overlay::Materializer;

use super::dispatch::{execute, PoolArgs};
use super::ConfigArgs;

#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
    #[command(flatten)]
    pub pool: PoolArgs,
    /// Stop after writing the simulator inputs.
    #[arg(long)]
    pub no_dispatch: bool,
}

pub fn run(args: &RunArgs) -> Result<(), Box<dyn Error>> {
    let config = args.config.load()?;
    let table = generate_to_path(config.ranges(), &config.params_path())?;
    Materializer::from_config(&config).materialize_all(&table)?;
    if !args.no_dispatch {
        execute(&config, &args.pool)?;
    }
    Ok(())
}

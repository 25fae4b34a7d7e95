use std::error::Error;

use clap::Args;
use sweep_grid::read_table;
use sweep_overlay::Materializer;

use super::ConfigArgs;

#[derive(Args, Debug)]
pub struct MaterializeArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
}

pub fn run(args: &MaterializeArgs) -> Result<(), Box<dyn Error>> {
    let config = args.config.load()?;
    let table = read_table(&config.params_path())?;
    Materializer::from_config(&config).materialize_all(&table)?;
    Ok(())
}

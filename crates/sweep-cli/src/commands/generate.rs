use std::error::Error;

use clap::Args;
use sweep_grid::generate_to_path;

use super::ConfigArgs;

#[derive(Args, Debug)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
}

pub fn run(args: &GenerateArgs) -> Result<(), Box<dyn Error>> {
    let config = args.config.load()?;
    generate_to_path(config.ranges(), &config.params_path())?;
    Ok(())
}

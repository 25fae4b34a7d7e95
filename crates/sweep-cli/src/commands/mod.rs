use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use sweep_core::{load_config, SweepConfig};

pub mod dispatch;
pub mod generate;
pub mod init;
pub mod materialize;
pub mod run;

/// Config selection shared by every stage command.
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Sweep config YAML; defaults apply relative to the current directory when omitted.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl ConfigArgs {
    pub fn load(&self) -> Result<SweepConfig, Box<dyn Error>> {
        match &self.config {
            Some(path) => Ok(load_config(path)?),
            None => Ok(SweepConfig::rooted_at(".")),
        }
    }
}

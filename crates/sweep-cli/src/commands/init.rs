use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Args;
use log::info;
use sweep_core::SweepConfig;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Destination path for the generated sweep config.
    #[arg(long, default_value = "sweep.yaml")]
    pub out: PathBuf,
    /// Replace an existing file.
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: &InitArgs) -> Result<(), Box<dyn Error>> {
    if args.out.exists() && !args.force {
        return Err(format!(
            "{} already exists, pass --force to replace it",
            args.out.display()
        )
        .into());
    }
    if let Some(parent) = args.out.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let yaml = SweepConfig::default().to_yaml_string()?;
    fs::write(&args.out, yaml)?;
    info!("wrote default sweep config to {}", args.out.display());
    Ok(())
}

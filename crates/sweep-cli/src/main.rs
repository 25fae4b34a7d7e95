use std::error::Error;

use clap::{Parser, Subcommand};
use commands::{
    dispatch::{self, DispatchArgs},
    generate::{self, GenerateArgs},
    init::{self, InitArgs},
    materialize::{self, MaterializeArgs},
    run::{self, RunArgs},
};
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};

mod commands;

#[derive(Parser, Debug)]
#[command(
    name = "immunity-sweep",
    about = "Parameter sweep driver for the malaria simulator"
)]
struct Cli {
    /// Log verbosity: 0-5 or none, error, warn, info, debug, trace.
    #[arg(long, short = 'v', global = true, default_value = "info")]
    verbosity: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a sweep config populated with the default immunity ranges.
    Init(InitArgs),
    /// Generate the parameter grid and write the parameter table.
    Generate(GenerateArgs),
    /// Write one simulator input per parameter row.
    Materialize(MaterializeArgs),
    /// Launch the simulator once per parameter row on a bounded worker pool.
    Dispatch(DispatchArgs),
    /// Run generate, materialize and dispatch in order.
    Run(RunArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(&cli.verbosity)?;
    match cli.command {
        Command::Init(args) => init::run(&args),
        Command::Generate(args) => generate::run(&args),
        Command::Materialize(args) => materialize::run(&args),
        Command::Dispatch(args) => dispatch::run(&args),
        Command::Run(args) => run::run(&args),
    }
}

fn level_filter(verbosity: &str) -> LevelFilter {
    match verbosity {
        "0" | "none" | "off" => LevelFilter::Off,
        "1" | "err" | "error" => LevelFilter::Error,
        "2" | "warn" | "warning" => LevelFilter::Warn,
        "3" | "info" => LevelFilter::Info,
        "4" | "debug" => LevelFilter::Debug,
        "5" | "trace" | "all" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

fn init_logging(verbosity: &str) -> Result<(), Box<dyn Error>> {
    let config = ConfigBuilder::new()
        .set_time_level(LevelFilter::Debug)
        .set_target_level(LevelFilter::Trace)
        .set_location_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Debug)
        .build();
    TermLogger::init(
        level_filter(verbosity),
        config,
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;
    Ok(())
}

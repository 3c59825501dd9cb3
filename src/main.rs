mod config;
mod data;
mod error;
mod figure;
mod manager;
mod render;
mod stats;
mod table;
mod window;

use crate::config::Config;
use crate::manager::Manager;
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

/// Temperature and humidity data visualizer.
#[derive(Debug, Parser)]
#[command(version, about)]
struct CLI {
    /// YAML file with a `data` list of [temperature, humidity] readings.
    file: PathBuf,

    /// TOML file overriding the default report configuration.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where to write the SVG figure.
    #[arg(long, default_value = "report.svg")]
    output: PathBuf,
}

fn main() {
    env_logger::Builder::new()
        .format_timestamp_millis()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    if let Err(error) = run_cli() {
        if log::log_enabled!(log::Level::Error) {
            log::error!("{error:#}");
        } else {
            eprintln!("error: {error:#}");
        }
        std::process::exit(1);
    }
}

fn run_cli() -> Result<()> {
    let args = CLI::parse();
    log::info!("{args:#?}");

    let cfg = match &args.config {
        Some(file) => Config::from_file(file).context("failed to construct cfg")?,
        None => Config::default(),
    };
    log::info!("{cfg:#?}");

    let mgr = Manager::new(cfg, &args.output);
    mgr.run_report(&args.file)?;

    Ok(())
}

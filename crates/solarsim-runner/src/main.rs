//! `solarsim` command line.

use clap::{Parser, Subcommand};
use solarsim_runner::{open_engine, run_dsm, run_solar, sync_tiles, RunnerConfig};
use solarsim_tiles::HttpTransport;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "solarsim")]
#[command(author, version, about = "LiDAR DSM and rooftop solar radiation pipelines")]
struct Cli {
    /// YAML config file; built-in defaults when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Download the LiDAR tiles into the local cache
    FetchTiles {
        /// Download missing tiles even if some are already cached
        #[arg(long)]
        top_up: bool,
    },
    /// Sync tiles, then build the LAS dataset and DSM raster
    Dsm {
        #[arg(long)]
        top_up: bool,
        /// Log engine operations instead of running them
        #[arg(long)]
        dry_run: bool,
    },
    /// Clip, resample and run the solar radiation simulation
    Solar {
        #[arg(long)]
        dry_run: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level.as_str()));
    fmt().with_env_filter(filter).init();
    solarsim_metrics::describe_metrics();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> solarsim_runner::Result<()> {
    let config = RunnerConfig::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Command::FetchTiles { top_up } => {
            fetch(&config, top_up)?;
        }
        Command::Dsm { top_up, dry_run } => {
            fetch(&config, top_up)?;
            let mut engine = open_engine(&config.engine, dry_run)?;
            let outcome = run_dsm(&mut engine, &config.tiles, &config.dsm)?;
            info!(
                "DSM built from {} tiles: {}",
                outcome.tile_count,
                outcome.raster.display()
            );
        }
        Command::Solar { dry_run } => {
            let mut engine = open_engine(&config.engine, dry_run)?;
            let outcome = run_solar(&mut engine, &config.solar)?;
            info!(
                "Solar radiation written to {} in {:.1} minutes",
                outcome.output.display(),
                outcome.elapsed.as_secs_f64() / 60.0
            );
        }
    }
    Ok(())
}

fn fetch(config: &RunnerConfig, top_up: bool) -> solarsim_runner::Result<()> {
    let transport = HttpTransport::with_connect_timeout(config.tiles.connect_timeout())?;
    sync_tiles(&config.tiles, config.tiles.policy(top_up), &transport)?;
    Ok(())
}

// src/main.rs

//! clanscan CLI
//!
//! Scans a player's Destiny 2 activity history for games shared with
//! clanmates. Report lines print to stdout; logs go to stderr.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use clanscan::config::Config;
use clanscan::error::Result;
use clanscan::pipeline::run_scan;

/// clanscan - shared activity finder
#[derive(Parser, Debug)]
#[command(name = "clanscan", version, about = "Finds activities shared with clanmates")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Override the cache directory from the config
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the full scan
    Run,

    /// Validate the configuration file
    Validate,

    /// Write a stub configuration file to fill out
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Init { force } => {
            Config::write_stub(&cli.config, force)?;
            log::info!("Created stub config in {}", cli.config.display());
            log::info!("Fill it out and run 'clanscan run'.");
            Ok(())
        }
        Command::Validate => {
            let config = load_config(&cli)?;
            config.validate()?;
            log::info!("Settings valid.");
            Ok(())
        }
        Command::Run => {
            let config = load_config(&cli)?;
            run_scan(&config).await
        }
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load(&cli.config)?;
    if let Some(data_dir) = &cli.data_dir {
        config.data_dir = data_dir.clone();
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match execute(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            log::error!("{error}");
            let code = error.exit_code();
            let _ = std::io::stdout().flush();
            let _ = std::io::stderr().flush();
            ExitCode::from(code as u8)
        }
    }
}

//! minewatchd - announces players joining and leaving a Minecraft server.
//!
//! Tails the server log, picks out join/leave lines and POSTs a notice for
//! each one to every configured recipient.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod cli;
mod config;
mod error;
mod notice;
mod scanner;
mod watcher;

pub use error::Error;

#[derive(Parser)]
#[command(name = "minewatchd")]
#[command(about = "minewatchd - player join/leave notices from a Minecraft server log")]
#[command(version)]
struct Cli {
    /// Path to the TOML config file [default: ~/.minewatchd.toml]
    #[arg(long, global = true)]
    conf_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Follow the server log and send notices (default)
    Run,

    /// Validate the config file and print a summary
    Check,

    /// Show how a single log line would be handled, without sending anything
    Scan {
        /// Raw log line, e.g. "[2020-02-08 16:10:39 MST] [INFO]: steve joined the game"
        line: String,

        /// Time zone to read the timestamp in, instead of the config's
        #[arg(long)]
        time_zone: Option<String>,
    },
}

fn main() -> Result<(), Error> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("minewatchd=info")),
        )
        .init();

    let cli = Cli::parse();

    let conf_path = match cli.conf_file {
        Some(path) => path,
        None => config::Config::default_path()?,
    };

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => cli::run::run(&conf_path)?,
        Commands::Check => cli::check::run(&conf_path)?,
        Commands::Scan { line, time_zone } => {
            cli::scan::run(&conf_path, &line, time_zone.as_deref())?
        }
    }

    Ok(())
}

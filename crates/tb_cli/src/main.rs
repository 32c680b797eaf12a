//! Tactics Board CLI
//!
//! Records scripted moves into plays and replays them frame by frame.
//! Board state lives in `--data-dir` as one JSON file per key.

mod commands;
mod script;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tb_core::BoardConfig;

use crate::commands::ReplayOptions;
use crate::script::Script;

#[derive(Parser)]
#[command(name = "tactics-board")]
#[command(about = "Record and replay tactics board plays", long_about = None)]
struct Cli {
    /// Directory holding the board's stored state
    #[arg(long, global = true, default_value = "board_data")]
    data_dir: PathBuf,

    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a play from a move script
    Record {
        /// Script file with the moves to apply
        #[arg(long)]
        script: PathBuf,
    },

    /// Replay a stored play
    Replay {
        /// Play id
        id: String,

        /// Speed multiplier (e.g. 0.5, 1, 2, 4)
        #[arg(long)]
        speed: Option<f64>,

        /// Frame to start from
        #[arg(long)]
        seek: Option<f64>,

        /// Wait between frames like an interactive host would
        #[arg(long, default_value = "false")]
        realtime: bool,
    },

    /// List stored plays
    List,

    /// Print a stored play as JSON
    Show {
        /// Play id
        id: String,
    },

    /// Delete one play
    Delete {
        /// Play id
        id: String,
    },

    /// Delete every play
    Clear {
        /// Skip the confirmation prompt
        #[arg(long, default_value = "false")]
        yes: bool,
    },

    /// Restore default settings and the 4-4-2 formation
    Reset,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = BoardConfig::load_or_default(cli.config.as_deref())
        .context("failed to load configuration")?;
    let (mut board, clock) = commands::open_board(&cli.data_dir, config);
    let mut out = io::stdout().lock();

    match cli.command {
        Commands::Record { script } => {
            let script = Script::load(&script)?;
            commands::record(&mut board, &clock, &script, &mut out)?;
        }

        Commands::Replay { id, speed, seek, realtime } => {
            let options = ReplayOptions { speed, seek, realtime };
            commands::replay(&mut board, &id, &options, &mut out)?;
        }

        Commands::List => commands::list(&board, &mut out)?,

        Commands::Show { id } => commands::show(&board, &id, &mut out)?,

        Commands::Delete { id } => commands::delete(&mut board, &id, &mut out)?,

        Commands::Clear { yes } => {
            commands::clear(&mut board, |prompt| yes || ask(prompt), &mut out)?;
        }

        Commands::Reset => commands::reset(&mut board, &mut out)?,
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
}

/// Ask a yes/no question on the terminal. Anything but "y"/"yes" is a no.
fn ask(prompt: &str) -> bool {
    eprint!("{} [y/N] ", prompt);
    if io::stderr().flush().is_err() {
        return false;
    }

    let mut answer = String::new();
    match io::stdin().lock().read_line(&mut answer) {
        Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}

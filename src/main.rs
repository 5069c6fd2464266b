mod commands;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::config::ConfigCommand;
use commands::event::EventCommand;
use commands::guest::GuestCommand;
use commands::item::ItemCommand;

#[derive(Parser)]
#[command(name = "eventplan")]
#[command(about = "Plan events, track RSVPs and split item costs between guests")]
struct Cli {
    /// Directory holding the saved event store (overrides config)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create, list, show, edit and delete events
    Event {
        #[command(subcommand)]
        command: EventCommand,
    },
    /// Invite guests and track their RSVP
    Guest {
        #[command(subcommand)]
        command: GuestCommand,
    },
    /// Manage the items an event needs and who pays for them
    Item {
        #[command(subcommand)]
        command: ItemCommand,
    },
    /// Show or change configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("eventplan=warn,eventplan_core=warn")),
        )
        .init();

    let cli = Cli::parse();
    let data_dir = cli.data_dir.as_deref();

    match cli.command {
        Commands::Event { command } => {
            let mut store = commands::open_store(data_dir)?;
            commands::event::run(&mut store, command)
        }
        Commands::Guest { command } => {
            let mut store = commands::open_store(data_dir)?;
            commands::guest::run(&mut store, command)
        }
        Commands::Item { command } => {
            let mut store = commands::open_store(data_dir)?;
            commands::item::run(&mut store, command)
        }
        Commands::Config { command } => commands::config::run(command, data_dir),
    }
}

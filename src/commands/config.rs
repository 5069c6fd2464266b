use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Subcommand;
use eventplan_core::config::PlannerConfig;
use owo_colors::OwoColorize;

use super::load_config;

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration and where the store lives
    Show,
    /// Set where the event store is saved
    SetDataDir { dir: PathBuf },
    /// Set the file name (without .json) of the saved store
    SetStorageKey { key: String },
}

pub fn run(command: ConfigCommand, data_dir: Option<&Path>) -> Result<()> {
    match command {
        ConfigCommand::Show => {
            let config = load_config(data_dir)?;
            let storage = config.storage();

            println!("{} {}", "Config:".dimmed(), PlannerConfig::config_path()?.display());
            println!("{} {}", "Store:".dimmed(), storage.path().display());

            let toml = config.to_toml()?;
            if !toml.trim().is_empty() {
                println!();
                print!("{}", toml);
            }
            Ok(())
        }
        ConfigCommand::SetDataDir { dir } => {
            let mut config = PlannerConfig::load()?;
            config.data_dir = dir;
            config.save()?;
            println!("Store will be saved in {}", config.data_path().display());
            Ok(())
        }
        ConfigCommand::SetStorageKey { key } => {
            let key = key.trim();
            if key.is_empty() || key.contains(['/', '\\']) {
                anyhow::bail!("Storage key must be a non-empty file name");
            }

            let mut config = PlannerConfig::load()?;
            config.storage_key = key.to_string();
            config.save()?;
            println!("Store file is now {}", config.storage().path().display());
            Ok(())
        }
    }
}

//! Global eventplan configuration.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, PlannerResult};
use crate::persist::FileStorage;

static DEFAULT_DATA_DIR: &str = "~/.local/share/eventplan";
static DEFAULT_STORAGE_KEY: &str = "event-storage";

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn is_default_data_dir(p: &Path) -> bool {
    p == Path::new(DEFAULT_DATA_DIR)
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

fn is_default_storage_key(k: &str) -> bool {
    k == DEFAULT_STORAGE_KEY
}

/// Configuration at ~/.config/eventplan/config.toml
///
/// Any key can be overridden with an `EVENTPLAN_`-prefixed environment
/// variable (`EVENTPLAN_DATA_DIR`, `EVENTPLAN_STORAGE_KEY`).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PlannerConfig {
    #[serde(default = "default_data_dir", skip_serializing_if = "is_default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_storage_key", skip_serializing_if = "is_default_storage_key")]
    pub storage_key: String,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig {
            data_dir: default_data_dir(),
            storage_key: default_storage_key(),
        }
    }
}

impl PlannerConfig {
    pub fn config_path() -> PlannerResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| PlannerError::Config("Could not determine config directory".into()))?
            .join("eventplan");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location, creating a commented-out config
    /// file there on first run.
    pub fn load() -> PlannerResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load from an explicit file (which may be missing) plus environment.
    pub fn load_from(path: &Path) -> PlannerResult<Self> {
        Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(Environment::with_prefix("EVENTPLAN"))
            .build()
            .map_err(|e| PlannerError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| PlannerError::Config(e.to_string()))
    }

    /// Data directory with `~` expanded.
    pub fn data_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.data_dir.to_string_lossy()).into_owned();

        PathBuf::from(full_path_str)
    }

    pub fn storage(&self) -> FileStorage {
        FileStorage::new(&self.data_path(), &self.storage_key)
    }

    pub fn to_toml(&self) -> PlannerResult<String> {
        toml::to_string_pretty(self).map_err(|e| PlannerError::Config(e.to_string()))
    }

    /// Save to ~/.config/eventplan/config.toml
    pub fn save(&self) -> PlannerResult<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> PlannerResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                PlannerError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, self.to_toml()?)
            .map_err(|e| PlannerError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> PlannerResult<()> {
        let contents = format!(
            "\
# eventplan configuration

# Where the event store is saved:
# data_dir = \"{}\"

# File name (without .json) of the saved store:
# storage_key = \"{}\"
",
            DEFAULT_DATA_DIR, DEFAULT_STORAGE_KEY
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                PlannerError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| PlannerError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commented_default_config_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("eventplan/config.toml");

        PlannerConfig::create_default_config(&path).unwrap();
        let config = PlannerConfig::load_from(&path).unwrap();

        assert_eq!(config.data_dir, PathBuf::from(DEFAULT_DATA_DIR));
        assert_eq!(config.storage_key, "event-storage");
    }

    #[test]
    fn saved_config_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let config = PlannerConfig {
            data_dir: dir.path().join("data"),
            storage_key: "festas".to_string(),
        };

        config.save_to(&path).unwrap();

        assert_eq!(PlannerConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn defaults_are_not_written() {
        assert_eq!(PlannerConfig::default().to_toml().unwrap().trim(), "");
    }

    #[test]
    fn only_changed_keys_are_written() {
        let config = PlannerConfig {
            storage_key: "festas".to_string(),
            ..PlannerConfig::default()
        };
        assert_eq!(config.to_toml().unwrap().trim(), "storage_key = \"festas\"");

        let config = PlannerConfig {
            data_dir: PathBuf::from("/srv/eventplan"),
            ..PlannerConfig::default()
        };
        assert_eq!(config.to_toml().unwrap().trim(), "data_dir = \"/srv/eventplan\"");

        assert!(is_default_data_dir(Path::new(DEFAULT_DATA_DIR)));
        assert!(is_default_storage_key(DEFAULT_STORAGE_KEY));
    }

    #[test]
    fn storage_file_follows_key() {
        let config = PlannerConfig {
            data_dir: PathBuf::from("/tmp/eventplan-test"),
            storage_key: "festas".to_string(),
        };
        assert_eq!(
            config.storage().path(),
            Path::new("/tmp/eventplan-test/festas.json")
        );
    }
}

pub mod config;
pub mod event;
pub mod guest;
pub mod item;

use std::path::Path;

use anyhow::{Context, Result};
use eventplan_core::config::PlannerConfig;
use eventplan_core::{Event, FileStorage, PersistentStore, PlannerError};

pub type Store = PersistentStore<FileStorage>;

/// Resolve configuration (with an optional data dir override).
pub fn load_config(data_dir: Option<&Path>) -> Result<PlannerConfig> {
    let mut config = PlannerConfig::load()?;
    if let Some(dir) = data_dir {
        config.data_dir = dir.to_path_buf();
    }
    Ok(config)
}

pub fn open_store(data_dir: Option<&Path>) -> Result<Store> {
    let config = load_config(data_dir)?;
    let storage = config.storage();
    let path = storage.path().display().to_string();
    tracing::debug!(path = %path, storage_key = %config.storage_key, "opening event store");

    PersistentStore::open(storage).with_context(|| format!("Failed to open event store at {path}"))
}

/// The store treats unknown ids as no-ops; on the command line that is an error.
pub fn ensure_found(applied: bool, kind: &'static str, id: &str) -> Result<()> {
    if !applied {
        return Err(not_found(kind, id).into());
    }
    Ok(())
}

pub fn not_found(kind: &'static str, id: &str) -> PlannerError {
    PlannerError::NotFound {
        kind,
        id: id.to_string(),
    }
}

pub fn find_event<'a>(store: &'a Store, id: &str) -> Result<&'a Event> {
    store.get_event_by_id(id).ok_or_else(|| not_found("Event", id).into())
}

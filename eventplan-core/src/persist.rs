//! Snapshot persistence for the event store.
//!
//! The whole store is written as one JSON blob after every change and read
//! back wholesale on startup. There is no incremental log and no migration;
//! the `version` field is recorded but only checked for a warning.

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::PlannerResult;
use crate::event::{Event, EventPatch, Guest, Item};
use crate::store::{EventStore, StoreState};

/// Version written into new blobs.
pub const STATE_VERSION: u32 = 0;

/// On-disk wrapper: `{"state": {"events": [...]}, "version": 0}`.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedBlob {
    state: StoreState,
    #[serde(default)]
    version: u32,
}

/// Where store snapshots live.
pub trait Storage {
    /// The last saved state, or `None` if nothing was ever saved.
    fn load(&self) -> PlannerResult<Option<StoreState>>;

    /// Replace the saved state.
    fn save(&self, state: &StoreState) -> PlannerResult<()>;
}

/// A single JSON file named after the storage key.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(data_dir: &Path, storage_key: &str) -> Self {
        FileStorage {
            path: data_dir.join(format!("{storage_key}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl Storage for FileStorage {
    fn load(&self) -> PlannerResult<Option<StoreState>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no saved state");
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path)?;
        let blob: PersistedBlob = serde_json::from_str(&content)?;

        if blob.version != STATE_VERSION {
            warn!(
                found = blob.version,
                expected = STATE_VERSION,
                "saved state has a different version, reading it as-is"
            );
        }

        Ok(Some(blob.state))
    }

    fn save(&self, state: &StoreState) -> PlannerResult<()> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }

        let blob = PersistedBlob {
            state: state.clone(),
            version: STATE_VERSION,
        };
        let content = serde_json::to_string_pretty(&blob)?;

        // Write to a sibling temp file, then rename over the target.
        let temp = self.temp_path();
        std::fs::write(&temp, content)?;
        std::fs::rename(&temp, &self.path)?;

        debug!(path = %self.path.display(), events = state.events.len(), "saved state");
        Ok(())
    }
}

/// Keeps the last saved state in memory.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    saved: RefCell<Option<StoreState>>,
    saves: RefCell<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        MemoryStorage::default()
    }

    pub fn with_state(state: StoreState) -> Self {
        MemoryStorage {
            saved: RefCell::new(Some(state)),
            saves: RefCell::new(0),
        }
    }

    /// How many times `save` has been called.
    pub fn save_count(&self) -> usize {
        *self.saves.borrow()
    }
}

impl Storage for MemoryStorage {
    fn load(&self) -> PlannerResult<Option<StoreState>> {
        Ok(self.saved.borrow().clone())
    }

    fn save(&self, state: &StoreState) -> PlannerResult<()> {
        *self.saved.borrow_mut() = Some(state.clone());
        *self.saves.borrow_mut() += 1;
        Ok(())
    }
}

/// An `EventStore` that saves itself after every change.
///
/// Each mutation returns `Ok(true)` if it changed something (and the new
/// state was saved), `Ok(false)` if the target id did not exist.
pub struct PersistentStore<S: Storage> {
    store: EventStore,
    storage: S,
}

impl<S: Storage> PersistentStore<S> {
    /// Rehydrate from storage, starting empty if nothing was saved yet.
    pub fn open(storage: S) -> PlannerResult<Self> {
        let mut store = match storage.load()? {
            Some(state) => EventStore::from_state(state),
            None => EventStore::new(),
        };

        let repaired = store.reconcile_counters();
        let this = PersistentStore { store, storage };
        if repaired > 0 {
            info!(repaired, "repaired guest counters on load");
            this.save()?;
        }

        Ok(this)
    }

    pub fn store(&self) -> &EventStore {
        &self.store
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn get_event_by_id(&self, id: &str) -> Option<&Event> {
        self.store.get_event_by_id(id)
    }

    fn save(&self) -> PlannerResult<()> {
        self.storage.save(self.store.state())
    }

    fn commit(&self, applied: bool) -> PlannerResult<bool> {
        if applied {
            self.save()?;
        }
        Ok(applied)
    }

    pub fn add_event(&mut self, event: Event) -> PlannerResult<()> {
        self.store.add_event(event);
        self.save()
    }

    pub fn update_event(&mut self, id: &str, patch: EventPatch) -> PlannerResult<bool> {
        let applied = self.store.update_event(id, patch);
        self.commit(applied)
    }

    pub fn remove_event(&mut self, id: &str) -> PlannerResult<bool> {
        let applied = self.store.remove_event(id);
        self.commit(applied)
    }

    pub fn add_item(&mut self, event_id: &str, item: Item) -> PlannerResult<bool> {
        let applied = self.store.add_item(event_id, item);
        self.commit(applied)
    }

    pub fn update_item(&mut self, event_id: &str, item_id: &str, item: Item) -> PlannerResult<bool> {
        let applied = self.store.update_item(event_id, item_id, item);
        self.commit(applied)
    }

    pub fn remove_item(&mut self, event_id: &str, item_id: &str) -> PlannerResult<bool> {
        let applied = self.store.remove_item(event_id, item_id);
        self.commit(applied)
    }

    pub fn add_guests(&mut self, event_id: &str, guests: Vec<Guest>) -> PlannerResult<bool> {
        let applied = self.store.add_guests(event_id, guests);
        self.commit(applied)
    }

    pub fn update_guest(&mut self, event_id: &str, guest_id: &str, guest: Guest) -> PlannerResult<bool> {
        let applied = self.store.update_guest(event_id, guest_id, guest);
        self.commit(applied)
    }

    pub fn remove_guest(&mut self, event_id: &str, guest_id: &str) -> PlannerResult<bool> {
        let applied = self.store.remove_guest(event_id, guest_id);
        self.commit(applied)
    }
}

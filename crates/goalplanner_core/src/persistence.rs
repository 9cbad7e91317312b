//! Persistence adapter over an external key-value byte store.
//!
//! # Responsibility
//! - Load/save the three independent records: tasks, skills, theme.
//! - Absorb every store or decode failure into a "use default" outcome.
//!
//! # Invariants
//! - No method returns an error or panics; failures are logged and dropped.
//! - `read_*` tells an absent record apart from one that could not be
//!   read or decoded; `load_*` folds both into `None`.
//! - Records are JSON text with the field names of the domain model.
//! - Log lines carry keys and sizes only, never record payloads.

use crate::model::skill::Skill;
use crate::model::task::Task;
use crate::storage::KvStore;
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub const DEFAULT_NAMESPACE: &str = "goal-planner";

/// Storage keys for the three persisted records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistenceKeys {
    pub tasks: String,
    pub skills: String,
    pub theme: String,
}

impl PersistenceKeys {
    /// Builds `<namespace>:tasks`, `<namespace>:skills`, `<namespace>:theme`.
    pub fn for_namespace(namespace: &str) -> Self {
        let namespace = namespace.trim();
        Self {
            tasks: format!("{namespace}:tasks"),
            skills: format!("{namespace}:skills"),
            theme: format!("{namespace}:theme"),
        }
    }
}

impl Default for PersistenceKeys {
    fn default() -> Self {
        Self::for_namespace(DEFAULT_NAMESPACE)
    }
}

/// Outcome of reading one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Loaded<T> {
    Found(T),
    /// Nothing is stored under the key.
    Absent,
    /// The store failed or the bytes did not decode.
    Unreadable,
}

impl<T> Loaded<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::Absent | Self::Unreadable => None,
        }
    }
}

/// Fallible-store wrapper with infallible load/save semantics.
pub struct Persistence<S: KvStore> {
    store: S,
    keys: PersistenceKeys,
}

impl<S: KvStore> Persistence<S> {
    pub fn new(store: S) -> Self {
        Self::with_keys(store, PersistenceKeys::default())
    }

    pub fn with_keys(store: S, keys: PersistenceKeys) -> Self {
        Self { store, keys }
    }

    pub fn keys(&self) -> &PersistenceKeys {
        &self.keys
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns stored tasks, or `None` when absent, unreadable or corrupt.
    pub fn load_tasks(&self) -> Option<Vec<Task>> {
        self.read_tasks().found()
    }

    pub fn read_tasks(&self) -> Loaded<Vec<Task>> {
        self.load(&self.keys.tasks)
    }

    /// Writes tasks. Returns `false` when the write was dropped.
    pub fn save_tasks(&self, tasks: &[Task]) -> bool {
        self.save(&self.keys.tasks, tasks)
    }

    pub fn load_skills(&self) -> Option<Vec<Skill>> {
        self.read_skills().found()
    }

    pub fn read_skills(&self) -> Loaded<Vec<Skill>> {
        self.load(&self.keys.skills)
    }

    pub fn save_skills(&self, skills: &[Skill]) -> bool {
        self.save(&self.keys.skills, skills)
    }

    /// Returns the stored theme flag, `None` when nothing usable is stored.
    pub fn load_theme(&self) -> Option<bool> {
        self.load(&self.keys.theme).found()
    }

    pub fn save_theme(&self, dark_mode: bool) -> bool {
        self.save(&self.keys.theme, &dark_mode)
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> Loaded<T> {
        let bytes = match self.store.get(key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                debug!("event=record_load module=persistence status=absent key={key}");
                return Loaded::Absent;
            }
            Err(err) => {
                warn!(
                    "event=record_load module=persistence status=error error_code=store_read_failed key={key} error={err}"
                );
                return Loaded::Unreadable;
            }
        };

        match serde_json::from_slice::<T>(&bytes) {
            Ok(value) => {
                debug!(
                    "event=record_load module=persistence status=ok key={key} bytes={}",
                    bytes.len()
                );
                Loaded::Found(value)
            }
            Err(err) => {
                warn!(
                    "event=record_load module=persistence status=error error_code=decode_failed key={key} bytes={} line={} column={}",
                    bytes.len(),
                    err.line(),
                    err.column()
                );
                Loaded::Unreadable
            }
        }
    }

    fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        let bytes = match serde_json::to_vec(value) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(
                    "event=record_save module=persistence status=error error_code=encode_failed key={key} error={err}"
                );
                return false;
            }
        };

        match self.store.set(key, &bytes) {
            Ok(()) => {
                debug!(
                    "event=record_save module=persistence status=ok key={key} bytes={}",
                    bytes.len()
                );
                true
            }
            Err(err) => {
                warn!(
                    "event=record_save module=persistence status=error error_code=store_write_failed key={key} error={err}"
                );
                false
            }
        }
    }
}

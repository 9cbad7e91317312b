//! In-process key-value store.
//!
//! Used by tests and embedders that own persistence elsewhere. Read and
//! write failures can be switched on to exercise the adapter's fallbacks.

use super::{KvError, KvResult, KvStore};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub struct MemoryKvStore {
    records: RefCell<BTreeMap<String, Vec<u8>>>,
    fail_reads: Cell<bool>,
    fail_writes: Cell<bool>,
    writes: Cell<usize>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `get` fail (simulates disabled storage).
    pub fn fail_reads(&self, enabled: bool) {
        self.fail_reads.set(enabled);
    }

    /// Makes every subsequent `set` fail (simulates quota exhaustion).
    pub fn fail_writes(&self, enabled: bool) {
        self.fail_writes.set(enabled);
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    /// Raw bytes under `key`, bypassing failure switches.
    pub fn raw(&self, key: &str) -> Option<Vec<u8>> {
        self.records.borrow().get(key).cloned()
    }

    /// Writes raw bytes, bypassing failure switches and the write counter.
    pub fn insert_raw(&self, key: &str, value: impl Into<Vec<u8>>) {
        self.records
            .borrow_mut()
            .insert(key.to_string(), value.into());
    }
}

impl KvStore for MemoryKvStore {
    fn get(&self, key: &str) -> KvResult<Option<Vec<u8>>> {
        if self.fail_reads.get() {
            return Err(KvError::Unavailable("reads disabled".to_string()));
        }
        Ok(self.records.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> KvResult<()> {
        if self.fail_writes.get() {
            return Err(KvError::Unavailable("quota exceeded".to_string()));
        }
        self.records
            .borrow_mut()
            .insert(key.to_string(), value.to_vec());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

//! Per-record serialization for read-modify-write operations.
//!
//! Removing an embedded guest reads a family record, edits the guest
//! array, and writes it back; two of those interleaved on the same
//! record would silently drop one removal. The registry hands out one
//! guard per record id and rejects a second acquire while the first
//! is held.

use std::collections::HashSet;
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct LockRegistry {
    held: Mutex<HashSet<String>>,
}

impl LockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for `key`, or `None` if it is already held.
    /// The lock is released when the returned guard drops.
    pub fn try_acquire(&self, key: &str) -> Option<RecordGuard<'_>> {
        let mut held = self.held.lock().unwrap_or_else(|e| e.into_inner());
        if held.insert(key.to_string()) {
            Some(RecordGuard {
                registry: self,
                key: key.to_string(),
            })
        } else {
            None
        }
    }
}

/// RAII lock on a single record id.
#[derive(Debug)]
pub struct RecordGuard<'a> {
    registry: &'a LockRegistry,
    key: String,
}

impl Drop for RecordGuard<'_> {
    fn drop(&mut self) {
        let mut held = self
            .registry
            .held
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        held.remove(&self.key);
    }
}

//! In-memory store implementations, used by tests and by callers that need
//! per-session state without touching disk.

use std::collections::HashMap;
use std::sync::RwLock;

use anyhow::Result;

use super::{HistoryStore, StashStore};
use crate::models::PlaceInfo;

/// History kept in process memory.
pub struct MemoryHistory {
    entries: RwLock<Vec<String>>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        MemoryHistory {
            entries: RwLock::new(Vec::new()),
        }
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryStore for MemoryHistory {
    fn get(&self) -> Result<Vec<String>> {
        Ok(self.entries.read().unwrap().clone())
    }

    fn set(&self, entries: &[String]) -> Result<()> {
        *self.entries.write().unwrap() = entries.to_vec();
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.entries.write().unwrap().clear();
        Ok(())
    }
}

/// Stash kept in process memory. `take` removes the payload, keeping the
/// read-at-most-once contract.
pub struct MemoryStash {
    payloads: RwLock<HashMap<String, PlaceInfo>>,
}

impl MemoryStash {
    pub fn new() -> Self {
        MemoryStash {
            payloads: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStash {
    fn default() -> Self {
        Self::new()
    }
}

impl StashStore for MemoryStash {
    fn stash(&self, id: &str, payload: &PlaceInfo) -> Result<()> {
        self.payloads
            .write()
            .unwrap()
            .insert(id.to_string(), payload.clone());
        Ok(())
    }

    fn take(&self, id: &str) -> Result<Option<PlaceInfo>> {
        Ok(self.payloads.write().unwrap().remove(id))
    }
}

//! Storage slot capability.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use super::{StoreError, StoreResult};
use crate::db::Database;

/// A medium holding named, whole-payload slots.
///
/// Writes replace the full payload; there is no partial update.
pub trait SlotStorage {
    /// Read a slot, `None` if it has never been written.
    fn load(&self, slot: &str) -> StoreResult<Option<String>>;

    /// Replace a slot's payload.
    fn save(&self, slot: &str, payload: &str) -> StoreResult<()>;
}

impl SlotStorage for Database {
    fn load(&self, slot: &str) -> StoreResult<Option<String>> {
        self.read_slot(slot)
            .map_err(|e| StoreError::Persistence(e.to_string()))
    }

    fn save(&self, slot: &str, payload: &str) -> StoreResult<()> {
        self.write_slot(slot, payload)
            .map_err(|e| StoreError::Persistence(e.to_string()))
    }
}

/// In-process slots, for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemorySlots {
    slots: RefCell<HashMap<String, String>>,
    quota: Cell<Option<usize>>,
}

impl MemorySlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject writes whose payload exceeds `bytes`.
    pub fn with_quota(bytes: usize) -> Self {
        let slots = Self::default();
        slots.quota.set(Some(bytes));
        slots
    }

    /// Seed a slot directly, bypassing the store.
    pub fn insert(&self, slot: &str, payload: &str) {
        self.slots
            .borrow_mut()
            .insert(slot.to_string(), payload.to_string());
    }

    /// Raw payload of a slot.
    pub fn get(&self, slot: &str) -> Option<String> {
        self.slots.borrow().get(slot).cloned()
    }
}

impl SlotStorage for MemorySlots {
    fn load(&self, slot: &str) -> StoreResult<Option<String>> {
        Ok(self.get(slot))
    }

    fn save(&self, slot: &str, payload: &str) -> StoreResult<()> {
        if let Some(quota) = self.quota.get() {
            if payload.len() > quota {
                return Err(StoreError::Persistence(format!(
                    "quota exceeded: {} bytes > {} bytes",
                    payload.len(),
                    quota
                )));
            }
        }
        self.insert(slot, payload);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_slots() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.load("userInfoData").unwrap(), None);
        db.save("userInfoData", "[]").unwrap();
        assert_eq!(db.load("userInfoData").unwrap(), Some("[]".into()));
    }

    #[test]
    fn test_memory_quota() {
        let slots = MemorySlots::with_quota(4);
        slots.save("s", "[]").unwrap();
        let err = slots.save("s", "[1,2,3]").unwrap_err();
        assert!(matches!(err, StoreError::Persistence(_)));
        assert_eq!(slots.get("s"), Some("[]".into()));
    }
}

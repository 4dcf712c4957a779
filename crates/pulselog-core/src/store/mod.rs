//! Record store over a single storage slot.
//!
//! Every mutation is a read-modify-write of the whole collection: the slot
//! is re-read, changed in memory and written back in one `save`. Two
//! mutations issued without waiting on each other are last-write-wins.

mod codec;
mod slot;

pub use slot::*;

use std::collections::HashSet;

use thiserror::Error;

use crate::config::StoreConfig;
use crate::models::{PatientRecord, StoredRecord, ValidationError};

/// Store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Patient-record collection persisted in one slot.
pub struct RecordStore<S: SlotStorage> {
    storage: S,
    config: StoreConfig,
}

impl<S: SlotStorage> RecordStore<S> {
    /// Create a store over a storage medium.
    pub fn new(storage: S, config: StoreConfig) -> Self {
        Self { storage, config }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Validate a record, assign an identifier and timestamp, and append it.
    pub fn save_record(&self, record: PatientRecord) -> StoreResult<StoredRecord> {
        record.validate()?;

        let mut records = self.read_for_update()?;
        let mut stored = StoredRecord::new(record);
        while records.iter().any(|r| r.id == stored.id) {
            stored.id = uuid::Uuid::new_v4().to_string();
        }
        records.push(stored.clone());
        self.write(&records)?;

        tracing::debug!(id = %stored.id, total = records.len(), "Saved record");
        Ok(stored)
    }

    /// All records in insertion order.
    ///
    /// A missing slot is an empty collection. Undecodable data is an empty
    /// collection under `lenient_read`, otherwise a `Parse` error.
    pub fn list_records(&self) -> StoreResult<Vec<StoredRecord>> {
        let payload = match self.load_payload()? {
            Some(payload) => payload,
            None => return Ok(Vec::new()),
        };

        match codec::decode_collection(&payload, self.config.lenient_read) {
            Ok(records) => {
                tracing::debug!(count = records.len(), "Listed records");
                Ok(records)
            }
            Err(e) if self.config.lenient_read => {
                tracing::warn!(error = %e, "Stored collection is unreadable, treating as empty");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Look up one record by identifier.
    pub fn get_record(&self, id: &str) -> StoreResult<Option<StoredRecord>> {
        Ok(self.list_records()?.into_iter().find(|r| r.id == id))
    }

    /// Remove every record whose identifier is in `ids`; returns the remainder.
    pub fn delete_records<I, T>(&self, ids: I) -> StoreResult<Vec<StoredRecord>>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let ids: HashSet<String> = ids.into_iter().map(|id| id.as_ref().to_string()).collect();

        let mut records = self.read_for_update()?;
        let before = records.len();
        records.retain(|r| !ids.contains(&r.id));
        self.write(&records)?;

        tracing::debug!(removed = before - records.len(), total = records.len(), "Deleted records");
        Ok(records)
    }

    /// Replace the body of the record with `id`, keeping its identity.
    ///
    /// Does nothing (and writes nothing) when `id` is absent.
    pub fn replace_record(&self, id: &str, record: PatientRecord) -> StoreResult<Vec<StoredRecord>> {
        record.validate()?;

        let mut records = self.read_for_update()?;
        match records.iter_mut().find(|r| r.id == id) {
            Some(existing) => {
                existing.record = record;
                self.write(&records)?;
                tracing::debug!(id, "Replaced record");
            }
            None => {
                tracing::debug!(id, "Replace skipped, no such record");
            }
        }
        Ok(records)
    }

    /// Overwrite the whole collection.
    pub fn replace_all(&self, records: &[StoredRecord]) -> StoreResult<()> {
        let mut seen = HashSet::new();
        if let Some(dup) = records.iter().find(|r| !seen.insert(r.id.as_str())) {
            return Err(StoreError::Parse(format!("duplicate record id: {}", dup.id)));
        }
        self.write(records)?;
        tracing::info!(total = records.len(), "Replaced collection");
        Ok(())
    }

    /// Canonical slot first, then legacy slots.
    fn load_payload(&self) -> StoreResult<Option<String>> {
        if let Some(payload) = self.storage.load(&self.config.slot_name)? {
            return Ok(Some(payload));
        }
        for legacy in &self.config.legacy_slot_names {
            if let Some(payload) = self.storage.load(legacy)? {
                tracing::info!(slot = %legacy, "Reading records from legacy slot");
                return Ok(Some(payload));
            }
        }
        Ok(None)
    }

    /// Strict read used before every mutation; corrupt data aborts the write.
    fn read_for_update(&self) -> StoreResult<Vec<StoredRecord>> {
        match self.load_payload()? {
            Some(payload) => codec::decode_collection(&payload, false).map_err(|e| {
                StoreError::Persistence(format!("existing collection is corrupt: {}", e))
            }),
            None => Ok(Vec::new()),
        }
    }

    fn write(&self, records: &[StoredRecord]) -> StoreResult<()> {
        let payload = codec::encode_collection(records)?;
        self.storage.save(&self.config.slot_name, &payload)
    }
}

//! JSON backup and restore of the whole collection.
//!
//! Document shape: `{ "timestamp": ..., "data": [StoredRecord...], "checksum": ... }`.
//! `checksum` is the hex SHA-256 of the serialized `data` array; documents
//! without one (older backups) are accepted unverified.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::models::StoredRecord;
use crate::store::{RecordStore, SlotStorage, StoreError};

/// Backup errors.
#[derive(Error, Debug)]
pub enum BackupError {
    #[error("Invalid backup format: {0}")]
    InvalidFormat(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

pub type BackupResult<T> = Result<T, BackupError>;

/// A backup document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Backup {
    /// When the backup was taken
    pub timestamp: DateTime<Utc>,
    /// The full collection
    pub data: Vec<StoredRecord>,
    /// Hex SHA-256 of the serialized `data`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
}

impl Backup {
    /// Snapshot a collection now.
    pub fn new(data: Vec<StoredRecord>) -> BackupResult<Self> {
        let checksum = checksum_of(&data)?;
        Ok(Self {
            timestamp: Utc::now(),
            data,
            checksum: Some(checksum),
        })
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse and verify a backup document.
    pub fn from_json(text: &str) -> BackupResult<Self> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| BackupError::Parse(e.to_string()))?;
        let object = value
            .as_object()
            .ok_or_else(|| BackupError::InvalidFormat("expected a JSON object".into()))?;

        let items = object
            .get("data")
            .ok_or_else(|| BackupError::InvalidFormat("missing `data`".into()))?
            .as_array()
            .ok_or_else(|| BackupError::InvalidFormat("`data` is not an array".into()))?;

        let timestamp = match object.get("timestamp") {
            Some(Value::String(s)) => DateTime::parse_from_rfc3339(s)
                .map(|t| t.with_timezone(&Utc))
                .map_err(|e| BackupError::Parse(format!("timestamp: {}", e)))?,
            Some(Value::Number(n)) => n
                .as_i64()
                .and_then(DateTime::<Utc>::from_timestamp_millis)
                .ok_or_else(|| BackupError::Parse(format!("timestamp: {}", n)))?,
            None | Some(Value::Null) => Utc::now(),
            Some(other) => {
                return Err(BackupError::Parse(format!("timestamp: {}", other)));
            }
        };

        let mut data = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let record = StoredRecord::from_value(item.clone())
                .map_err(|e| BackupError::Parse(format!("record {}: {}", index, e)))?;
            data.push(record);
        }

        let checksum = match object.get("checksum") {
            Some(Value::String(expected)) => {
                let actual = checksum_of(&data)?;
                if !actual.eq_ignore_ascii_case(expected) {
                    return Err(BackupError::InvalidFormat(format!(
                        "checksum mismatch: expected {}, computed {}",
                        expected, actual
                    )));
                }
                Some(actual)
            }
            _ => None,
        };

        Ok(Self {
            timestamp,
            data,
            checksum,
        })
    }
}

/// Hex SHA-256 of the serialized collection.
pub fn checksum_of(data: &[StoredRecord]) -> BackupResult<String> {
    let json = serde_json::to_string(data).map_err(|e| BackupError::Parse(e.to_string()))?;
    Ok(hex::encode(Sha256::digest(json.as_bytes())))
}

/// Snapshot the store's current collection.
pub fn create_backup<S: SlotStorage>(store: &RecordStore<S>) -> BackupResult<Backup> {
    let backup = Backup::new(store.list_records()?)?;
    tracing::info!(records = backup.data.len(), "Created backup");
    Ok(backup)
}

/// Replace the store's collection with the backup's; returns the record count.
pub fn restore_backup<S: SlotStorage>(store: &RecordStore<S>, backup: &Backup) -> BackupResult<usize> {
    store.replace_all(&backup.data)?;
    tracing::info!(records = backup.data.len(), timestamp = %backup.timestamp, "Restored backup");
    Ok(backup.data.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use crate::models::PatientRecord;
    use crate::store::MemorySlots;

    fn store_with(names: &[&str]) -> RecordStore<MemorySlots> {
        let store = RecordStore::new(MemorySlots::new(), StoreConfig::default());
        for name in names {
            store
                .save_record(PatientRecord::new(*name, "901231-1234567"))
                .unwrap();
        }
        store
    }

    #[test]
    fn test_backup_round_trip() {
        let source = store_with(&["Kim", "Lee"]);
        let backup = create_backup(&source).unwrap();
        let json = backup.to_json().unwrap();

        let parsed = Backup::from_json(&json).unwrap();
        assert_eq!(parsed, backup);

        let target = store_with(&["Other"]);
        assert_eq!(restore_backup(&target, &parsed).unwrap(), 2);
        assert_eq!(target.list_records().unwrap(), source.list_records().unwrap());
    }

    #[test]
    fn test_missing_or_wrong_data() {
        assert!(matches!(
            Backup::from_json(r#"{"timestamp":"2024-01-05T09:00:00Z"}"#),
            Err(BackupError::InvalidFormat(_))
        ));
        assert!(matches!(
            Backup::from_json(r#"{"data":{"id":"1"}}"#),
            Err(BackupError::InvalidFormat(_))
        ));
        assert!(matches!(Backup::from_json("[]"), Err(BackupError::InvalidFormat(_))));
        assert!(matches!(Backup::from_json("{oops"), Err(BackupError::Parse(_))));
    }

    #[test]
    fn test_legacy_backup_without_checksum() {
        let json = r#"{
            "timestamp": "2024-01-05T09:00:00.000Z",
            "data": [{"id": "1704445200000", "createdAt": "2024-01-05T09:00:00.000Z",
                      "name": "Kim", "residentNumber": "901231-1234567"}]
        }"#;
        let backup = Backup::from_json(json).unwrap();
        assert_eq!(backup.data.len(), 1);
        assert_eq!(backup.checksum, None);
    }

    #[test]
    fn test_checksum_mismatch() {
        let source = store_with(&["Kim"]);
        let mut backup = create_backup(&source).unwrap();
        backup.data[0].record.memo = "tampered".into();
        let json = backup.to_json().unwrap();

        assert!(matches!(
            Backup::from_json(&json),
            Err(BackupError::InvalidFormat(ref msg)) if msg.starts_with("checksum mismatch")
        ));
    }

    #[test]
    fn test_bad_record_aborts_restore() {
        let json = r#"{"data": [{"id": "1", "createdAt": "yesterday"}]}"#;
        assert!(matches!(Backup::from_json(json), Err(BackupError::Parse(_))));
    }
}

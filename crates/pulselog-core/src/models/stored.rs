//! Stored record: a patient record plus store-assigned identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::PatientRecord;

/// A patient record as persisted in the collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoredRecord {
    /// Unique identifier (UUID v4); older collections used a numeric `_id`
    #[serde(alias = "_id", deserialize_with = "super::compat::text")]
    pub id: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Record body
    #[serde(flatten)]
    pub record: PatientRecord,
}

impl StoredRecord {
    /// Wrap a record with a fresh identifier and the current time.
    pub fn new(record: PatientRecord) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            record,
        }
    }

    /// Decode one collection element, migrating legacy shapes.
    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        let mut stored: StoredRecord = serde_json::from_value(value)?;
        stored.record.refresh_derived();
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Gender;

    #[test]
    fn test_new_stored_record() {
        let stored = StoredRecord::new(PatientRecord::new("Kim", "901231-1234567"));
        assert_eq!(stored.id.len(), 36); // UUID format
        assert_eq!(stored.record.gender(), Some(Gender::Male));
    }

    #[test]
    fn test_json_shape() {
        let stored = StoredRecord::new(PatientRecord::new("Kim", "901231-1234567"));
        let json = serde_json::to_value(&stored).unwrap();
        assert_eq!(json["id"], stored.id.as_str());
        assert!(json["createdAt"].is_string());
        assert_eq!(json["name"], "Kim");

        let back = StoredRecord::from_value(json).unwrap();
        assert_eq!(back, stored);
    }

    #[test]
    fn test_legacy_identifier_key() {
        let json = serde_json::json!({
            "_id": "1704445200000",
            "createdAt": "2024-01-05T09:00:00.000Z",
            "name": "Kim",
            "residentNumber": "901231-1234567",
            "height": "170",
            "weight": "65",
            "bmi": "",
        });
        let stored = StoredRecord::from_value(json).unwrap();
        assert_eq!(stored.id, "1704445200000");
        assert_eq!(stored.record.bmi(), Some(22.5));
        assert_eq!(stored.record.gender(), Some(Gender::Male));
    }

    #[test]
    fn test_decode_rederives_gender() {
        let json = serde_json::json!({
            "id": "1",
            "createdAt": "2024-01-05T09:00:00.000Z",
            "name": "Kim",
            "residentNumber": "901231-7234567",
            "gender": "male",
        });
        let stored = StoredRecord::from_value(json).unwrap();
        assert_eq!(stored.record.gender(), None);
    }
}

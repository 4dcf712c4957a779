//! Collection (de)serialization.

use serde_json::Value;

use super::{StoreError, StoreResult};
use crate::models::StoredRecord;

/// Decode a serialized collection.
///
/// Strict decoding fails on the first bad element. Lenient decoding skips
/// bad elements but still fails if the payload is not a JSON array.
pub(crate) fn decode_collection(payload: &str, lenient: bool) -> StoreResult<Vec<StoredRecord>> {
    let values: Vec<Value> = serde_json::from_str(payload)
        .map_err(|e| StoreError::Parse(format!("collection is not a JSON array: {}", e)))?;

    let mut records = Vec::with_capacity(values.len());
    for (index, value) in values.into_iter().enumerate() {
        match StoredRecord::from_value(value) {
            Ok(record) => records.push(record),
            Err(e) if lenient => {
                tracing::warn!(index, error = %e, "Skipping undecodable record");
            }
            Err(e) => {
                return Err(StoreError::Parse(format!("record {}: {}", index, e)));
            }
        }
    }
    Ok(records)
}

/// Serialize a collection as one JSON array.
pub(crate) fn encode_collection(records: &[StoredRecord]) -> StoreResult<String> {
    serde_json::to_string(records).map_err(|e| StoreError::Persistence(e.to_string()))
}

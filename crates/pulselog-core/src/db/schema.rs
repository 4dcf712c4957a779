//! SQLite schema definition.

/// Complete database schema for pulselog.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Storage Slots
-- ============================================================================

-- One row per named slot; payload is the whole serialized collection.
CREATE TABLE IF NOT EXISTS storage_slots (
    name TEXT PRIMARY KEY,
    payload TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;

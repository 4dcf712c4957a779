//! Named storage slot operations.

use rusqlite::{params, OptionalExtension};

use super::{Database, DbResult};

impl Database {
    /// Read a slot's payload, `None` if the slot was never written.
    pub fn read_slot(&self, name: &str) -> DbResult<Option<String>> {
        self.conn
            .query_row(
                "SELECT payload FROM storage_slots WHERE name = ?",
                [name],
                |row| row.get(0),
            )
            .optional()
            .map_err(Into::into)
    }

    /// Replace a slot's payload in a single statement.
    pub fn write_slot(&self, name: &str, payload: &str) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO storage_slots (name, payload, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(name) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at
            "#,
            params![name, payload, chrono::Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    /// Names of all written slots.
    pub fn list_slots(&self) -> DbResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM storage_slots ORDER BY name")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Last write time of a slot (RFC 3339).
    pub fn slot_updated_at(&self, name: &str) -> DbResult<Option<String>> {
        self.conn
            .query_row(
                "SELECT updated_at FROM storage_slots WHERE name = ?",
                [name],
                |row| row.get(0),
            )
            .optional()
            .map_err(Into::into)
    }
}

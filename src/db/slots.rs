use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

/// Read the raw value stored under `key`, if any.
pub fn read_slot(conn: &Connection, key: &str) -> Result<Option<String>> {
    conn.query_row(
        "SELECT value FROM slots WHERE key = ?1",
        params![key],
        |row| row.get(0),
    )
    .optional()
    .with_context(|| format!("failed to read slot `{key}`"))
}

/// Overwrite the value stored under `key` in full.
pub fn write_slot(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO slots (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![key, value],
    )
    .with_context(|| format!("failed to write slot `{key}`"))?;
    Ok(())
}

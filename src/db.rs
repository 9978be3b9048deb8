use anyhow::Context;
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;

use crate::store::Slot;

pub const DB_FILE: &str = "schedule.sqlite3";

pub fn open_db(workspace: &Path) -> anyhow::Result<Connection> {
    std::fs::create_dir_all(workspace)
        .with_context(|| format!("failed to create workspace {}", workspace.to_string_lossy()))?;
    let db_path = workspace.join(DB_FILE);
    let conn = Connection::open(&db_path)
        .with_context(|| format!("failed to open database {}", db_path.to_string_lossy()))?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS kv_slots(
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )?;

    Ok(conn)
}

pub fn slot_get(conn: &Connection, key: &str) -> anyhow::Result<Option<String>> {
    let value: Option<String> = conn
        .query_row("SELECT value FROM kv_slots WHERE key = ?", [key], |r| {
            r.get(0)
        })
        .optional()?;
    Ok(value)
}

pub fn slot_set(conn: &Connection, key: &str, value: &str) -> anyhow::Result<()> {
    let updated_at = chrono::Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO kv_slots(key, value, updated_at) VALUES(?, ?, ?)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        (key, value, &updated_at),
    )?;
    Ok(())
}

/// Persisted slot backed by one row of the workspace database.
pub struct SqliteSlot {
    conn: Connection,
    key: String,
}

impl SqliteSlot {
    pub fn new(conn: Connection, key: impl Into<String>) -> Self {
        Self {
            conn,
            key: key.into(),
        }
    }
}

impl Slot for SqliteSlot {
    fn read(&self) -> anyhow::Result<Option<String>> {
        slot_get(&self.conn, &self.key)
    }

    fn write(&mut self, value: &str) -> anyhow::Result<()> {
        slot_set(&self.conn, &self.key, value)
    }
}

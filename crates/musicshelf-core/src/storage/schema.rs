//! SQLite schema for the singer cache
//!
//! The cache is disposable: it can always be rebuilt from the remote source.

use rusqlite::{Connection, Result};

/// Current schema version for migrations
pub const SCHEMA_VERSION: i32 = 1;

/// Initialize the database schema
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- Schema version tracking
        CREATE TABLE IF NOT EXISTS schema_info (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );

        -- Singers, in the order the remote source returned them
        CREATE TABLE IF NOT EXISTS singers (
            id INTEGER PRIMARY KEY,
            position INTEGER NOT NULL,
            name TEXT NOT NULL,
            genres TEXT NOT NULL,
            tracks INTEGER NOT NULL,
            albums INTEGER NOT NULL,
            link TEXT,
            description TEXT NOT NULL,
            cover_small TEXT,
            cover_big TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_singers_position ON singers(position);
        "#,
    )?;

    conn.execute(
        "INSERT OR REPLACE INTO schema_info (key, value) VALUES ('version', ?)",
        [SCHEMA_VERSION.to_string()],
    )?;

    Ok(())
}

/// Check whether the schema has to be (re)created
pub fn needs_init(conn: &Connection) -> bool {
    get_schema_version(conn).map_or(true, |v| v != SCHEMA_VERSION)
}

/// Read the stored schema version, if any
pub fn get_schema_version(conn: &Connection) -> Option<i32> {
    conn.query_row(
        "SELECT value FROM schema_info WHERE key = 'version'",
        [],
        |row| row.get::<_, String>(0),
    )
    .ok()
    .and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_schema() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(needs_init(&conn));

        init_schema(&conn).unwrap();
        assert!(!needs_init(&conn));
        assert_eq!(get_schema_version(&conn), Some(SCHEMA_VERSION));
    }

    #[test]
    fn test_init_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        init_schema(&conn).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM singers", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}

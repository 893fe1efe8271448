use anyhow::{Context, Result};
use rusqlite::Connection;

use super::schema;

/// Thin wrapper around the application's SQLite connection.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens (or creates) a SQLite database at the provided path and
    /// enables foreign keys immediately.
    ///
    /// # Examples
    /// ```
    /// use tariff_ui::services::database::Database;
    /// let db = Database::new(":memory:").unwrap();
    /// db.initialize_schema().unwrap();
    /// ```
    pub fn new(path: &str) -> Result<Self> {
        let conn =
            Connection::open(path).context(format!("Failed to open database at {}", path))?;

        conn.execute("PRAGMA foreign_keys = ON", [])
            .context("Failed to enable foreign keys")?;

        Ok(Self { conn })
    }

    /// Provides read/write access to the underlying `rusqlite::Connection`.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Creates tables if they do not exist yet.
    pub fn initialize_schema(&self) -> Result<()> {
        schema::initialize_schema(self.connection())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_new_database_in_memory() {
        let result = Database::new(":memory:");
        assert!(result.is_ok(), "Should create in-memory database");
    }

    #[test]
    fn test_new_database_with_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let db_path_str = db_path.to_str().unwrap();

        let result = Database::new(db_path_str);
        assert!(result.is_ok(), "Should create file-based database");
        assert!(Path::new(db_path_str).exists(), "Database file should exist");
    }

    #[test]
    fn test_initialize_schema_is_idempotent() {
        let db = Database::new(":memory:").unwrap();
        assert!(db.initialize_schema().is_ok());
        assert!(db.initialize_schema().is_ok(), "Second run should be a no-op");
    }

    #[test]
    fn test_tables_exist() {
        let db = Database::new(":memory:").unwrap();
        db.initialize_schema().unwrap();

        for table in ["pricing_schemes", "demands"] {
            let count: i64 = db
                .connection()
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
                    [table],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(count, 1, "{} table should exist", table);
        }
    }

    #[test]
    fn test_foreign_keys_enabled() {
        let db = Database::new(":memory:").unwrap();
        let enabled: i64 = db
            .connection()
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(enabled, 1);
    }
}

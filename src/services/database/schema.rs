use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn initialize_schema(conn: &Connection) -> Result<()> {
    create_pricing_schemes_table(conn)?;
    create_demands_table(conn)?;
    Ok(())
}

fn create_pricing_schemes_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS pricing_schemes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )
    .context("Failed to create pricing_schemes table")?;

    Ok(())
}

fn create_demands_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS demands (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            scheme_id INTEGER NOT NULL REFERENCES pricing_schemes(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            description TEXT,
            start_time TEXT NOT NULL,
            end_time TEXT NOT NULL,
            start_month INTEGER NOT NULL CHECK (start_month BETWEEN 1 AND 12),
            end_month INTEGER NOT NULL CHECK (end_month BETWEEN 1 AND 12),
            lookback_days INTEGER NOT NULL CHECK (lookback_days >= 1),
            price_base REAL NOT NULL CHECK (price_base > 0),
            weekday_applicability TEXT NOT NULL DEFAULT 'all_days',
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )
    .context("Failed to create demands table")?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_demands_scheme ON demands(scheme_id)",
        [],
    )
    .context("Failed to create demands index")?;

    Ok(())
}

//! Pricing scheme lookup and creation.

use anyhow::{bail, Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::models::scheme::PricingScheme;
use crate::services::sql_timestamp;

pub struct SchemeService<'a> {
    conn: &'a Connection,
}

impl<'a> SchemeService<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Find a scheme by name, creating it on first use.
    pub fn get_or_create(&self, name: &str) -> Result<PricingScheme> {
        let name = name.trim();
        if name.is_empty() {
            bail!("Scheme name cannot be empty");
        }

        if let Some(existing) = self.get_by_name(name)? {
            return Ok(existing);
        }

        self.conn
            .execute("INSERT INTO pricing_schemes (name) VALUES (?1)", params![name])
            .context("Failed to insert pricing scheme")?;
        log::info!("Created pricing scheme '{}'", name);

        let id = self.conn.last_insert_rowid();
        self.get_by_id(id)
    }

    pub fn get_by_id(&self, id: i64) -> Result<PricingScheme> {
        self.conn
            .query_row(
                "SELECT id, name, created_at FROM pricing_schemes WHERE id = ?1",
                params![id],
                row_to_scheme,
            )
            .context("Pricing scheme not found")
    }

    pub fn get_by_name(&self, name: &str) -> Result<Option<PricingScheme>> {
        let scheme = self
            .conn
            .query_row(
                "SELECT id, name, created_at FROM pricing_schemes WHERE name = ?1",
                params![name],
                row_to_scheme,
            )
            .optional()?;
        Ok(scheme)
    }

    pub fn list_all(&self) -> Result<Vec<PricingScheme>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, created_at FROM pricing_schemes ORDER BY name ASC")?;
        let schemes = stmt
            .query_map([], row_to_scheme)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(schemes)
    }
}

fn row_to_scheme(row: &Row) -> rusqlite::Result<PricingScheme> {
    Ok(PricingScheme {
        id: row.get(0)?,
        name: row.get(1)?,
        created_at: sql_timestamp(row.get::<_, Option<String>>(2)?.as_deref()),
    })
}

//! Demand persistence for pricing schemes.
//!
//! `DemandService` is the SQLite-backed store the editor page saves through.
//! The page only depends on the `DemandStore` trait so it can be exercised
//! against a mock.

use anyhow::{anyhow, bail, Context, Result};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};

use crate::models::demand::{DemandPayload, DemandPeriod, DemandRecord, WeekdayApplicability};
use crate::services::sql_timestamp;

/// Persistence collaborator for demand windows.
#[cfg_attr(test, mockall::automock)]
pub trait DemandStore {
    fn list_for_scheme(&self, scheme_id: i64) -> Result<Vec<DemandRecord>>;
    fn create(&self, scheme_id: i64, payload: &DemandPayload) -> Result<DemandRecord>;
    fn update(&self, id: i64, payload: &DemandPayload) -> Result<DemandRecord>;
    fn delete(&self, id: i64) -> Result<()>;
}

const DEMAND_COLUMNS: &str = "id, scheme_id, name, description, start_time, end_time, \
     start_month, end_month, lookback_days, price_base, weekday_applicability, created_at";

pub struct DemandService<'a> {
    conn: &'a Connection,
}

impl<'a> DemandService<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn get_by_id(&self, id: i64) -> Result<DemandRecord> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM demands WHERE id = ?1", DEMAND_COLUMNS),
                params![id],
                row_to_demand,
            )
            .with_context(|| format!("Demand {} not found", id))
    }

    /// Existing demand in the scheme with the same period, ignoring `exclude_id`.
    pub fn find_duplicate_period(
        &self,
        scheme_id: i64,
        period: DemandPeriod<'_>,
        exclude_id: Option<i64>,
    ) -> Result<Option<DemandRecord>> {
        let duplicate = self
            .list_for_scheme(scheme_id)?
            .into_iter()
            .find(|existing| Some(existing.id) != exclude_id && existing.period() == period);
        Ok(duplicate)
    }

    fn ensure_unique_period(
        &self,
        scheme_id: i64,
        payload: &DemandPayload,
        exclude_id: Option<i64>,
    ) -> Result<()> {
        if let Some(existing) = self.find_duplicate_period(scheme_id, payload.period(), exclude_id)? {
            log::warn!(
                "Rejected demand '{}': period matches existing demand {}",
                payload.name,
                existing.id
            );
            bail!("A demand with the same period already exists: {}", existing.name);
        }
        Ok(())
    }
}

impl DemandStore for DemandService<'_> {
    fn list_for_scheme(&self, scheme_id: i64) -> Result<Vec<DemandRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM demands WHERE scheme_id = ?1 ORDER BY created_at ASC, id ASC",
            DEMAND_COLUMNS
        ))?;
        let demands = stmt
            .query_map(params![scheme_id], row_to_demand)?
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to load demands")?;
        Ok(demands)
    }

    fn create(&self, scheme_id: i64, payload: &DemandPayload) -> Result<DemandRecord> {
        self.ensure_unique_period(scheme_id, payload, None)?;

        self.conn
            .execute(
                "INSERT INTO demands (scheme_id, name, description, start_time, end_time,
                    start_month, end_month, lookback_days, price_base, weekday_applicability)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    scheme_id,
                    payload.name,
                    payload.description,
                    payload.start_time,
                    payload.end_time,
                    payload.start_month,
                    payload.end_month,
                    payload.lookback_days,
                    payload.price_base,
                    payload.weekday_applicability.as_str(),
                ],
            )
            .context("Failed to insert demand")?;

        let id = self.conn.last_insert_rowid();
        log::info!("Created demand {} '{}' in scheme {}", id, payload.name, scheme_id);
        self.get_by_id(id)
    }

    fn update(&self, id: i64, payload: &DemandPayload) -> Result<DemandRecord> {
        let current = self.get_by_id(id)?;
        self.ensure_unique_period(current.scheme_id, payload, Some(id))?;

        let changed = self
            .conn
            .execute(
                "UPDATE demands
                 SET name = ?1, description = ?2, start_time = ?3, end_time = ?4,
                     start_month = ?5, end_month = ?6, lookback_days = ?7, price_base = ?8,
                     weekday_applicability = ?9, updated_at = CURRENT_TIMESTAMP
                 WHERE id = ?10",
                params![
                    payload.name,
                    payload.description,
                    payload.start_time,
                    payload.end_time,
                    payload.start_month,
                    payload.end_month,
                    payload.lookback_days,
                    payload.price_base,
                    payload.weekday_applicability.as_str(),
                    id,
                ],
            )
            .context("Failed to update demand")?;
        if changed == 0 {
            return Err(anyhow!("Demand {} not found", id));
        }

        log::info!("Updated demand {} '{}'", id, payload.name);
        self.get_by_id(id)
    }

    fn delete(&self, id: i64) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM demands WHERE id = ?1", params![id])
            .context("Failed to delete demand")?;
        if changed == 0 {
            bail!("Demand {} not found", id);
        }
        log::info!("Deleted demand {}", id);
        Ok(())
    }
}

fn row_to_demand(row: &Row) -> rusqlite::Result<DemandRecord> {
    let applicability: String = row.get(10)?;
    let weekday_applicability = WeekdayApplicability::parse(&applicability).ok_or_else(|| {
        rusqlite::Error::InvalidColumnType(10, "weekday_applicability".to_string(), Type::Text)
    })?;

    Ok(DemandRecord {
        id: row.get(0)?,
        scheme_id: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        start_time: row.get(4)?,
        end_time: row.get(5)?,
        start_month: row.get(6)?,
        end_month: row.get(7)?,
        lookback_days: row.get(8)?,
        price_base: row.get(9)?,
        weekday_applicability,
        created_at: sql_timestamp(row.get::<_, Option<String>>(11)?.as_deref()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::database::Database;
    use crate::services::scheme::SchemeService;
    use pretty_assertions::assert_eq;

    fn setup() -> (Database, i64) {
        let db = Database::new(":memory:").unwrap();
        db.initialize_schema().unwrap();
        let scheme_id = SchemeService::new(db.connection())
            .get_or_create("Test scheme")
            .unwrap()
            .id;
        (db, scheme_id)
    }

    fn payload(name: &str, start: &str, end: &str) -> DemandPayload {
        DemandPayload {
            name: name.to_string(),
            description: None,
            start_time: start.to_string(),
            end_time: end.to_string(),
            start_month: 1,
            end_month: 12,
            lookback_days: 30,
            price_base: 0.1234,
            weekday_applicability: WeekdayApplicability::AllDays,
        }
    }

    #[test]
    fn test_create_and_get() {
        let (db, scheme_id) = setup();
        let service = DemandService::new(db.connection());

        let mut request = payload("Peak", "16:00", "21:00");
        request.description = Some("Evening peak".to_string());
        request.start_month = 11;
        request.end_month = 2;
        request.weekday_applicability = WeekdayApplicability::Weekday;

        let created = service.create(scheme_id, &request).unwrap();
        assert_eq!(created.scheme_id, scheme_id);
        assert_eq!(created.name, "Peak");
        assert_eq!(created.description.as_deref(), Some("Evening peak"));
        assert_eq!(created.start_month, 11);
        assert_eq!(created.end_month, 2);
        assert_eq!(created.weekday_applicability, WeekdayApplicability::Weekday);
        assert!(created.created_at.is_some());

        let fetched = service.get_by_id(created.id).unwrap();
        assert_eq!(fetched, created);
    }

    #[test]
    fn test_list_for_scheme_in_creation_order() {
        let (db, scheme_id) = setup();
        let service = DemandService::new(db.connection());
        service.create(scheme_id, &payload("Morning", "07:00", "09:00")).unwrap();
        service.create(scheme_id, &payload("Evening", "17:00", "20:00")).unwrap();

        let names: Vec<String> = service
            .list_for_scheme(scheme_id)
            .unwrap()
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, vec!["Morning", "Evening"]);
    }

    #[test]
    fn test_list_is_scoped_to_scheme() {
        let (db, scheme_id) = setup();
        let other = SchemeService::new(db.connection())
            .get_or_create("Other scheme")
            .unwrap()
            .id;
        let service = DemandService::new(db.connection());
        service.create(other, &payload("Elsewhere", "07:00", "09:00")).unwrap();

        assert!(service.list_for_scheme(scheme_id).unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_period_rejected_on_create() {
        let (db, scheme_id) = setup();
        let service = DemandService::new(db.connection());
        service.create(scheme_id, &payload("Peak", "16:00", "21:00")).unwrap();

        let err = service
            .create(scheme_id, &payload("Peak again", "16:00", "21:00"))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "A demand with the same period already exists: Peak"
        );
    }

    #[test]
    fn test_different_applicability_is_not_duplicate() {
        let (db, scheme_id) = setup();
        let service = DemandService::new(db.connection());
        service.create(scheme_id, &payload("Peak", "16:00", "21:00")).unwrap();

        let mut weekend = payload("Weekend peak", "16:00", "21:00");
        weekend.weekday_applicability = WeekdayApplicability::Weekend;
        assert!(service.create(scheme_id, &weekend).is_ok());
    }

    #[test]
    fn test_update_keeps_own_period() {
        let (db, scheme_id) = setup();
        let service = DemandService::new(db.connection());
        let created = service.create(scheme_id, &payload("Peak", "16:00", "21:00")).unwrap();

        let mut changed = payload("Peak renamed", "16:00", "21:00");
        changed.price_base = 0.5;
        let updated = service.update(created.id, &changed).unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "Peak renamed");
        assert_eq!(updated.price_base, 0.5);
    }

    #[test]
    fn test_update_into_other_period_rejected() {
        let (db, scheme_id) = setup();
        let service = DemandService::new(db.connection());
        service.create(scheme_id, &payload("Peak", "16:00", "21:00")).unwrap();
        let shoulder = service.create(scheme_id, &payload("Shoulder", "07:00", "16:00")).unwrap();

        let result = service.update(shoulder.id, &payload("Shoulder", "16:00", "21:00"));
        assert!(result.is_err());
    }

    #[test]
    fn test_update_missing() {
        let (db, _) = setup();
        let service = DemandService::new(db.connection());
        assert!(service.update(99, &payload("Ghost", "01:00", "02:00")).is_err());
    }

    #[test]
    fn test_delete() {
        let (db, scheme_id) = setup();
        let service = DemandService::new(db.connection());
        let created = service.create(scheme_id, &payload("Peak", "16:00", "21:00")).unwrap();

        service.delete(created.id).unwrap();
        assert!(service.get_by_id(created.id).is_err());
        assert!(service.delete(created.id).is_err(), "Second delete should fail");
    }

    #[test]
    fn test_unknown_applicability_is_an_error() {
        let (db, scheme_id) = setup();
        let service = DemandService::new(db.connection());
        let created = service.create(scheme_id, &payload("Peak", "16:00", "21:00")).unwrap();
        db.connection()
            .execute(
                "UPDATE demands SET weekday_applicability = 'holidays' WHERE id = ?1",
                params![created.id],
            )
            .unwrap();

        assert!(service.get_by_id(created.id).is_err());
    }
}

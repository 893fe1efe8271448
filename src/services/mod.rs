// Service module exports
// Persistence for pricing schemes and demand windows, plus config loading

use chrono::{DateTime, Local, NaiveDateTime};

pub mod database;
pub mod demand;
pub mod scheme;
pub mod settings;

/// Parse a SQLite `CURRENT_TIMESTAMP` value (UTC) into local time.
pub(crate) fn sql_timestamp(value: Option<&str>) -> Option<DateTime<Local>> {
    NaiveDateTime::parse_from_str(value?, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc().with_timezone(&Local))
}

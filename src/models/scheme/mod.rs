//! Pricing scheme model.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// A tariff pricing scheme that owns a set of demand windows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingScheme {
    pub id: i64,
    pub name: String,
    pub created_at: Option<DateTime<Local>>,
}

//! Demand charge model.
//!
//! A demand window prices peak draw within a daily time range, over an
//! inclusive month range that may wrap across the year boundary.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::utils::time::{is_valid_time, normalize_time, END_OF_DAY};

/// Which calendar days a demand window applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekdayApplicability {
    #[default]
    AllDays,
    Weekday,
    Weekend,
}

impl WeekdayApplicability {
    pub const ALL: [WeekdayApplicability; 3] = [Self::AllDays, Self::Weekday, Self::Weekend];

    /// Storage/wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AllDays => "all_days",
            Self::Weekday => "weekday",
            Self::Weekend => "weekend",
        }
    }

    /// Human-readable label for tooltips and pickers.
    pub fn label(&self) -> &'static str {
        match self {
            Self::AllDays => "All days",
            Self::Weekday => "Weekdays",
            Self::Weekend => "Weekends",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "all_days" => Some(Self::AllDays),
            "weekday" => Some(Self::Weekday),
            "weekend" => Some(Self::Weekend),
            _ => None,
        }
    }
}

/// A persisted demand window belonging to a pricing scheme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandRecord {
    pub id: i64,
    pub scheme_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub start_time: String,
    pub end_time: String,
    pub start_month: u32,
    pub end_month: u32,
    pub lookback_days: u32,
    pub price_base: f64,
    pub weekday_applicability: WeekdayApplicability,
    pub created_at: Option<DateTime<Local>>,
}

impl DemandRecord {
    /// The fields that identify a demand's charging period.
    pub fn period(&self) -> DemandPeriod<'_> {
        DemandPeriod {
            start_time: &self.start_time,
            end_time: &self.end_time,
            start_month: self.start_month,
            end_month: self.end_month,
            weekday_applicability: self.weekday_applicability,
        }
    }
}

/// Period key used to detect duplicate demand windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemandPeriod<'a> {
    pub start_time: &'a str,
    pub end_time: &'a str,
    pub start_month: u32,
    pub end_month: u32,
    pub weekday_applicability: WeekdayApplicability,
}

/// Normalized create/update request for the persistence layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandPayload {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_time: String,
    pub end_time: String,
    pub start_month: u32,
    pub end_month: u32,
    pub lookback_days: u32,
    pub price_base: f64,
    pub weekday_applicability: WeekdayApplicability,
}

impl DemandPayload {
    pub fn period(&self) -> DemandPeriod<'_> {
        DemandPeriod {
            start_time: &self.start_time,
            end_time: &self.end_time,
            start_month: self.start_month,
            end_month: self.end_month,
            weekday_applicability: self.weekday_applicability,
        }
    }
}

/// Validation failures, reported one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DemandValidationError {
    #[error("Demand name is required.")]
    NameRequired,
    #[error("Time must follow HH:MM format.")]
    InvalidTimeFormat,
    #[error("Start time and end time cannot be the same.")]
    SameStartAndEnd,
    #[error("Month must be between 1 and 12.")]
    MonthOutOfRange,
    #[error("Lookback days must be at least 1.")]
    LookbackTooSmall,
    #[error("Price base must be greater than 0.")]
    PriceNotPositive,
}

/// Raw form fields as typed by the user.
#[derive(Debug, Clone, PartialEq)]
pub struct DemandForm {
    pub name: String,
    pub description: String,
    pub start_time: String,
    pub end_time: String,
    pub start_month: String,
    pub end_month: String,
    pub lookback_days: String,
    pub price_base: String,
    pub weekday_applicability: WeekdayApplicability,
}

impl Default for DemandForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            start_time: String::new(),
            end_time: String::new(),
            start_month: "1".to_string(),
            end_month: "12".to_string(),
            lookback_days: "30".to_string(),
            price_base: String::new(),
            weekday_applicability: WeekdayApplicability::AllDays,
        }
    }
}

impl DemandForm {
    /// Blank form covering the given time window.
    pub fn for_range(start_time: impl Into<String>, end_time: impl Into<String>) -> Self {
        Self {
            start_time: start_time.into(),
            end_time: end_time.into(),
            ..Self::default()
        }
    }

    /// Form pre-filled from an existing record.
    pub fn from_record(record: &DemandRecord) -> Self {
        Self {
            name: record.name.clone(),
            description: record.description.clone().unwrap_or_default(),
            start_time: record.start_time.clone(),
            end_time: record.end_time.clone(),
            start_month: record.start_month.to_string(),
            end_month: record.end_month.to_string(),
            lookback_days: record.lookback_days.to_string(),
            price_base: record.price_base.to_string(),
            weekday_applicability: record.weekday_applicability,
        }
    }

    /// Normalize and validate the form into a payload.
    ///
    /// Rules are checked in order and the first failure is returned. The end
    /// time may also be the `24:00` end-of-day marker.
    pub fn validate(&self) -> Result<DemandPayload, DemandValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(DemandValidationError::NameRequired);
        }

        let start_time = normalize_time(&self.start_time);
        let end_time = normalize_time(&self.end_time);
        let end_ok = is_valid_time(&end_time) || end_time == END_OF_DAY;
        if !is_valid_time(&start_time) || !end_ok {
            return Err(DemandValidationError::InvalidTimeFormat);
        }
        if start_time == end_time {
            return Err(DemandValidationError::SameStartAndEnd);
        }

        let start_month = parse_month(&self.start_month)?;
        let end_month = parse_month(&self.end_month)?;

        let lookback_days = match self.lookback_days.trim().parse::<i64>() {
            Ok(days) if days >= 1 => {
                u32::try_from(days).map_err(|_| DemandValidationError::LookbackTooSmall)?
            }
            _ => return Err(DemandValidationError::LookbackTooSmall),
        };

        let price_base = match self.price_base.trim().parse::<f64>() {
            Ok(price) if price.is_finite() && price > 0.0 => price,
            _ => return Err(DemandValidationError::PriceNotPositive),
        };

        let description = self.description.trim();
        Ok(DemandPayload {
            name: name.to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
            start_time,
            end_time,
            start_month,
            end_month,
            lookback_days,
            price_base,
            weekday_applicability: self.weekday_applicability,
        })
    }
}

fn parse_month(value: &str) -> Result<u32, DemandValidationError> {
    match value.trim().parse::<u32>() {
        Ok(month) if (1..=12).contains(&month) => Ok(month),
        _ => Err(DemandValidationError::MonthOutOfRange),
    }
}

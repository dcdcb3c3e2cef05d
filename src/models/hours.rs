//! Worked-hours record model.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::CalendarDate;

/// Primary key of an hour record: one row per actor per day.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HourKey {
    pub date: CalendarDate,
    pub person_name: String,
}

impl HourKey {
    pub fn new(date: CalendarDate, person_name: impl Into<String>) -> Self {
        Self {
            date,
            person_name: person_name.into(),
        }
    }
}

impl fmt::Display for HourKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.date, self.person_name)
    }
}

/// Hours an actor worked on a day.
///
/// `hours` is exact decimal so monthly totals never drift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourRecord {
    pub date: CalendarDate,
    pub person_name: String,
    /// Within `[0, 24]`.
    pub hours: Decimal,
    /// Shared note for the whole date.
    pub remarks: String,
}

impl HourRecord {
    pub fn new(date: CalendarDate, person_name: impl Into<String>, hours: Decimal) -> Self {
        Self {
            date,
            person_name: person_name.into(),
            hours,
            remarks: String::new(),
        }
    }

    pub fn with_remarks(mut self, remarks: impl Into<String>) -> Self {
        self.remarks = remarks.into();
        self
    }

    pub fn key(&self) -> HourKey {
        HourKey::new(self.date, self.person_name.clone())
    }

    /// Copies writer-owned fields from `other`.
    pub fn apply_fields(&mut self, other: &HourRecord) {
        self.hours = other.hours;
        self.remarks.clone_from(&other.remarks);
    }
}

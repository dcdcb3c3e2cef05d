//! Availability submission model.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{CalendarDate, Confirmation, RoleCode};

/// Primary key of a submission: one row per person per day.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SubmissionKey {
    pub date: CalendarDate,
    pub person_id: String,
}

impl SubmissionKey {
    pub fn new(date: CalendarDate, person_id: impl Into<String>) -> Self {
        Self {
            date,
            person_id: person_id.into(),
        }
    }
}

impl fmt::Display for SubmissionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.date, self.person_id)
    }
}

/// A person's availability for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub date: CalendarDate,
    pub person_id: String,
    pub person_name: String,
    /// Role for the day; `None` until one is chosen.
    pub role: Option<RoleCode>,
    /// Whether the person asked to work this day.
    pub open_hope: bool,
    /// Day-wide flag; set on insert, then only by the coordinator.
    pub confirmed: Confirmation,
    pub remarks: String,
}

impl Submission {
    /// Creates an unconfirmed submission with no role.
    pub fn new(
        date: CalendarDate,
        person_id: impl Into<String>,
        person_name: impl Into<String>,
    ) -> Self {
        Self {
            date,
            person_id: person_id.into(),
            person_name: person_name.into(),
            role: None,
            open_hope: false,
            confirmed: Confirmation::N,
            remarks: String::new(),
        }
    }

    pub fn with_role(mut self, role: Option<RoleCode>) -> Self {
        self.role = role;
        self
    }

    pub fn with_open_hope(mut self, open_hope: bool) -> Self {
        self.open_hope = open_hope;
        self
    }

    pub fn with_remarks(mut self, remarks: impl Into<String>) -> Self {
        self.remarks = remarks.into();
        self
    }

    pub fn with_confirmed(mut self, confirmed: Confirmation) -> Self {
        self.confirmed = confirmed;
        self
    }

    pub fn key(&self) -> SubmissionKey {
        SubmissionKey::new(self.date, self.person_id.clone())
    }

    /// Copies writer-owned fields from `other`, leaving the key and
    /// `confirmed` untouched.
    pub fn apply_fields(&mut self, other: &Submission) {
        self.person_name.clone_from(&other.person_name);
        self.role = other.role;
        self.open_hope = other.open_hope;
        self.remarks.clone_from(&other.remarks);
    }
}

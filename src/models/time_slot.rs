//! Time-slot assignment model.
//!
//! A time slot is a program segment at a fixed time of day with a theme and
//! the performers on stage. Performers travel as a comma-joined list of
//! names and are kept as an ordered set.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{CalendarDate, Confirmation, TimeOfDay};

/// Primary key of a time slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeSlotKey {
    pub date: CalendarDate,
    pub time_of_day: TimeOfDay,
}

impl TimeSlotKey {
    pub fn new(date: CalendarDate, time_of_day: TimeOfDay) -> Self {
        Self { date, time_of_day }
    }
}

impl fmt::Display for TimeSlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date, self.time_of_day)
    }
}

/// Ordered set of performer names.
///
/// Insertion order is kept, blanks are dropped, and repeats collapse to the
/// first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Performers(Vec<String>);

impl Performers {
    /// Parses a comma-joined list such as `"A, B,A"`.
    pub fn parse(joined: &str) -> Self {
        Self::from_names(joined.split(','))
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out: Vec<String> = Vec::new();
        for name in names {
            let name = name.as_ref().trim();
            if !name.is_empty() && !out.iter().any(|n| n == name) {
                out.push(name.to_string());
            }
        }
        Self(out)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|n| n == name)
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Comma-joined form (`"A,B"`).
    pub fn joined(&self) -> String {
        self.0.join(",")
    }

    /// Narrows the set to `name` alone, empty if `name` is not a member.
    pub fn only(&self, name: &str) -> Self {
        Self(self.0.iter().filter(|n| *n == name).cloned().collect())
    }
}

impl From<String> for Performers {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<Performers> for String {
    fn from(value: Performers) -> Self {
        value.joined()
    }
}

/// Performers and theme assigned to one time slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlotAssignment {
    pub date: CalendarDate,
    pub time_of_day: TimeOfDay,
    pub theme: String,
    pub performers: Performers,
    /// Day-wide flag; set on insert, then only by the coordinator.
    pub confirmed: Confirmation,
}

impl TimeSlotAssignment {
    /// Creates an unconfirmed slot with no theme or performers.
    pub fn new(date: CalendarDate, time_of_day: TimeOfDay) -> Self {
        Self {
            date,
            time_of_day,
            theme: String::new(),
            performers: Performers::default(),
            confirmed: Confirmation::N,
        }
    }

    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = theme.into();
        self
    }

    pub fn with_performers(mut self, performers: Performers) -> Self {
        self.performers = performers;
        self
    }

    pub fn with_confirmed(mut self, confirmed: Confirmation) -> Self {
        self.confirmed = confirmed;
        self
    }

    pub fn key(&self) -> TimeSlotKey {
        TimeSlotKey::new(self.date, self.time_of_day)
    }

    /// Copies writer-owned fields from `other`, leaving the key and
    /// `confirmed` untouched.
    pub fn apply_fields(&mut self, other: &TimeSlotAssignment) {
        self.theme.clone_from(&other.theme);
        self.performers = other.performers.clone();
    }
}

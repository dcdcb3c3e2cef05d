//! Calendar value types.
//!
//! Dates and times travel as strings at the edges (`YYYY-MM-DD`, `HH:mm`)
//! and are normalized here once, so every store key is canonical.
//!
//! # Month Model
//! A `MonthSpan` is the closed range `[first_day, last_day]`. Its length
//! comes from the calendar alone; leap years need no special case.

use std::fmt;

use chrono::{Datelike, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::validation::{ValidationError, ValidationErrorKind};

/// A calendar day, always rendered as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    /// Parses `YYYY-MM-DD`, also accepting unpadded `YYYY-M-D`.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let malformed = || {
            ValidationError::new(
                "date",
                ValidationErrorKind::Malformed,
                format!("expected YYYY-MM-DD, got '{raw}'"),
            )
        };

        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::new(
                "date",
                ValidationErrorKind::Missing,
                "date is required",
            ));
        }

        let mut parts = trimmed.split('-');
        let (Some(y), Some(m), Some(d), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(malformed());
        };

        let year: i32 = y.parse().map_err(|_| malformed())?;
        let month: u32 = m.parse().map_err(|_| malformed())?;
        let day: u32 = d.parse().map_err(|_| malformed())?;

        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(malformed)
    }

    /// Builds a date from components, `None` if the day does not exist.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    pub fn naive(&self) -> NaiveDate {
        self.0
    }

    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    /// The month this date belongs to.
    pub fn month_span(&self) -> MonthSpan {
        MonthSpan {
            year: self.0.year(),
            month: self.0.month(),
        }
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl TryFrom<String> for CalendarDate {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CalendarDate> for String {
    fn from(value: CalendarDate) -> Self {
        value.to_string()
    }
}

/// A wall-clock time at minute granularity, rendered as `HH:mm`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
}

impl TimeOfDay {
    /// Creates a time, `None` outside `00:00..=23:59`.
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        (hour < 24 && minute < 60).then_some(Self { hour, minute })
    }

    /// Parses `HH:mm`, `H:mm`, `HH:mm:ss` or `HH:mm:ss.SSS`.
    ///
    /// Seconds and fractions are validated, then dropped.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let malformed = || {
            ValidationError::new(
                "time_of_day",
                ValidationErrorKind::Malformed,
                format!("expected HH:mm, got '{raw}'"),
            )
        };

        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::new(
                "time_of_day",
                ValidationErrorKind::Missing,
                "time of day is required",
            ));
        }

        let parts: Vec<&str> = trimmed.split(':').collect();
        if !(2..=3).contains(&parts.len()) {
            return Err(malformed());
        }

        if !is_digits(parts[0], 1..=2) || !is_digits(parts[1], 2..=2) {
            return Err(malformed());
        }
        let hour: u8 = parts[0].parse().map_err(|_| malformed())?;
        let minute: u8 = parts[1].parse().map_err(|_| malformed())?;

        if let Some(seconds) = parts.get(2) {
            let whole = seconds.split('.').next().unwrap_or_default();
            if !is_digits(whole, 2..=2) {
                return Err(malformed());
            }
            match whole.parse::<u8>() {
                Ok(s) if s < 60 => {}
                _ => return Err(malformed()),
            }
            if let Some(frac) = seconds.split('.').nth(1) {
                if frac.is_empty() || !frac.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(malformed());
                }
            }
        }

        Self::new(hour, minute).ok_or_else(malformed)
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }
}

/// Plain ASCII digits with a length in `len`; no sign, no padding beyond it.
fn is_digits(part: &str, len: std::ops::RangeInclusive<usize>) -> bool {
    len.contains(&part.len()) && part.bytes().all(|b| b.is_ascii_digit())
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

/// One calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthSpan {
    pub year: i32,
    pub month: u32,
}

impl MonthSpan {
    /// Creates a month span; `month` must be `1..=12`.
    pub fn new(year: i32, month: u32) -> Result<Self, ValidationError> {
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(ValidationError::new(
                "month",
                ValidationErrorKind::OutOfRange,
                format!("no such month {year}-{month}"),
            ));
        }
        Ok(Self { year, month })
    }

    pub fn first_day(&self) -> CalendarDate {
        CalendarDate(self.first_naive())
    }

    pub fn last_day(&self) -> CalendarDate {
        let next = self
            .first_naive()
            .checked_add_months(Months::new(1))
            .unwrap_or(NaiveDate::MAX);
        CalendarDate(next.pred_opt().unwrap_or(next))
    }

    /// Number of calendar days in the month (28..=31).
    pub fn days_in_month(&self) -> u32 {
        self.last_day().naive().day()
    }

    /// Every day of the month in ascending order.
    pub fn days(&self) -> impl Iterator<Item = CalendarDate> + '_ {
        self.first_naive()
            .iter_days()
            .take(self.days_in_month() as usize)
            .map(CalendarDate)
    }

    /// Whether a date falls within this month.
    #[inline]
    pub fn contains(&self, date: CalendarDate) -> bool {
        date >= self.first_day() && date <= self.last_day()
    }

    fn first_naive(&self) -> NaiveDate {
        // Checked in `new`; fields are public so fall back rather than panic.
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }
}

impl fmt::Display for MonthSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Weekday label set used by the monthly table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekdayLabels {
    /// Korean short labels (`월`..`일`).
    #[default]
    Ko,
    /// English short labels (`Mon`..`Sun`).
    En,
}

impl WeekdayLabels {
    pub fn label(&self, weekday: Weekday) -> &'static str {
        const KO: [&str; 7] = ["월", "화", "수", "목", "금", "토", "일"];
        const EN: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
        let idx = weekday.num_days_from_monday() as usize;
        match self {
            Self::Ko => KO[idx],
            Self::En => EN[idx],
        }
    }

    /// Parses `ko` / `en` (case-insensitive).
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "ko" => Some(Self::Ko),
            "en" => Some(Self::En),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_normalization() {
        let d = CalendarDate::parse("2025-9-6").unwrap();
        assert_eq!(d.to_string(), "2025-09-06");
        assert_eq!(CalendarDate::parse(" 2025-09-16 ").unwrap().to_string(), "2025-09-16");
    }

    #[test]
    fn test_date_rejects_garbage() {
        assert!(CalendarDate::parse("2025-02-30").is_err());
        assert!(CalendarDate::parse("2025/02/01").is_err());
        assert!(CalendarDate::parse("2025-02-01-07").is_err());
        let missing = CalendarDate::parse("  ").unwrap_err();
        assert_eq!(missing.kind, ValidationErrorKind::Missing);
    }

    #[test]
    fn test_time_strips_seconds() {
        assert_eq!(TimeOfDay::parse("16:00:00").unwrap().to_string(), "16:00");
        assert_eq!(TimeOfDay::parse("16:00:00.000").unwrap().to_string(), "16:00");
        assert_eq!(TimeOfDay::parse("9:30").unwrap().to_string(), "09:30");
    }

    #[test]
    fn test_time_rejects_out_of_range() {
        assert!(TimeOfDay::parse("24:00").is_err());
        assert!(TimeOfDay::parse("12:60").is_err());
        assert!(TimeOfDay::parse("12:5").is_err());
        assert!(TimeOfDay::parse("12:00:99").is_err());
        assert!(TimeOfDay::parse("noon").is_err());
    }

    #[test]
    fn test_time_rejects_signs_and_padding() {
        for raw in ["+9:30", "009:30", "12:+5", "-1:30", "12:30:+5", " 9 :30"] {
            let err = TimeOfDay::parse(raw).unwrap_err();
            assert_eq!(err.kind, ValidationErrorKind::Malformed, "{raw}");
        }
        assert_eq!(TimeOfDay::parse(" 9:30 ").unwrap().to_string(), "09:30");
    }

    #[test]
    fn test_time_ordering() {
        let early = TimeOfDay::parse("09:00").unwrap();
        let late = TimeOfDay::parse("16:30").unwrap();
        assert!(early < late);
    }

    #[test]
    fn test_month_lengths() {
        assert_eq!(MonthSpan::new(2025, 2).unwrap().days_in_month(), 28);
        assert_eq!(MonthSpan::new(2024, 2).unwrap().days_in_month(), 29);
        assert_eq!(MonthSpan::new(2025, 4).unwrap().days_in_month(), 30);
        assert_eq!(MonthSpan::new(2025, 12).unwrap().days_in_month(), 31);
        assert!(MonthSpan::new(2025, 13).is_err());
        assert!(MonthSpan::new(2025, 0).is_err());
    }

    #[test]
    fn test_month_days_ascending() {
        let span = MonthSpan::new(2025, 2).unwrap();
        let days: Vec<String> = span.days().map(|d| d.to_string()).collect();
        assert_eq!(days.len(), 28);
        assert_eq!(days.first().unwrap(), "2025-02-01");
        assert_eq!(days.last().unwrap(), "2025-02-28");
        assert!(span.contains(CalendarDate::parse("2025-02-14").unwrap()));
        assert!(!span.contains(CalendarDate::parse("2025-03-01").unwrap()));
    }

    #[test]
    fn test_weekday_labels() {
        // 2025-02-03 is a Monday.
        let d = CalendarDate::parse("2025-02-03").unwrap();
        assert_eq!(WeekdayLabels::Ko.label(d.weekday()), "월");
        assert_eq!(WeekdayLabels::En.label(d.weekday()), "Mon");
        assert_eq!(WeekdayLabels::parse("EN"), Some(WeekdayLabels::En));
    }

    #[test]
    fn test_serde_uses_canonical_strings() {
        let d = CalendarDate::parse("2025-3-1").unwrap();
        assert_eq!(serde_json::to_string(&d).unwrap(), "\"2025-03-01\"");
        let t: TimeOfDay = serde_json::from_str("\"16:00:00\"").unwrap();
        assert_eq!(t.to_string(), "16:00");
        assert!(serde_json::from_str::<CalendarDate>("\"bogus\"").is_err());
    }
}

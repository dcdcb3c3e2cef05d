//! Input validation for schedule writes.
//!
//! Raw presentation-layer values are checked field by field and every
//! problem is collected before failing, so a caller learns about all bad
//! fields at once. Detects:
//! - Missing required fields
//! - Malformed dates and times
//! - Unknown role / confirmation codes
//! - Hours outside `[0, 24]`
//! - Duplicate or blank roster names

use std::collections::HashSet;
use std::fmt;

use rust_decimal::Decimal;

use crate::error::ScheduleError;
use crate::models::{CalendarDate, Confirmation, RoleCode, TimeOfDay};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// Upper bound for a single day's hours.
pub const MAX_DAILY_HOURS: Decimal = Decimal::from_parts(24, 0, 0, false, 0);

/// A field-level validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Offending field name.
    pub field: String,
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// A required field is empty.
    Missing,
    /// The value does not parse.
    Malformed,
    /// The value parses but is outside the allowed range.
    OutOfRange,
    /// The value is not one of the known codes.
    InvalidCode,
    /// Two entries share the same identity.
    DuplicateId,
}

impl ValidationError {
    pub fn new(
        field: impl Into<String>,
        kind: ValidationErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            kind,
            message: message.into(),
        }
    }

    /// Re-labels the field, for values parsed under a caller's name.
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

impl From<Vec<ValidationError>> for ScheduleError {
    fn from(errors: Vec<ValidationError>) -> Self {
        ScheduleError::Validation(errors)
    }
}

impl From<ValidationError> for ScheduleError {
    fn from(error: ValidationError) -> Self {
        ScheduleError::validation(error)
    }
}

/// Collects field errors while parsing one request.
///
/// Each accessor returns `None` on failure and records why; call
/// [`FieldChecks::finish`] once all fields have been visited.
#[derive(Debug, Default)]
pub struct FieldChecks {
    errors: Vec<ValidationError>,
}

impl FieldChecks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn date(&mut self, field: &str, raw: &str) -> Option<CalendarDate> {
        self.record(CalendarDate::parse(raw), field)
    }

    pub fn time(&mut self, field: &str, raw: &str) -> Option<TimeOfDay> {
        self.record(TimeOfDay::parse(raw), field)
    }

    pub fn confirmation(&mut self, field: &str, raw: &str) -> Option<Confirmation> {
        self.record(Confirmation::parse(raw), field)
    }

    pub fn role(&mut self, field: &str, raw: &str) -> Option<Option<RoleCode>> {
        self.record(RoleCode::parse_optional(raw), field)
    }

    /// Non-blank text, trimmed.
    pub fn required(&mut self, field: &str, raw: &str) -> Option<String> {
        let value = raw.trim();
        if value.is_empty() {
            self.errors.push(ValidationError::new(
                field,
                ValidationErrorKind::Missing,
                format!("{field} is required"),
            ));
            return None;
        }
        Some(value.to_string())
    }

    pub fn hours(&mut self, field: &str, hours: Decimal) -> Option<Decimal> {
        if hours.is_sign_negative() && !hours.is_zero() {
            self.errors.push(ValidationError::new(
                field,
                ValidationErrorKind::OutOfRange,
                format!("{hours} is negative"),
            ));
            return None;
        }
        if hours > MAX_DAILY_HOURS {
            self.errors.push(ValidationError::new(
                field,
                ValidationErrorKind::OutOfRange,
                format!("{hours} exceeds {MAX_DAILY_HOURS}"),
            ));
            return None;
        }
        Some(hours)
    }

    /// Records an error found outside the typed accessors.
    pub fn reject(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// `Ok(())` if every field passed, otherwise all recorded errors.
    pub fn finish(self) -> ValidationResult {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }

    fn record<T>(&mut self, parsed: Result<T, ValidationError>, field: &str) -> Option<T> {
        match parsed {
            Ok(v) => Some(v),
            Err(e) => {
                self.errors.push(e.with_field(field));
                None
            }
        }
    }
}

/// Validates a roster of actor names.
///
/// Checks:
/// 1. No blank names
/// 2. No duplicate names
pub fn validate_roster(names: &[String]) -> ValidationResult {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for (idx, name) in names.iter().enumerate() {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            errors.push(ValidationError::new(
                format!("roster[{idx}]"),
                ValidationErrorKind::Missing,
                "actor name is blank",
            ));
            continue;
        }
        if !seen.insert(trimmed) {
            errors.push(ValidationError::new(
                format!("roster[{idx}]"),
                ValidationErrorKind::DuplicateId,
                format!("Duplicate actor name: {trimmed}"),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

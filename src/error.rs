//! Error taxonomy for schedule coordination.
//!
//! | Variant | Raised by | Retried? |
//! |---------|-----------|----------|
//! | `Validation` | input parsing, field checks | never |
//! | `NotFound` | update/delete on a missing key | never |
//! | `Conflict` | insert on an existing key | once, by `upsert` |
//! | `PartialConfirmation` | confirmation saga | once, by the coordinator |
//! | `Internal` | conflict recovery that lost its row, poisoned locks | never |

use thiserror::Error;

use crate::models::{CalendarDate, Confirmation};
use crate::validation::ValidationError;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ScheduleError>;

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("validation failed: {}", join_messages(.0))]
    Validation(Vec<ValidationError>),

    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("{entity} already exists: {key}")]
    Conflict { entity: &'static str, key: String },

    #[error(
        "partial confirmation on {date}: requested {requested}, time slots {}",
        compensation_label(.compensated)
    )]
    PartialConfirmation {
        date: CalendarDate,
        requested: Confirmation,
        compensated: bool,
    },

    #[error("forbidden: {0} requires an administrator")]
    Forbidden(&'static str),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ScheduleError {
    /// Wraps a single field error.
    pub fn validation(error: ValidationError) -> Self {
        Self::Validation(vec![error])
    }

    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    pub fn conflict(entity: &'static str, key: impl ToString) -> Self {
        Self::Conflict {
            entity,
            key: key.to_string(),
        }
    }

    /// Whether re-issuing the same call may succeed.
    ///
    /// Both retryable kinds come from idempotent operations.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict { .. } | Self::PartialConfirmation { .. })
    }
}

fn compensation_label(compensated: &bool) -> &'static str {
    if *compensated {
        "reverted"
    } else {
        "left updated"
    }
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

//! Global note board model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of the single note row.
pub const GLOBAL_NOTE_ID: &str = "GLOBAL";

/// The venue-wide notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalNote {
    pub id: String,
    pub content: String,
    pub updated_by: String,
    /// `None` until the note is first saved.
    pub updated_at: Option<DateTime<Utc>>,
}

impl GlobalNote {
    /// The note returned when nothing has been saved yet.
    pub fn empty() -> Self {
        Self {
            id: GLOBAL_NOTE_ID.to_string(),
            content: String::new(),
            updated_by: String::new(),
            updated_at: None,
        }
    }

    pub fn new(
        content: impl Into<String>,
        updated_by: impl Into<String>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: GLOBAL_NOTE_ID.to_string(),
            content: content.into(),
            updated_by: updated_by.into(),
            updated_at: Some(updated_at),
        }
    }
}

impl Default for GlobalNote {
    fn default() -> Self {
        Self::empty()
    }
}

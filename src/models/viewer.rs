//! Authenticated principal supplied by the identity provider.

use serde::{Deserialize, Serialize};

/// Who is asking. Authentication happens elsewhere; this is the result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewer {
    /// Matches `Submission::person_id`.
    pub person_id: String,
    /// Display name; matches performer names on time slots.
    pub username: String,
    pub is_admin: bool,
}

impl Viewer {
    /// A non-privileged contributor.
    pub fn member(person_id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            person_id: person_id.into(),
            username: username.into(),
            is_admin: false,
        }
    }

    pub fn admin(person_id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            person_id: person_id.into(),
            username: username.into(),
            is_admin: true,
        }
    }
}

//! Active actor roster.

use crate::error::Result;
use crate::validation::validate_roster;

/// Supplies the actors shown as table columns, in column order.
pub trait RosterProvider: Send + Sync {
    fn active_actors(&self) -> Result<Vec<String>>;
}

/// A fixed roster, sorted lexicographically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticRoster {
    actors: Vec<String>,
}

impl StaticRoster {
    /// Builds a roster, trimming names and rejecting blanks or duplicates.
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        validate_roster(&names)?;

        let mut actors: Vec<String> = names.iter().map(|n| n.trim().to_string()).collect();
        actors.sort();
        Ok(Self { actors })
    }

    pub fn actors(&self) -> &[String] {
        &self.actors
    }
}

impl RosterProvider for StaticRoster {
    fn active_actors(&self) -> Result<Vec<String>> {
        Ok(self.actors.clone())
    }
}

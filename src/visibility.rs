//! Read-side visibility policy.
//!
//! One pure function decides what a viewer may see:
//!
//! | Viewer | Confirmed day | Unconfirmed day |
//! |--------|---------------|-----------------|
//! | admin | everything | everything |
//! | member | everything | own rows only |
//!
//! For time slots "own" means the viewer is among the performers, and an
//! unconfirmed slot is redacted so co-performer names never leak before the
//! day is final.
//!
//! Every read path that serves a non-admin goes through [`filter`].

use crate::models::{Submission, TimeSlotAssignment, Viewer};

/// A record subject to the visibility policy.
pub trait Visible: Sized {
    fn is_confirmed(&self) -> bool;

    /// Whether `viewer` owns this record.
    fn belongs_to(&self, viewer: &Viewer) -> bool;

    /// Strips what `viewer` may not see of an unconfirmed owned record.
    fn redact_for(self, _viewer: &Viewer) -> Self {
        self
    }
}

impl Visible for Submission {
    fn is_confirmed(&self) -> bool {
        self.confirmed.is_confirmed()
    }

    fn belongs_to(&self, viewer: &Viewer) -> bool {
        self.person_id == viewer.person_id
    }
}

impl Visible for TimeSlotAssignment {
    fn is_confirmed(&self) -> bool {
        self.confirmed.is_confirmed()
    }

    fn belongs_to(&self, viewer: &Viewer) -> bool {
        self.performers.contains(&viewer.username)
    }

    fn redact_for(mut self, viewer: &Viewer) -> Self {
        self.performers = self.performers.only(&viewer.username);
        self
    }
}

/// Returns the records `viewer` may see.
///
/// Admins get `records` unchanged. Members keep confirmed records and their
/// own unconfirmed ones, the latter passed through [`Visible::redact_for`].
pub fn filter<R: Visible>(records: Vec<R>, viewer: &Viewer) -> Vec<R> {
    if viewer.is_admin {
        return records;
    }
    records
        .into_iter()
        .filter_map(|r| {
            if r.is_confirmed() {
                Some(r)
            } else if r.belongs_to(viewer) {
                Some(r.redact_for(viewer))
            } else {
                None
            }
        })
        .collect()
}

//! Day-level confirmation across the submission and time-slot stores.
//!
//! # Saga
//!
//! The two stores may live apart, so a confirmation change runs as a
//! two-step saga:
//!
//! 1. Snapshot the day's current time-slot state.
//! 2. Bulk-set `confirmed` on every time slot of the date.
//! 3. Bulk-set `confirmed` on every submission of the date, retrying once.
//! 4. If step 3 still fails, set the time slots back to the snapshot and
//!    report [`ScheduleError::PartialConfirmation`].
//!
//! Both bulk updates no-op on zero rows, so a date with records on only one
//! side (or none) is not an error. Re-issuing the same call after a partial
//! failure converges both stores.
//!
//! # Ordering
//!
//! Calls for the same date are serialized by a per-date mutex. Calls for
//! different dates run in parallel. Row creation takes the same mutex via
//! [`ConfirmationCoordinator::with_day`], so a new row never misses a
//! confirmation change made while it was being written. A date's mutex is
//! dropped from the map once no caller holds it.

use std::sync::{Arc, Mutex};

use dashmap::DashMap;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{Result, ScheduleError};
use crate::models::{CalendarDate, Confirmation};
use crate::store::{KeyedStore, SubmissionStore, TimeSlotStore};

/// Rows touched by a successful confirmation change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConfirmationReport {
    pub date: CalendarDate,
    pub confirmed: Confirmation,
    pub time_slots: usize,
    pub submissions: usize,
}

/// Flips the day-wide confirmation flag on both stores.
pub struct ConfirmationCoordinator {
    submissions: Arc<dyn SubmissionStore>,
    time_slots: Arc<dyn TimeSlotStore>,
    day_locks: DashMap<CalendarDate, Arc<Mutex<()>>>,
}

impl ConfirmationCoordinator {
    pub fn new(submissions: Arc<dyn SubmissionStore>, time_slots: Arc<dyn TimeSlotStore>) -> Self {
        Self {
            submissions,
            time_slots,
            day_locks: DashMap::new(),
        }
    }

    /// Sets the confirmation of every submission and time slot on `date`.
    ///
    /// Idempotent. A first-step failure is returned as the store reported it;
    /// nothing was changed in that case.
    pub fn set_confirmation(
        &self,
        date: CalendarDate,
        confirmed: Confirmation,
    ) -> Result<ConfirmationReport> {
        self.locked(date, || self.apply_confirmation(date, confirmed))
    }

    /// Runs `write` with the day's current confirmation, holding the day's
    /// lock so no confirmation change lands between the read and the write.
    ///
    /// Every path that creates rows goes through here, so new rows always
    /// carry the flag the rest of the day has.
    pub fn with_day<T, F>(&self, date: CalendarDate, write: F) -> Result<T>
    where
        F: FnOnce(Confirmation) -> Result<T>,
    {
        self.locked(date, || write(self.day_confirmation(date)?))
    }

    /// Holds `date`'s mutex around `f`, dropping the map entry once idle.
    fn locked<T>(&self, date: CalendarDate, f: impl FnOnce() -> Result<T>) -> Result<T> {
        let lock = self.day_locks.entry(date).or_default().clone();
        let result = match lock.lock() {
            Ok(_guard) => f(),
            Err(e) => Err(ScheduleError::Internal(format!(
                "confirmation lock for {date} poisoned: {e}"
            ))),
        };
        // Two holders left means the map and us: nobody else is waiting.
        self.day_locks
            .remove_if(&date, |_, held| Arc::strong_count(held) == 2);
        result
    }

    fn apply_confirmation(
        &self,
        date: CalendarDate,
        confirmed: Confirmation,
    ) -> Result<ConfirmationReport> {
        let prior_slots = self
            .time_slots
            .find_by_date(date)?
            .iter()
            .map(|s| s.confirmed)
            .fold(None, |day, c| Some(merge_day_state(day, c)));

        let time_slots = self.time_slots.set_confirmation(date, confirmed)?;
        debug!(%date, %confirmed, rows = time_slots, "time slots updated");

        let submissions = match self.submissions.set_confirmation(date, confirmed) {
            Ok(rows) => rows,
            Err(first) => {
                warn!(%date, %confirmed, error = %first, "submission step failed, retrying");
                match self.submissions.set_confirmation(date, confirmed) {
                    Ok(rows) => rows,
                    Err(second) => {
                        warn!(%date, %confirmed, error = %second, "submission step failed twice, compensating");
                        let compensated = self.compensate(date, confirmed, prior_slots);
                        return Err(ScheduleError::PartialConfirmation {
                            date,
                            requested: confirmed,
                            compensated,
                        });
                    }
                }
            }
        };

        info!(%date, %confirmed, time_slots, submissions, "day confirmation set");
        Ok(ConfirmationReport {
            date,
            confirmed,
            time_slots,
            submissions,
        })
    }

    /// Puts the time slots back to their pre-saga state.
    fn compensate(
        &self,
        date: CalendarDate,
        requested: Confirmation,
        prior: Option<Confirmation>,
    ) -> bool {
        // No slots before, or already in the requested state: nothing moved.
        let Some(prior) = prior.filter(|p| *p != requested) else {
            return true;
        };
        match self.time_slots.set_confirmation(date, prior) {
            Ok(rows) => {
                info!(%date, restored = %prior, rows, "time slots reverted");
                true
            }
            Err(e) => {
                warn!(%date, error = %e, "time slot compensation failed");
                false
            }
        }
    }

    /// The day's confirmation: `Y` if any submission or time slot on `date`
    /// is confirmed.
    pub fn day_confirmation(&self, date: CalendarDate) -> Result<Confirmation> {
        let slot_confirmed = self
            .time_slots
            .find_by_date(date)?
            .iter()
            .any(|s| s.confirmed.is_confirmed());
        if slot_confirmed {
            return Ok(Confirmation::Y);
        }
        let submission_confirmed = self
            .submissions
            .find_by_date(date)?
            .iter()
            .any(|s| s.confirmed.is_confirmed());
        Ok(if submission_confirmed {
            Confirmation::Y
        } else {
            Confirmation::N
        })
    }
}

fn merge_day_state(day: Option<Confirmation>, row: Confirmation) -> Confirmation {
    match (day, row) {
        (Some(Confirmation::Y), _) | (_, Confirmation::Y) => Confirmation::Y,
        _ => Confirmation::N,
    }
}

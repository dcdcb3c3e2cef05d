//! Persistence ports for schedule records.
//!
//! Each keyed store is a narrow port with no business logic: point reads,
//! insert/update primitives, a conditional upsert, delete, and date-range
//! scans. Two backends are provided:
//!
//! - [`memory`]: `RwLock<BTreeMap>` tables, for tests and embedding.
//! - [`sqlite`]: one SQLite connection shared by all stores, with native
//!   `INSERT .. ON CONFLICT DO UPDATE` upserts.
//!
//! # Upsert contract
//! `upsert` never deletes. A duplicate-key failure on insert means another
//! writer created the row first; the row is re-read and updated once. If the
//! re-read finds nothing the call fails with `Internal` instead of looping.
//!
//! # Confirmation
//! `confirmed` is written on insert only. Updates never touch it; the
//! bulk `set_confirmation` is the one writer after insert.

pub mod memory;
pub mod sqlite;

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{Result, ScheduleError};
use crate::models::{
    CalendarDate, Confirmation, GlobalNote, HourKey, HourRecord, RoleCode, Submission,
    SubmissionKey, TimeSlotAssignment, TimeSlotKey,
};

/// A record addressable by a composite key and bucketed by date.
pub trait StoredRecord: Clone + Send + Sync + 'static {
    type Key: Clone + Ord + fmt::Display + Send + Sync + 'static;

    /// Entity name used in error messages.
    const ENTITY: &'static str;

    fn key(&self) -> Self::Key;

    fn date(&self) -> CalendarDate;

    /// Copies the fields an ordinary writer may change onto `self`.
    fn merge_from(&mut self, incoming: &Self);
}

impl StoredRecord for Submission {
    type Key = SubmissionKey;
    const ENTITY: &'static str = "submission";

    fn key(&self) -> SubmissionKey {
        Submission::key(self)
    }

    fn date(&self) -> CalendarDate {
        self.date
    }

    fn merge_from(&mut self, incoming: &Self) {
        self.apply_fields(incoming);
    }
}

impl StoredRecord for TimeSlotAssignment {
    type Key = TimeSlotKey;
    const ENTITY: &'static str = "time slot";

    fn key(&self) -> TimeSlotKey {
        TimeSlotAssignment::key(self)
    }

    fn date(&self) -> CalendarDate {
        self.date
    }

    fn merge_from(&mut self, incoming: &Self) {
        self.apply_fields(incoming);
    }
}

impl StoredRecord for HourRecord {
    type Key = HourKey;
    const ENTITY: &'static str = "hour record";

    fn key(&self) -> HourKey {
        HourRecord::key(self)
    }

    fn date(&self) -> CalendarDate {
        self.date
    }

    fn merge_from(&mut self, incoming: &Self) {
        self.apply_fields(incoming);
    }
}

/// Key type of a store's records.
pub type KeyOf<S> = <<S as KeyedStore>::Record as StoredRecord>::Key;

/// Keyed persistence primitives shared by every record store.
pub trait KeyedStore: Send + Sync {
    type Record: StoredRecord;

    fn find(&self, key: &KeyOf<Self>) -> Result<Option<Self::Record>>;

    /// Inserts a new row. Fails with `Conflict` if the key exists.
    fn insert(&self, record: &Self::Record) -> Result<Self::Record>;

    /// Updates writer-owned fields. Fails with `NotFound` if the key is absent.
    fn update(&self, record: &Self::Record) -> Result<Self::Record>;

    /// Insert-or-update; idempotent for identical input.
    fn upsert(&self, record: &Self::Record) -> Result<Self::Record> {
        upsert_by_parts(self, record)
    }

    /// Removes a row, returning whether it existed.
    fn delete_by_key(&self, key: &KeyOf<Self>) -> Result<bool>;

    /// Rows with `start <= date <= end`, ordered by key.
    fn find_by_date_range(
        &self,
        start: CalendarDate,
        end: CalendarDate,
    ) -> Result<Vec<Self::Record>>;

    fn find_by_date(&self, date: CalendarDate) -> Result<Vec<Self::Record>> {
        self.find_by_date_range(date, date)
    }
}

/// Availability submissions keyed by (date, person id).
pub trait SubmissionStore: KeyedStore<Record = Submission> {
    /// Sets `confirmed` on every row of `date`; returns rows touched.
    fn set_confirmation(&self, date: CalendarDate, confirmed: Confirmation) -> Result<usize>;

    /// Admin edit of role and remarks. `NotFound` if the row is absent.
    fn update_role_and_remarks(
        &self,
        key: &SubmissionKey,
        role: Option<RoleCode>,
        remarks: &str,
    ) -> Result<Submission>;
}

/// Time-slot assignments keyed by (date, time of day).
pub trait TimeSlotStore: KeyedStore<Record = TimeSlotAssignment> {
    /// Sets `confirmed` on every row of `date`; returns rows touched.
    fn set_confirmation(&self, date: CalendarDate, confirmed: Confirmation) -> Result<usize>;

    /// Replaces all of a day's slots as one atomic unit.
    fn replace_date(
        &self,
        date: CalendarDate,
        slots: &[TimeSlotAssignment],
    ) -> Result<Vec<TimeSlotAssignment>>;
}

/// Worked-hours rows keyed by (date, person name).
pub trait HoursLedger: KeyedStore<Record = HourRecord> {
    /// Sets the shared remark on every row of `date`; returns rows touched.
    fn update_remarks_by_date(&self, date: CalendarDate, remarks: &str) -> Result<usize>;
}

/// The single venue-wide note.
pub trait NoteBoard: Send + Sync {
    /// The stored note, or [`GlobalNote::empty`] if none was saved.
    fn get(&self) -> Result<GlobalNote>;

    fn save(&self, content: &str, updated_by: &str) -> Result<GlobalNote>;
}

/// Insert-or-update built from `find`, `insert` and `update`.
///
/// Used by backends without a native conditional upsert.
pub fn upsert_by_parts<S>(store: &S, record: &S::Record) -> Result<S::Record>
where
    S: KeyedStore + ?Sized,
{
    let key = record.key();
    let entity = <S::Record as StoredRecord>::ENTITY;

    if store.find(&key)?.is_some() {
        match store.update(record) {
            Err(ScheduleError::NotFound { .. }) => {
                debug!(%key, entity, "row vanished before update, inserting");
            }
            other => return other,
        }
    }

    match store.insert(record) {
        Err(ScheduleError::Conflict { .. }) => {
            warn!(%key, entity, "duplicate key on insert, updating existing row");
            match store.find(&key)? {
                Some(_) => store.update(record).map_err(|e| match e {
                    ScheduleError::NotFound { .. } => ScheduleError::Internal(format!(
                        "{entity} {key} vanished during conflict recovery"
                    )),
                    other => other,
                }),
                None => Err(ScheduleError::Internal(format!(
                    "{entity} {key} reported as duplicate but could not be re-read"
                ))),
            }
        }
        other => other,
    }
}

/// The four stores a schedule service works against.
#[derive(Clone)]
pub struct Stores {
    pub submissions: Arc<dyn SubmissionStore>,
    pub time_slots: Arc<dyn TimeSlotStore>,
    pub hours: Arc<dyn HoursLedger>,
    pub notes: Arc<dyn NoteBoard>,
}

impl Stores {
    /// Fresh in-memory stores.
    pub fn in_memory() -> Self {
        Self {
            submissions: Arc::new(memory::MemoryTable::<Submission>::new()),
            time_slots: Arc::new(memory::MemoryTable::<TimeSlotAssignment>::new()),
            hours: Arc::new(memory::MemoryTable::<HourRecord>::new()),
            notes: Arc::new(memory::MemoryNoteBoard::new()),
        }
    }

    /// Stores backed by one shared SQLite database.
    pub fn sqlite(db: Arc<sqlite::SqliteDb>) -> Self {
        Self {
            submissions: Arc::new(sqlite::SqliteSubmissions::new(db.clone())),
            time_slots: Arc::new(sqlite::SqliteTimeSlots::new(db.clone())),
            hours: Arc::new(sqlite::SqliteHours::new(db.clone())),
            notes: Arc::new(sqlite::SqliteNotes::new(db)),
        }
    }
}

impl fmt::Debug for Stores {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stores").finish_non_exhaustive()
    }
}

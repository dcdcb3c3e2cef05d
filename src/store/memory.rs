//! In-memory store backend.
//!
//! One `RwLock<BTreeMap>` per table. Keys sort by date first, so scans come
//! back in date order without an extra sort.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use tracing::debug;

use super::{
    HoursLedger, KeyOf, KeyedStore, NoteBoard, StoredRecord, SubmissionStore, TimeSlotStore,
};
use crate::error::{Result, ScheduleError};
use crate::models::{
    CalendarDate, Confirmation, GlobalNote, HourRecord, RoleCode, Submission, SubmissionKey,
    TimeSlotAssignment,
};
use crate::validation::{ValidationError, ValidationErrorKind};

/// A keyed table held in memory.
pub struct MemoryTable<R: StoredRecord> {
    rows: RwLock<BTreeMap<R::Key, R>>,
}

impl<R: StoredRecord> Default for MemoryTable<R> {
    fn default() -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
        }
    }
}

impl<R: StoredRecord> MemoryTable<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored rows.
    pub fn len(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.read()?.is_empty())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, BTreeMap<R::Key, R>>> {
        self.rows
            .read()
            .map_err(|e| ScheduleError::Internal(format!("{} table lock poisoned: {e}", R::ENTITY)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, BTreeMap<R::Key, R>>> {
        self.rows
            .write()
            .map_err(|e| ScheduleError::Internal(format!("{} table lock poisoned: {e}", R::ENTITY)))
    }
}

/// Applies `apply` to every row on `date`, returning how many it touched.
fn for_each_on_date<R, F>(table: &MemoryTable<R>, date: CalendarDate, mut apply: F) -> Result<usize>
where
    R: StoredRecord,
    F: FnMut(&mut R),
{
    let mut rows = table.write()?;
    let mut touched = 0;
    for row in rows.values_mut().filter(|r| r.date() == date) {
        apply(row);
        touched += 1;
    }
    Ok(touched)
}

impl<R: StoredRecord> KeyedStore for MemoryTable<R> {
    type Record = R;

    fn find(&self, key: &KeyOf<Self>) -> Result<Option<R>> {
        Ok(self.read()?.get(key).cloned())
    }

    fn insert(&self, record: &R) -> Result<R> {
        let key = record.key();
        let mut rows = self.write()?;
        if rows.contains_key(&key) {
            return Err(ScheduleError::conflict(R::ENTITY, key));
        }
        rows.insert(key, record.clone());
        Ok(record.clone())
    }

    fn update(&self, record: &R) -> Result<R> {
        let key = record.key();
        let mut rows = self.write()?;
        let Some(existing) = rows.get_mut(&key) else {
            return Err(ScheduleError::not_found(R::ENTITY, key));
        };
        existing.merge_from(record);
        Ok(existing.clone())
    }

    fn delete_by_key(&self, key: &KeyOf<Self>) -> Result<bool> {
        let found = self.write()?.remove(key).is_some();
        debug!(%key, found, entity = R::ENTITY, "delete");
        Ok(found)
    }

    fn find_by_date_range(&self, start: CalendarDate, end: CalendarDate) -> Result<Vec<R>> {
        Ok(self
            .read()?
            .values()
            .filter(|r| r.date() >= start && r.date() <= end)
            .cloned()
            .collect())
    }
}

impl SubmissionStore for MemoryTable<Submission> {
    fn set_confirmation(&self, date: CalendarDate, confirmed: Confirmation) -> Result<usize> {
        for_each_on_date(self, date, |s| s.confirmed = confirmed)
    }

    fn update_role_and_remarks(
        &self,
        key: &SubmissionKey,
        role: Option<RoleCode>,
        remarks: &str,
    ) -> Result<Submission> {
        let mut rows = self.write()?;
        let Some(existing) = rows.get_mut(key) else {
            return Err(ScheduleError::not_found(Submission::ENTITY, key));
        };
        existing.role = role;
        existing.remarks = remarks.to_string();
        Ok(existing.clone())
    }
}

impl TimeSlotStore for MemoryTable<TimeSlotAssignment> {
    fn set_confirmation(&self, date: CalendarDate, confirmed: Confirmation) -> Result<usize> {
        for_each_on_date(self, date, |s| s.confirmed = confirmed)
    }

    fn replace_date(
        &self,
        date: CalendarDate,
        slots: &[TimeSlotAssignment],
    ) -> Result<Vec<TimeSlotAssignment>> {
        ensure_same_date(date, slots)?;

        let mut rows = self.write()?;
        rows.retain(|_, s| s.date != date);
        for slot in slots {
            rows.insert(slot.key(), slot.clone());
        }
        Ok(rows.values().filter(|s| s.date == date).cloned().collect())
    }
}

impl HoursLedger for MemoryTable<HourRecord> {
    fn update_remarks_by_date(&self, date: CalendarDate, remarks: &str) -> Result<usize> {
        for_each_on_date(self, date, |h| h.remarks = remarks.to_string())
    }
}

/// Rejects a replacement batch that strays from its date.
pub(crate) fn ensure_same_date(date: CalendarDate, slots: &[TimeSlotAssignment]) -> Result<()> {
    let errors: Vec<ValidationError> = slots
        .iter()
        .enumerate()
        .filter(|(_, s)| s.date != date)
        .map(|(idx, s)| {
            ValidationError::new(
                format!("slots[{idx}].date"),
                ValidationErrorKind::OutOfRange,
                format!("slot dated {} in a batch for {date}", s.date),
            )
        })
        .collect();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ScheduleError::Validation(errors))
    }
}

/// In-memory note board.
#[derive(Debug, Default)]
pub struct MemoryNoteBoard {
    note: RwLock<Option<GlobalNote>>,
}

impl MemoryNoteBoard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NoteBoard for MemoryNoteBoard {
    fn get(&self) -> Result<GlobalNote> {
        let note = self
            .note
            .read()
            .map_err(|e| ScheduleError::Internal(format!("note lock poisoned: {e}")))?;
        Ok(note.clone().unwrap_or_default())
    }

    fn save(&self, content: &str, updated_by: &str) -> Result<GlobalNote> {
        let saved = GlobalNote::new(content, updated_by, Utc::now());
        let mut note = self
            .note
            .write()
            .map_err(|e| ScheduleError::Internal(format!("note lock poisoned: {e}")))?;
        *note = Some(saved.clone());
        Ok(saved)
    }
}

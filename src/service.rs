//! Schedule service façade.
//!
//! Entry point for a presentation layer (HTTP handler, CLI). Takes raw
//! string input, validates it, applies authorization, and delegates to the
//! stores, the [`ConfirmationCoordinator`], the visibility [`filter`] and
//! the [`TableBuilder`].
//!
//! # Authorization
//!
//! | Operation | Who |
//! |-----------|-----|
//! | `set_confirmation`, `add_person_to_date`, `update_submission_role`, `save_note` | admin |
//! | `submit_availability`, `delete_submission` | admin, or the member for their own row |
//! | everything else | anyone |
//!
//! Reads of submissions and time slots always pass through the visibility
//! filter.
//!
//! # Day confirmation
//!
//! A row created on an already confirmed day is inserted as confirmed, so
//! every row of a date carries the same flag.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::Config;
use crate::coordination::{ConfirmationCoordinator, ConfirmationReport};
use crate::error::{Result, ScheduleError};
use crate::models::{
    CalendarDate, Confirmation, GlobalNote, HourKey, HourRecord, MonthSpan, Performers,
    Submission, SubmissionKey, TimeSlotAssignment, TimeSlotKey, Viewer, WeekdayLabels,
};
use crate::roster::RosterProvider;
use crate::store::sqlite::SqliteDb;
use crate::store::{
    HoursLedger, KeyedStore, NoteBoard, StoredRecord, Stores, SubmissionStore, TimeSlotStore,
};
use crate::table::{ScheduleTable, TableBuilder};
use crate::validation::{FieldChecks, ValidationError, ValidationErrorKind};
use crate::visibility::filter;

/// One entry of a day's time-slot batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotInput {
    pub time_of_day: String,
    #[serde(default)]
    pub theme: String,
    /// Comma-joined performer names.
    #[serde(default)]
    pub performers: String,
}

impl SlotInput {
    pub fn new(
        time_of_day: impl Into<String>,
        theme: impl Into<String>,
        performers: impl Into<String>,
    ) -> Self {
        Self {
            time_of_day: time_of_day.into(),
            theme: theme.into(),
            performers: performers.into(),
        }
    }
}

/// Coordinates submissions, time slots, hours and the note board.
pub struct ScheduleService {
    stores: Stores,
    coordinator: ConfirmationCoordinator,
    tables: TableBuilder,
}

impl ScheduleService {
    pub fn new(stores: Stores, roster: Arc<dyn RosterProvider>) -> Self {
        let coordinator =
            ConfirmationCoordinator::new(stores.submissions.clone(), stores.time_slots.clone());
        let tables = TableBuilder::new(stores.hours.clone(), roster);
        Self {
            stores,
            coordinator,
            tables,
        }
    }

    pub fn with_labels(mut self, labels: WeekdayLabels) -> Self {
        self.tables = self.tables.with_labels(labels);
        self
    }

    /// SQLite-backed service for a loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let db = Arc::new(SqliteDb::open(&config.database_path)?);
        let roster = Arc::new(config.roster()?);
        Ok(Self::new(Stores::sqlite(db), roster).with_labels(config.weekday_labels))
    }

    pub fn stores(&self) -> &Stores {
        &self.stores
    }

    // ---- submissions ----

    /// Records `person_id`'s availability for `date`.
    ///
    /// Resubmitting overwrites role and open-hope; remarks are kept.
    pub fn submit_availability(
        &self,
        viewer: &Viewer,
        date: &str,
        person_id: &str,
        person_name: &str,
        role: &str,
        open_hope: bool,
    ) -> Result<Submission> {
        let mut checks = FieldChecks::new();
        let date = checks.date("date", date);
        let person_id = checks.required("person_id", person_id);
        let person_name = checks.required("person_name", person_name);
        let role = checks.role("role", role);
        checks.finish()?;
        let (date, person_id, person_name, role) = (
            present(date)?,
            present(person_id)?,
            present(person_name)?,
            present(role)?,
        );

        if !viewer.is_admin && viewer.person_id != person_id {
            return Err(ScheduleError::Forbidden("submitting for another person"));
        }

        let key = SubmissionKey::new(date, person_id.clone());
        let saved = self.coordinator.with_day(date, |day| {
            let remarks = self
                .stores
                .submissions
                .find(&key)?
                .map(|s| s.remarks)
                .unwrap_or_default();
            let record = Submission::new(date, person_id, person_name)
                .with_role(role)
                .with_open_hope(open_hope)
                .with_remarks(remarks)
                .with_confirmed(day);
            self.stores.submissions.upsert(&record)
        })?;
        debug!(key = %saved.key(), open_hope, "availability submitted");
        Ok(saved)
    }

    /// Admin: puts a person on a date without an open-hope request.
    pub fn add_person_to_date(
        &self,
        viewer: &Viewer,
        date: &str,
        person_id: &str,
        person_name: &str,
    ) -> Result<Submission> {
        require_admin(viewer, "adding a person to a date")?;

        let mut checks = FieldChecks::new();
        let date = checks.date("date", date);
        let person_id = checks.required("person_id", person_id);
        let person_name = checks.required("person_name", person_name);
        checks.finish()?;
        let (date, person_id, person_name) =
            (present(date)?, present(person_id)?, present(person_name)?);

        let key = SubmissionKey::new(date, person_id.clone());
        let saved = self.coordinator.with_day(date, |day| {
            let record = match self.stores.submissions.find(&key)? {
                Some(existing) => Submission {
                    person_name,
                    open_hope: false,
                    ..existing
                },
                None => Submission::new(date, person_id, person_name).with_confirmed(day),
            };
            self.stores.submissions.upsert(&record)
        })?;
        info!(key = %saved.key(), by = %viewer.username, "person added to date");
        Ok(saved)
    }

    /// Admin: sets role and remarks on an existing submission.
    pub fn update_submission_role(
        &self,
        viewer: &Viewer,
        date: &str,
        person_id: &str,
        role: &str,
        remarks: &str,
    ) -> Result<Submission> {
        require_admin(viewer, "changing a role")?;

        let mut checks = FieldChecks::new();
        let date = checks.date("date", date);
        let person_id = checks.required("person_id", person_id);
        let role = checks.role("role", role);
        checks.finish()?;
        let key = SubmissionKey::new(present(date)?, present(person_id)?);

        let saved = self
            .stores
            .submissions
            .update_role_and_remarks(&key, present(role)?, remarks.trim())?;
        debug!(%key, role = ?saved.role, "role updated");
        Ok(saved)
    }

    /// Deletes a submission, returning whether it existed.
    pub fn delete_submission(&self, viewer: &Viewer, date: &str, person_id: &str) -> Result<bool> {
        let mut checks = FieldChecks::new();
        let date = checks.date("date", date);
        let person_id = checks.required("person_id", person_id);
        checks.finish()?;
        let key = SubmissionKey::new(present(date)?, present(person_id)?);

        if !viewer.is_admin && viewer.person_id != key.person_id {
            return Err(ScheduleError::Forbidden("deleting another person's submission"));
        }
        self.stores.submissions.delete_by_key(&key)
    }

    /// The month's submissions as `viewer` may see them.
    pub fn get_visible_submissions(
        &self,
        year: i32,
        month: u32,
        viewer: &Viewer,
    ) -> Result<Vec<Submission>> {
        let span = MonthSpan::new(year, month)?;
        let rows = self
            .stores
            .submissions
            .find_by_date_range(span.first_day(), span.last_day())?;
        Ok(filter(rows, viewer))
    }

    // ---- time slots ----

    /// Assigns a theme and performers to one slot of `date`.
    pub fn assign_time_slot(
        &self,
        date: &str,
        time_of_day: &str,
        theme: &str,
        performers: &str,
    ) -> Result<TimeSlotAssignment> {
        let mut checks = FieldChecks::new();
        let date = checks.date("date", date);
        let time_of_day = checks.time("time_of_day", time_of_day);
        checks.finish()?;
        let (date, time_of_day) = (present(date)?, present(time_of_day)?);

        let saved = self.coordinator.with_day(date, |day| {
            let record = TimeSlotAssignment::new(date, time_of_day)
                .with_theme(theme.trim())
                .with_performers(Performers::parse(performers))
                .with_confirmed(day);
            self.stores.time_slots.upsert(&record)
        })?;
        debug!(key = %saved.key(), performers = saved.performers.len(), "time slot assigned");
        Ok(saved)
    }

    /// Replaces every slot of `date` with `slots` in one step.
    pub fn replace_time_slots(
        &self,
        date: &str,
        slots: &[SlotInput],
    ) -> Result<Vec<TimeSlotAssignment>> {
        let mut checks = FieldChecks::new();
        let date = checks.date("date", date);
        let times: Vec<_> = slots
            .iter()
            .enumerate()
            .map(|(idx, s)| checks.time(&format!("slots[{idx}].time_of_day"), &s.time_of_day))
            .collect();
        for (idx, time) in times.iter().enumerate() {
            if time.is_some() && times[..idx].contains(time) {
                checks.reject(ValidationError::new(
                    format!("slots[{idx}].time_of_day"),
                    ValidationErrorKind::DuplicateId,
                    format!("duplicate time slot {}", slots[idx].time_of_day.trim()),
                ));
            }
        }
        checks.finish()?;
        let date = present(date)?;

        let saved = self.coordinator.with_day(date, |day| {
            let records = slots
                .iter()
                .zip(times)
                .map(|(input, time)| {
                    Ok(TimeSlotAssignment::new(date, present(time)?)
                        .with_theme(input.theme.trim())
                        .with_performers(Performers::parse(&input.performers))
                        .with_confirmed(day))
                })
                .collect::<Result<Vec<_>>>()?;
            self.stores.time_slots.replace_date(date, &records)
        })?;
        info!(%date, slots = saved.len(), "time slots replaced");
        Ok(saved)
    }

    /// Deletes one slot, returning whether it existed.
    pub fn delete_time_slot(&self, date: &str, time_of_day: &str) -> Result<bool> {
        let mut checks = FieldChecks::new();
        let date = checks.date("date", date);
        let time_of_day = checks.time("time_of_day", time_of_day);
        checks.finish()?;
        let key = TimeSlotKey::new(present(date)?, present(time_of_day)?);
        self.stores.time_slots.delete_by_key(&key)
    }

    /// The date's time slots as `viewer` may see them.
    pub fn get_visible_time_slots(
        &self,
        date: &str,
        viewer: &Viewer,
    ) -> Result<Vec<TimeSlotAssignment>> {
        let date = CalendarDate::parse(date)?;
        let rows = self.stores.time_slots.find_by_date(date)?;
        Ok(filter(rows, viewer))
    }

    // ---- confirmation ----

    /// Admin: confirms (`"Y"`) or reopens (`"N"`) a day.
    pub fn set_confirmation(
        &self,
        viewer: &Viewer,
        date: &str,
        confirmed: &str,
    ) -> Result<ConfirmationReport> {
        let mut checks = FieldChecks::new();
        let date = checks.date("date", date);
        let confirmed = checks.confirmation("confirmed", confirmed);
        checks.finish()?;
        require_admin(viewer, "changing day confirmation")?;

        self.coordinator
            .set_confirmation(present(date)?, present(confirmed)?)
    }

    pub fn day_confirmation(&self, date: &str) -> Result<Confirmation> {
        self.coordinator
            .day_confirmation(CalendarDate::parse(date)?)
    }

    // ---- hours ----

    /// Records hours worked; a second call for the same person and date
    /// overwrites the first.
    pub fn log_hours(
        &self,
        date: &str,
        person_name: &str,
        hours: Decimal,
        remarks: &str,
    ) -> Result<HourRecord> {
        let mut checks = FieldChecks::new();
        let date = checks.date("date", date);
        let person_name = checks.required("person_name", person_name);
        let hours = checks.hours("hours", hours);
        checks.finish()?;

        let record = HourRecord::new(present(date)?, present(person_name)?, present(hours)?)
            .with_remarks(remarks.trim());
        let saved = self.stores.hours.upsert(&record)?;
        debug!(key = %saved.key(), hours = %saved.hours, "hours logged");
        Ok(saved)
    }

    /// Deletes an hour record; `NotFound` if there was none.
    pub fn delete_hours(&self, date: &str, person_name: &str) -> Result<()> {
        let mut checks = FieldChecks::new();
        let date = checks.date("date", date);
        let person_name = checks.required("person_name", person_name);
        checks.finish()?;
        let key = HourKey::new(present(date)?, present(person_name)?);

        if self.stores.hours.delete_by_key(&key)? {
            Ok(())
        } else {
            Err(ScheduleError::not_found(HourRecord::ENTITY, key))
        }
    }

    /// Sets the shared remark on every hour record of `date`.
    pub fn update_daily_remarks(&self, date: &str, remarks: &str) -> Result<usize> {
        let date = CalendarDate::parse(date)?;
        let rows = self
            .stores
            .hours
            .update_remarks_by_date(date, remarks.trim())?;
        debug!(%date, rows, "daily remarks updated");
        Ok(rows)
    }

    pub fn get_monthly_table(&self, year: i32, month: u32) -> Result<ScheduleTable> {
        self.tables.build_table(year, month)
    }

    // ---- note ----

    /// Admin: replaces the venue-wide note.
    pub fn save_note(&self, viewer: &Viewer, content: &str) -> Result<GlobalNote> {
        require_admin(viewer, "editing the note")?;
        let saved = self.stores.notes.save(content, &viewer.username)?;
        info!(by = %viewer.username, "note saved");
        Ok(saved)
    }

    pub fn get_note(&self) -> Result<GlobalNote> {
        self.stores.notes.get()
    }
}

fn require_admin(viewer: &Viewer, action: &'static str) -> Result<()> {
    if viewer.is_admin {
        Ok(())
    } else {
        Err(ScheduleError::Forbidden(action))
    }
}

/// Unwraps a field that passed [`FieldChecks::finish`].
fn present<T>(value: Option<T>) -> Result<T> {
    value.ok_or_else(|| ScheduleError::Internal("validated field missing".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RoleCode;
    use crate::roster::StaticRoster;
    use crate::store::memory::MemoryTable;
    use std::sync::{mpsc, Mutex};
    use std::thread;
    use std::time::Duration;

    fn service() -> ScheduleService {
        let roster = StaticRoster::new(["Kim", "Lee"]).unwrap();
        ScheduleService::new(Stores::in_memory(), Arc::new(roster))
    }

    fn admin() -> Viewer {
        Viewer::admin("root", "Admin")
    }

    /// Submission store that reports when an upsert starts and then stalls,
    /// leaving room for a concurrent confirmation.
    struct StallingSubmissions {
        inner: MemoryTable<Submission>,
        entered: Mutex<mpsc::Sender<()>>,
    }

    impl KeyedStore for StallingSubmissions {
        type Record = Submission;

        fn find(&self, key: &SubmissionKey) -> Result<Option<Submission>> {
            self.inner.find(key)
        }

        fn insert(&self, record: &Submission) -> Result<Submission> {
            self.inner.insert(record)
        }

        fn update(&self, record: &Submission) -> Result<Submission> {
            self.inner.update(record)
        }

        fn upsert(&self, record: &Submission) -> Result<Submission> {
            self.entered.lock().unwrap().send(()).unwrap();
            thread::sleep(Duration::from_millis(50));
            self.inner.upsert(record)
        }

        fn delete_by_key(&self, key: &SubmissionKey) -> Result<bool> {
            self.inner.delete_by_key(key)
        }

        fn find_by_date_range(
            &self,
            start: CalendarDate,
            end: CalendarDate,
        ) -> Result<Vec<Submission>> {
            self.inner.find_by_date_range(start, end)
        }
    }

    impl SubmissionStore for StallingSubmissions {
        fn set_confirmation(&self, date: CalendarDate, confirmed: Confirmation) -> Result<usize> {
            SubmissionStore::set_confirmation(&self.inner, date, confirmed)
        }

        fn update_role_and_remarks(
            &self,
            key: &SubmissionKey,
            role: Option<RoleCode>,
            remarks: &str,
        ) -> Result<Submission> {
            self.inner.update_role_and_remarks(key, role, remarks)
        }
    }

    #[test]
    fn test_confirm_during_submission_reaches_new_row() {
        let (tx, rx) = mpsc::channel();
        let stores = Stores {
            submissions: Arc::new(StallingSubmissions {
                inner: MemoryTable::new(),
                entered: Mutex::new(tx),
            }),
            ..Stores::in_memory()
        };
        let svc = ScheduleService::new(stores, Arc::new(StaticRoster::new(["Kim"]).unwrap()));
        let u1 = Viewer::member("U1", "Kim");

        thread::scope(|scope| {
            let member =
                scope.spawn(|| svc.submit_availability(&u1, "2025-02-10", "U1", "Kim", "", true));
            rx.recv().unwrap();
            svc.set_confirmation(&admin(), "2025-02-10", "Y").unwrap();
            member.join().unwrap().unwrap();
        });

        let rows = svc.get_visible_submissions(2025, 2, &admin()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].confirmed, Confirmation::Y);
        assert_eq!(svc.day_confirmation("2025-02-10").unwrap(), Confirmation::Y);
    }

    #[test]
    fn test_visibility_follows_confirmation() {
        let svc = service();
        let u1 = Viewer::member("U1", "Kim");
        let u2 = Viewer::member("U2", "Lee");
        svc.submit_availability(&u1, "2025-02-10", "U1", "Kim", "", true)
            .unwrap();
        svc.submit_availability(&u2, "2025-02-10", "U2", "Lee", "", true)
            .unwrap();

        let before = svc.get_visible_submissions(2025, 2, &u1).unwrap();
        assert_eq!(before.len(), 1);
        assert_eq!(before[0].person_id, "U1");

        svc.set_confirmation(&admin(), "2025-02-10", "Y").unwrap();
        assert_eq!(svc.get_visible_submissions(2025, 2, &u1).unwrap().len(), 2);

        svc.set_confirmation(&admin(), "2025-02-10", "N").unwrap();
        assert_eq!(svc.get_visible_submissions(2025, 2, &u1).unwrap().len(), 1);
    }

    #[test]
    fn test_time_is_normalized() {
        let svc = service();
        svc.assign_time_slot("2025-03-01", "16:00:00", "Theme", "A,B")
            .unwrap();
        let slots = svc.get_visible_time_slots("2025-03-01", &admin()).unwrap();
        assert_eq!(slots[0].time_of_day.to_string(), "16:00");
        assert_eq!(slots[0].performers.joined(), "A,B");
    }

    #[test]
    fn test_confirmation_requires_admin() {
        let svc = service();
        let err = svc
            .set_confirmation(&Viewer::member("U1", "Kim"), "2025-02-10", "Y")
            .unwrap_err();
        assert!(matches!(err, ScheduleError::Forbidden(_)));
    }

    #[test]
    fn test_bad_confirmation_literal() {
        let svc = service();
        let err = svc.set_confirmation(&admin(), "2025-02-10", "X").unwrap_err();
        let ScheduleError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert_eq!(errors[0].field, "confirmed");
    }

    #[test]
    fn test_member_cannot_submit_for_others() {
        let svc = service();
        let err = svc
            .submit_availability(&Viewer::member("U1", "Kim"), "2025-02-10", "U2", "Lee", "", true)
            .unwrap_err();
        assert!(matches!(err, ScheduleError::Forbidden(_)));
    }

    #[test]
    fn test_submission_collects_all_field_errors() {
        let svc = service();
        let err = svc
            .submit_availability(&admin(), "2025-13-01", "", "Kim", "DANCER", false)
            .unwrap_err();
        let ScheduleError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["date", "person_id", "role"]);
        assert_eq!(errors[2].kind, ValidationErrorKind::InvalidCode);
    }

    #[test]
    fn test_new_rows_inherit_confirmed_day() {
        let svc = service();
        svc.assign_time_slot("2025-02-10", "14:00", "Opening", "Kim")
            .unwrap();
        svc.set_confirmation(&admin(), "2025-02-10", "Y").unwrap();

        let late = svc
            .add_person_to_date(&admin(), "2025-02-10", "U3", "Park")
            .unwrap();
        assert_eq!(late.confirmed, Confirmation::Y);
        assert!(!late.open_hope);

        let submitted = svc
            .submit_availability(&Viewer::member("U2", "Lee"), "2025-02-10", "U2", "Lee", "", true)
            .unwrap();
        assert_eq!(submitted.confirmed, Confirmation::Y);
        let slots = svc
            .replace_time_slots(
                "2025-02-10",
                &[SlotInput::new("14:00", "Opening", "Kim"), SlotInput::new("16:00", "", "")],
            )
            .unwrap();
        assert!(slots.iter().all(|s| s.confirmed == Confirmation::Y));
    }

    #[test]
    fn test_resubmission_keeps_remarks_and_confirmation() {
        let svc = service();
        let u1 = Viewer::member("U1", "Kim");
        svc.submit_availability(&u1, "2025-02-10", "U1", "Kim", "", true)
            .unwrap();
        svc.update_submission_role(&admin(), "2025-02-10", "U1", "FEMALE1", "late start")
            .unwrap();
        svc.set_confirmation(&admin(), "2025-02-10", "Y").unwrap();

        let again = svc
            .submit_availability(&u1, "2025-02-10", "U1", "Kim", "DOOR", false)
            .unwrap();
        assert_eq!(again.role, Some(RoleCode::Door));
        assert_eq!(again.remarks, "late start");
        assert_eq!(again.confirmed, Confirmation::Y);
    }

    #[test]
    fn test_role_update_on_missing_row() {
        let svc = service();
        let err = svc
            .update_submission_role(&admin(), "2025-02-10", "U9", "DOOR", "")
            .unwrap_err();
        assert!(matches!(err, ScheduleError::NotFound { .. }));
    }

    #[test]
    fn test_delete_submission_reports_found() {
        let svc = service();
        assert!(!svc
            .delete_submission(&admin(), "2025-02-10", "ghost")
            .unwrap());
    }

    #[test]
    fn test_hours_bounds_and_delete() {
        let svc = service();
        let err = svc
            .log_hours("2025-02-03", "Kim", Decimal::from(25), "")
            .unwrap_err();
        assert!(matches!(err, ScheduleError::Validation(_)));

        svc.log_hours("2025-02-03", "Kim", Decimal::new(75, 1), "")
            .unwrap();
        svc.delete_hours("2025-02-03", "Kim").unwrap();
        let err = svc.delete_hours("2025-02-03", "Kim").unwrap_err();
        assert!(matches!(err, ScheduleError::NotFound { .. }));
    }

    #[test]
    fn test_table_reflects_logged_hours_and_remarks() {
        let svc = service();
        svc.log_hours("2025-02-03", "Kim", Decimal::from(8), "")
            .unwrap();
        svc.log_hours("2025-02-03", "Lee", Decimal::new(45, 1), "")
            .unwrap();
        assert_eq!(svc.update_daily_remarks("2025-02-03", "holiday").unwrap(), 2);

        let table = svc.get_monthly_table(2025, 2).unwrap();
        assert_eq!(table.rows[2].row_total, "12.5");
        assert_eq!(table.rows[2].remarks, "holiday");
        assert_eq!(table.grand_total, "12.5");
    }

    #[test]
    fn test_replace_slots_validates_every_time() {
        let svc = service();
        let err = svc
            .replace_time_slots(
                "2025-03-01",
                &[SlotInput::new("14:00", "", ""), SlotInput::new("25:00", "", "")],
            )
            .unwrap_err();
        let ScheduleError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert_eq!(errors[0].field, "slots[1].time_of_day");

        let err = svc
            .replace_time_slots(
                "2025-03-01",
                &[SlotInput::new("14:00", "", ""), SlotInput::new("14:00:00", "", "")],
            )
            .unwrap_err();
        let ScheduleError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert_eq!(errors[0].kind, ValidationErrorKind::DuplicateId);

        let saved = svc
            .replace_time_slots(
                "2025-03-01",
                &[SlotInput::new("18:00", "Late", "A"), SlotInput::new("14:00", "Early", "B")],
            )
            .unwrap();
        assert_eq!(saved.len(), 2);
        assert!(svc.delete_time_slot("2025-03-01", "18:00").unwrap());
        assert!(!svc.delete_time_slot("2025-03-01", "18:00").unwrap());
    }

    #[test]
    fn test_note_is_admin_only() {
        let svc = service();
        assert!(svc.get_note().unwrap().content.is_empty());
        assert!(matches!(
            svc.save_note(&Viewer::member("U1", "Kim"), "hi").unwrap_err(),
            ScheduleError::Forbidden(_)
        ));
        let saved = svc.save_note(&admin(), "Doors at 6").unwrap();
        assert_eq!(saved.updated_by, "Admin");
        assert_eq!(svc.get_note().unwrap().content, "Doors at 6");
    }
}

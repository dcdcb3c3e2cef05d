//! Submission table operations

use std::sync::Arc;

use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

use super::{is_constraint_violation, parsed_column, SqliteDb};
use crate::error::{Result, ScheduleError};
use crate::models::{
    CalendarDate, Confirmation, RoleCode, Submission, SubmissionKey,
};
use crate::store::{KeyedStore, StoredRecord, SubmissionStore};

const COLUMNS: &str = "date, person_id, person_name, role, open_hope, confirmed, remarks";

/// Submission store over a shared [`SqliteDb`].
pub struct SqliteSubmissions {
    db: Arc<SqliteDb>,
}

impl SqliteSubmissions {
    pub fn new(db: Arc<SqliteDb>) -> Self {
        Self { db }
    }
}

fn row_to_submission(row: &Row<'_>) -> rusqlite::Result<Submission> {
    Ok(Submission {
        date: parsed_column(row, 0, CalendarDate::parse)?,
        person_id: row.get(1)?,
        person_name: row.get(2)?,
        role: parsed_column(row, 3, RoleCode::parse_optional)?,
        open_hope: row.get(4)?,
        confirmed: parsed_column(row, 5, Confirmation::parse)?,
        remarks: row.get(6)?,
    })
}

fn role_code(role: Option<RoleCode>) -> &'static str {
    role.map(|r| r.code()).unwrap_or("")
}

fn select_one(conn: &Connection, key: &SubmissionKey) -> Result<Option<Submission>> {
    let sql = format!("SELECT {COLUMNS} FROM submission WHERE date = ?1 AND person_id = ?2");
    Ok(conn
        .query_row(
            &sql,
            params![key.date.to_string(), key.person_id],
            row_to_submission,
        )
        .optional()?)
}

fn require(conn: &Connection, key: &SubmissionKey) -> Result<Submission> {
    select_one(conn, key)?.ok_or_else(|| {
        ScheduleError::Internal(format!("submission {key} missing right after write"))
    })
}

impl KeyedStore for SqliteSubmissions {
    type Record = Submission;

    fn find(&self, key: &SubmissionKey) -> Result<Option<Submission>> {
        self.db.with_conn(|conn| select_one(conn, key))
    }

    fn insert(&self, record: &Submission) -> Result<Submission> {
        let key = record.key();
        self.db.with_conn(|conn| {
            let sql = format!("INSERT INTO submission ({COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)");
            let inserted = conn.execute(
                &sql,
                params![
                    record.date.to_string(),
                    record.person_id,
                    record.person_name,
                    role_code(record.role),
                    record.open_hope,
                    record.confirmed.as_str(),
                    record.remarks,
                ],
            );
            match inserted {
                Err(e) if is_constraint_violation(&e) => {
                    Err(ScheduleError::conflict(Submission::ENTITY, &key))
                }
                Err(e) => Err(e.into()),
                Ok(_) => require(conn, &key),
            }
        })
    }

    fn update(&self, record: &Submission) -> Result<Submission> {
        let key = record.key();
        self.db.with_conn(|conn| {
            let rows = conn.execute(
                "UPDATE submission
                 SET person_name = ?3, role = ?4, open_hope = ?5, remarks = ?6
                 WHERE date = ?1 AND person_id = ?2",
                params![
                    record.date.to_string(),
                    record.person_id,
                    record.person_name,
                    role_code(record.role),
                    record.open_hope,
                    record.remarks,
                ],
            )?;
            if rows == 0 {
                return Err(ScheduleError::not_found(Submission::ENTITY, &key));
            }
            require(conn, &key)
        })
    }

    fn upsert(&self, record: &Submission) -> Result<Submission> {
        let key = record.key();
        self.db.with_conn(|conn| {
            let sql = format!(
                "INSERT INTO submission ({COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT(date, person_id) DO UPDATE SET
                 person_name = excluded.person_name,
                 role = excluded.role,
                 open_hope = excluded.open_hope,
                 remarks = excluded.remarks"
            );
            conn.execute(
                &sql,
                params![
                    record.date.to_string(),
                    record.person_id,
                    record.person_name,
                    role_code(record.role),
                    record.open_hope,
                    record.confirmed.as_str(),
                    record.remarks,
                ],
            )?;
            require(conn, &key)
        })
    }

    fn delete_by_key(&self, key: &SubmissionKey) -> Result<bool> {
        let rows = self.db.with_conn(|conn| {
            Ok(conn.execute(
                "DELETE FROM submission WHERE date = ?1 AND person_id = ?2",
                params![key.date.to_string(), key.person_id],
            )?)
        })?;
        debug!(%key, found = rows > 0, "delete submission");
        Ok(rows > 0)
    }

    fn find_by_date_range(&self, start: CalendarDate, end: CalendarDate) -> Result<Vec<Submission>> {
        self.db.with_conn(|conn| {
            let sql = format!(
                "SELECT {COLUMNS} FROM submission
                 WHERE date BETWEEN ?1 AND ?2
                 ORDER BY date, person_id"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(
                params![start.to_string(), end.to_string()],
                row_to_submission,
            )?;
            Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
        })
    }
}

impl SubmissionStore for SqliteSubmissions {
    fn set_confirmation(&self, date: CalendarDate, confirmed: Confirmation) -> Result<usize> {
        self.db.with_conn(|conn| {
            Ok(conn.execute(
                "UPDATE submission SET confirmed = ?2 WHERE date = ?1",
                params![date.to_string(), confirmed.as_str()],
            )?)
        })
    }

    fn update_role_and_remarks(
        &self,
        key: &SubmissionKey,
        role: Option<RoleCode>,
        remarks: &str,
    ) -> Result<Submission> {
        self.db.with_conn(|conn| {
            let rows = conn.execute(
                "UPDATE submission SET role = ?3, remarks = ?4
                 WHERE date = ?1 AND person_id = ?2",
                params![key.date.to_string(), key.person_id, role_code(role), remarks],
            )?;
            if rows == 0 {
                return Err(ScheduleError::not_found(Submission::ENTITY, key));
            }
            require(conn, key)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SqliteSubmissions {
        SqliteSubmissions::new(Arc::new(SqliteDb::open_in_memory().unwrap()))
    }

    fn date(raw: &str) -> CalendarDate {
        CalendarDate::parse(raw).unwrap()
    }

    #[test]
    fn test_native_upsert_is_idempotent() {
        let store = store();
        let s = Submission::new(date("2025-02-10"), "U1", "Kim")
            .with_role(Some(RoleCode::Female1))
            .with_open_hope(true);

        let first = store.upsert(&s).unwrap();
        let second = store.upsert(&s).unwrap();
        assert_eq!(first, second);
        assert_eq!(store.find_by_date(date("2025-02-10")).unwrap(), vec![first]);
    }

    #[test]
    fn test_upsert_keeps_confirmation() {
        let store = store();
        let d = date("2025-02-10");
        store
            .insert(&Submission::new(d, "U1", "Kim").with_confirmed(Confirmation::Y))
            .unwrap();
        let saved = store
            .upsert(&Submission::new(d, "U1", "Kim").with_remarks("swap"))
            .unwrap();
        assert_eq!(saved.confirmed, Confirmation::Y);
        assert_eq!(saved.remarks, "swap");
    }

    #[test]
    fn test_insert_duplicate_is_conflict() {
        let store = store();
        let s = Submission::new(date("2025-02-10"), "U1", "Kim");
        store.insert(&s).unwrap();
        let err = store.insert(&s).unwrap_err();
        assert!(matches!(err, ScheduleError::Conflict { .. }));
    }

    #[test]
    fn test_role_update_and_missing_row() {
        let store = store();
        let d = date("2025-02-10");
        store.insert(&Submission::new(d, "U1", "Kim")).unwrap();

        let updated = store
            .update_role_and_remarks(&SubmissionKey::new(d, "U1"), Some(RoleCode::Door), "front")
            .unwrap();
        assert_eq!(updated.role, Some(RoleCode::Door));
        assert_eq!(updated.remarks, "front");

        let err = store
            .update_role_and_remarks(&SubmissionKey::new(d, "U9"), None, "")
            .unwrap_err();
        assert!(matches!(err, ScheduleError::NotFound { .. }));
    }

    #[test]
    fn test_set_confirmation_counts_rows() {
        let store = store();
        let d = date("2025-02-10");
        store.insert(&Submission::new(d, "U1", "Kim")).unwrap();
        store.insert(&Submission::new(d, "U2", "Lee")).unwrap();
        store
            .insert(&Submission::new(date("2025-02-11"), "U1", "Kim"))
            .unwrap();

        assert_eq!(store.set_confirmation(d, Confirmation::Y).unwrap(), 2);
        let next_day = store.find_by_date(date("2025-02-11")).unwrap();
        assert_eq!(next_day[0].confirmed, Confirmation::N);
    }

    #[test]
    fn test_delete_reports_existence() {
        let store = store();
        let key = SubmissionKey::new(date("2025-02-10"), "U1");
        assert!(!store.delete_by_key(&key).unwrap());
        store.insert(&Submission::new(key.date, "U1", "Kim")).unwrap();
        assert!(store.delete_by_key(&key).unwrap());
    }
}

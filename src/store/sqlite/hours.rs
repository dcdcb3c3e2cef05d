//! Hour-record table operations

use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

use super::{is_constraint_violation, parsed_column, SqliteDb};
use crate::error::{Result, ScheduleError};
use crate::models::{CalendarDate, HourKey, HourRecord};
use crate::store::{HoursLedger, KeyedStore, StoredRecord};

const COLUMNS: &str = "date, person_name, hours, remarks";

/// Hours ledger over a shared [`SqliteDb`].
///
/// Hours are stored as decimal text so `7.5` reads back exactly.
pub struct SqliteHours {
    db: Arc<SqliteDb>,
}

impl SqliteHours {
    pub fn new(db: Arc<SqliteDb>) -> Self {
        Self { db }
    }
}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<HourRecord> {
    Ok(HourRecord {
        date: parsed_column(row, 0, CalendarDate::parse)?,
        person_name: row.get(1)?,
        hours: parsed_column(row, 2, Decimal::from_str)?,
        remarks: row.get(3)?,
    })
}

fn select_one(conn: &Connection, key: &HourKey) -> Result<Option<HourRecord>> {
    let sql = format!("SELECT {COLUMNS} FROM hour_record WHERE date = ?1 AND person_name = ?2");
    Ok(conn
        .query_row(
            &sql,
            params![key.date.to_string(), key.person_name],
            row_to_record,
        )
        .optional()?)
}

fn require(conn: &Connection, key: &HourKey) -> Result<HourRecord> {
    select_one(conn, key)?.ok_or_else(|| {
        ScheduleError::Internal(format!("hour record {key} missing right after write"))
    })
}

impl KeyedStore for SqliteHours {
    type Record = HourRecord;

    fn find(&self, key: &HourKey) -> Result<Option<HourRecord>> {
        self.db.with_conn(|conn| select_one(conn, key))
    }

    fn insert(&self, record: &HourRecord) -> Result<HourRecord> {
        let key = record.key();
        self.db.with_conn(|conn| {
            let sql = format!("INSERT INTO hour_record ({COLUMNS}) VALUES (?1, ?2, ?3, ?4)");
            let inserted = conn.execute(
                &sql,
                params![
                    record.date.to_string(),
                    record.person_name,
                    record.hours.to_string(),
                    record.remarks,
                ],
            );
            match inserted {
                Err(e) if is_constraint_violation(&e) => {
                    Err(ScheduleError::conflict(HourRecord::ENTITY, &key))
                }
                Err(e) => Err(e.into()),
                Ok(_) => require(conn, &key),
            }
        })
    }

    fn update(&self, record: &HourRecord) -> Result<HourRecord> {
        let key = record.key();
        self.db.with_conn(|conn| {
            let rows = conn.execute(
                "UPDATE hour_record SET hours = ?3, remarks = ?4
                 WHERE date = ?1 AND person_name = ?2",
                params![
                    record.date.to_string(),
                    record.person_name,
                    record.hours.to_string(),
                    record.remarks,
                ],
            )?;
            if rows == 0 {
                return Err(ScheduleError::not_found(HourRecord::ENTITY, &key));
            }
            require(conn, &key)
        })
    }

    fn upsert(&self, record: &HourRecord) -> Result<HourRecord> {
        let key = record.key();
        self.db.with_conn(|conn| {
            let sql = format!(
                "INSERT INTO hour_record ({COLUMNS}) VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(date, person_name) DO UPDATE SET
                 hours = excluded.hours,
                 remarks = excluded.remarks"
            );
            conn.execute(
                &sql,
                params![
                    record.date.to_string(),
                    record.person_name,
                    record.hours.to_string(),
                    record.remarks,
                ],
            )?;
            require(conn, &key)
        })
    }

    fn delete_by_key(&self, key: &HourKey) -> Result<bool> {
        let rows = self.db.with_conn(|conn| {
            Ok(conn.execute(
                "DELETE FROM hour_record WHERE date = ?1 AND person_name = ?2",
                params![key.date.to_string(), key.person_name],
            )?)
        })?;
        debug!(%key, found = rows > 0, "delete hour record");
        Ok(rows > 0)
    }

    fn find_by_date_range(&self, start: CalendarDate, end: CalendarDate) -> Result<Vec<HourRecord>> {
        self.db.with_conn(|conn| {
            let sql = format!(
                "SELECT {COLUMNS} FROM hour_record
                 WHERE date BETWEEN ?1 AND ?2
                 ORDER BY date, person_name"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params![start.to_string(), end.to_string()], row_to_record)?;
            Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
        })
    }
}

impl HoursLedger for SqliteHours {
    fn update_remarks_by_date(&self, date: CalendarDate, remarks: &str) -> Result<usize> {
        self.db.with_conn(|conn| {
            Ok(conn.execute(
                "UPDATE hour_record SET remarks = ?2 WHERE date = ?1",
                params![date.to_string(), remarks],
            )?)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SqliteHours {
        SqliteHours::new(Arc::new(SqliteDb::open_in_memory().unwrap()))
    }

    fn date(raw: &str) -> CalendarDate {
        CalendarDate::parse(raw).unwrap()
    }

    #[test]
    fn test_fractional_hours_round_trip_exactly() {
        let store = store();
        let d = date("2025-02-03");
        let saved = store
            .upsert(&HourRecord::new(d, "Kim", Decimal::new(75, 1)))
            .unwrap();
        assert_eq!(saved.hours, Decimal::new(75, 1));
        assert_eq!(saved.hours.to_string(), "7.5");
    }

    #[test]
    fn test_upsert_overwrites_hours() {
        let store = store();
        let d = date("2025-02-03");
        store.upsert(&HourRecord::new(d, "Kim", Decimal::from(4))).unwrap();
        store.upsert(&HourRecord::new(d, "Kim", Decimal::from(6))).unwrap();

        let rows = store.find_by_date(d).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].hours, Decimal::from(6));
    }

    #[test]
    fn test_update_missing_is_not_found() {
        let store = store();
        let err = store
            .update(&HourRecord::new(date("2025-02-03"), "Kim", Decimal::ONE))
            .unwrap_err();
        assert!(matches!(err, ScheduleError::NotFound { .. }));
    }

    #[test]
    fn test_range_excludes_neighbouring_months() {
        let store = store();
        for raw in ["2025-01-31", "2025-02-01", "2025-02-28", "2025-03-01"] {
            store
                .insert(&HourRecord::new(date(raw), "Kim", Decimal::ONE))
                .unwrap();
        }
        let rows = store
            .find_by_date_range(date("2025-02-01"), date("2025-02-28"))
            .unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_daily_remarks_touch_one_date() {
        let store = store();
        let d = date("2025-02-03");
        store.insert(&HourRecord::new(d, "Kim", Decimal::ONE)).unwrap();
        store.insert(&HourRecord::new(d, "Lee", Decimal::ONE)).unwrap();
        store
            .insert(&HourRecord::new(date("2025-02-04"), "Kim", Decimal::ONE))
            .unwrap();

        assert_eq!(store.update_remarks_by_date(d, "tech run").unwrap(), 2);
        let next = store.find_by_date(date("2025-02-04")).unwrap();
        assert!(next[0].remarks.is_empty());
    }
}

//! Time-slot table operations

use std::sync::Arc;

use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

use super::{is_constraint_violation, parsed_column, SqliteDb};
use crate::error::{Result, ScheduleError};
use crate::models::{
    CalendarDate, Confirmation, Performers, TimeOfDay, TimeSlotAssignment, TimeSlotKey,
};
use crate::store::memory::ensure_same_date;
use crate::store::{KeyedStore, StoredRecord, TimeSlotStore};

const COLUMNS: &str = "date, time_of_day, theme, performers, confirmed";

/// Time-slot store over a shared [`SqliteDb`].
pub struct SqliteTimeSlots {
    db: Arc<SqliteDb>,
}

impl SqliteTimeSlots {
    pub fn new(db: Arc<SqliteDb>) -> Self {
        Self { db }
    }
}

fn row_to_slot(row: &Row<'_>) -> rusqlite::Result<TimeSlotAssignment> {
    let performers: String = row.get(3)?;
    Ok(TimeSlotAssignment {
        date: parsed_column(row, 0, CalendarDate::parse)?,
        time_of_day: parsed_column(row, 1, TimeOfDay::parse)?,
        theme: row.get(2)?,
        performers: Performers::parse(&performers),
        confirmed: parsed_column(row, 4, Confirmation::parse)?,
    })
}

fn select_one(conn: &Connection, key: &TimeSlotKey) -> Result<Option<TimeSlotAssignment>> {
    let sql = format!("SELECT {COLUMNS} FROM time_slot WHERE date = ?1 AND time_of_day = ?2");
    Ok(conn
        .query_row(
            &sql,
            params![key.date.to_string(), key.time_of_day.to_string()],
            row_to_slot,
        )
        .optional()?)
}

fn select_date(conn: &Connection, date: CalendarDate) -> Result<Vec<TimeSlotAssignment>> {
    let sql = format!("SELECT {COLUMNS} FROM time_slot WHERE date = ?1 ORDER BY time_of_day");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![date.to_string()], row_to_slot)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

fn require(conn: &Connection, key: &TimeSlotKey) -> Result<TimeSlotAssignment> {
    select_one(conn, key)?.ok_or_else(|| {
        ScheduleError::Internal(format!("time slot {key} missing right after write"))
    })
}

fn insert_row(conn: &Connection, slot: &TimeSlotAssignment) -> rusqlite::Result<usize> {
    let sql = format!("INSERT INTO time_slot ({COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5)");
    conn.execute(
        &sql,
        params![
            slot.date.to_string(),
            slot.time_of_day.to_string(),
            slot.theme,
            slot.performers.joined(),
            slot.confirmed.as_str(),
        ],
    )
}

impl KeyedStore for SqliteTimeSlots {
    type Record = TimeSlotAssignment;

    fn find(&self, key: &TimeSlotKey) -> Result<Option<TimeSlotAssignment>> {
        self.db.with_conn(|conn| select_one(conn, key))
    }

    fn insert(&self, record: &TimeSlotAssignment) -> Result<TimeSlotAssignment> {
        let key = record.key();
        self.db.with_conn(|conn| match insert_row(conn, record) {
            Err(e) if is_constraint_violation(&e) => {
                Err(ScheduleError::conflict(TimeSlotAssignment::ENTITY, key))
            }
            Err(e) => Err(e.into()),
            Ok(_) => require(conn, &key),
        })
    }

    fn update(&self, record: &TimeSlotAssignment) -> Result<TimeSlotAssignment> {
        let key = record.key();
        self.db.with_conn(|conn| {
            let rows = conn.execute(
                "UPDATE time_slot SET theme = ?3, performers = ?4
                 WHERE date = ?1 AND time_of_day = ?2",
                params![
                    key.date.to_string(),
                    key.time_of_day.to_string(),
                    record.theme,
                    record.performers.joined(),
                ],
            )?;
            if rows == 0 {
                return Err(ScheduleError::not_found(TimeSlotAssignment::ENTITY, key));
            }
            require(conn, &key)
        })
    }

    fn upsert(&self, record: &TimeSlotAssignment) -> Result<TimeSlotAssignment> {
        let key = record.key();
        self.db.with_conn(|conn| {
            let sql = format!(
                "INSERT INTO time_slot ({COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(date, time_of_day) DO UPDATE SET
                 theme = excluded.theme,
                 performers = excluded.performers"
            );
            conn.execute(
                &sql,
                params![
                    record.date.to_string(),
                    record.time_of_day.to_string(),
                    record.theme,
                    record.performers.joined(),
                    record.confirmed.as_str(),
                ],
            )?;
            require(conn, &key)
        })
    }

    fn delete_by_key(&self, key: &TimeSlotKey) -> Result<bool> {
        let rows = self.db.with_conn(|conn| {
            Ok(conn.execute(
                "DELETE FROM time_slot WHERE date = ?1 AND time_of_day = ?2",
                params![key.date.to_string(), key.time_of_day.to_string()],
            )?)
        })?;
        debug!(%key, found = rows > 0, "delete time slot");
        Ok(rows > 0)
    }

    fn find_by_date_range(
        &self,
        start: CalendarDate,
        end: CalendarDate,
    ) -> Result<Vec<TimeSlotAssignment>> {
        self.db.with_conn(|conn| {
            let sql = format!(
                "SELECT {COLUMNS} FROM time_slot
                 WHERE date BETWEEN ?1 AND ?2
                 ORDER BY date, time_of_day"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params![start.to_string(), end.to_string()], row_to_slot)?;
            Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
        })
    }

    fn find_by_date(&self, date: CalendarDate) -> Result<Vec<TimeSlotAssignment>> {
        self.db.with_conn(|conn| select_date(conn, date))
    }
}

impl TimeSlotStore for SqliteTimeSlots {
    fn set_confirmation(&self, date: CalendarDate, confirmed: Confirmation) -> Result<usize> {
        self.db.with_conn(|conn| {
            Ok(conn.execute(
                "UPDATE time_slot SET confirmed = ?2 WHERE date = ?1",
                params![date.to_string(), confirmed.as_str()],
            )?)
        })
    }

    fn replace_date(
        &self,
        date: CalendarDate,
        slots: &[TimeSlotAssignment],
    ) -> Result<Vec<TimeSlotAssignment>> {
        ensure_same_date(date, slots)?;

        self.db.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let removed = tx.execute(
                "DELETE FROM time_slot WHERE date = ?1",
                params![date.to_string()],
            )?;
            for slot in slots {
                match insert_row(&tx, slot) {
                    Err(e) if is_constraint_violation(&e) => {
                        return Err(ScheduleError::conflict(
                            TimeSlotAssignment::ENTITY,
                            slot.key(),
                        ));
                    }
                    other => {
                        other?;
                    }
                }
            }
            let saved = select_date(&tx, date)?;
            tx.commit()?;
            debug!(%date, removed, inserted = saved.len(), "replaced time slots");
            Ok(saved)
        })
    }
}

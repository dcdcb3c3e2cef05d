//! SQLite store backend.
//!
//! All four stores share one connection behind a mutex, so every statement
//! (and every multi-statement transaction) runs to completion before the
//! next begins.
//!
//! ## Tables
//!
//! - `submission` - availability rows, primary key `(date, person_id)`
//! - `time_slot` - slot assignments, primary key `(date, time_of_day)`
//! - `hour_record` - worked hours, primary key `(date, person_name)`
//! - `global_note` - the single `GLOBAL` note row
//!
//! Dates are stored as `YYYY-MM-DD` text and times as `HH:mm`, so text
//! ordering equals calendar ordering.

mod hours;
mod notes;
pub mod schema;
mod submissions;
mod time_slots;

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::types::Type;
use rusqlite::{Connection, ErrorCode, Row};
use tracing::{debug, info};

use crate::error::{Result, ScheduleError};

pub use hours::SqliteHours;
pub use notes::SqliteNotes;
pub use submissions::SqliteSubmissions;
pub use time_slots::SqliteTimeSlots;

/// Shared SQLite database for all schedule tables.
pub struct SqliteDb {
    conn: Mutex<Connection>,
}

impl SqliteDb {
    /// Opens (or creates) the schedule database at `path`, in WAL mode.
    pub fn open(path: &Path) -> Result<Self> {
        info!(path = %path.display(), "opening schedule database");

        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        let db = Self {
            conn: Mutex::new(conn),
        };
        db.create_tables()?;
        Ok(db)
    }

    /// A private in-memory database; gone when dropped.
    pub fn open_in_memory() -> Result<Self> {
        debug!("opening in-memory schedule database");

        let db = Self {
            conn: Mutex::new(Connection::open_in_memory()?),
        };
        db.create_tables()?;
        Ok(db)
    }

    fn create_tables(&self) -> Result<()> {
        let conn = self.lock()?;
        schema::create_tables(&conn)
    }

    /// Runs `f` against the connection while holding the lock.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.lock()?;
        f(&conn)
    }

    /// Like [`SqliteDb::with_conn`], with `&mut` access for transactions.
    pub fn with_conn_mut<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T>,
    {
        let mut conn = self.lock()?;
        f(&mut conn)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| ScheduleError::Internal(format!("database lock poisoned: {e}")))
    }
}

/// Whether an error is a primary-key / unique violation.
pub(crate) fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

/// Reads a text column and parses it into a domain value.
pub(crate) fn parsed_column<T, E, F>(row: &Row<'_>, idx: usize, parse: F) -> rusqlite::Result<T>
where
    F: FnOnce(&str) -> std::result::Result<T, E>,
    E: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.get(idx)?;
    parse(&raw).map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

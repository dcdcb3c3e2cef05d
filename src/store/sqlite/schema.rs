//! Table definitions for the schedule database.
//!
//! Every statement is `IF NOT EXISTS`, so opening an existing file is a
//! no-op and opening a fresh one creates all four tables.

use rusqlite::Connection;
use tracing::debug;

use crate::error::Result;

/// Tables created on open, in creation order.
pub const TABLES: [&str; 4] = ["submission", "time_slot", "hour_record", "global_note"];

/// Creates any missing schedule tables.
pub fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEDULE_SCHEMA)?;
    debug!(tables = ?TABLES, "schedule tables ready");
    Ok(())
}

const SCHEDULE_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS submission (
    date        TEXT NOT NULL,
    person_id   TEXT NOT NULL,
    person_name TEXT NOT NULL,
    role        TEXT NOT NULL DEFAULT '',
    open_hope   INTEGER NOT NULL DEFAULT 0,
    confirmed   TEXT NOT NULL DEFAULT 'N' CHECK (confirmed IN ('Y', 'N')),
    remarks     TEXT NOT NULL DEFAULT '',
    PRIMARY KEY (date, person_id)
);

CREATE TABLE IF NOT EXISTS time_slot (
    date        TEXT NOT NULL,
    time_of_day TEXT NOT NULL,
    theme       TEXT NOT NULL DEFAULT '',
    performers  TEXT NOT NULL DEFAULT '',
    confirmed   TEXT NOT NULL DEFAULT 'N' CHECK (confirmed IN ('Y', 'N')),
    PRIMARY KEY (date, time_of_day)
);

CREATE TABLE IF NOT EXISTS hour_record (
    date        TEXT NOT NULL,
    person_name TEXT NOT NULL,
    hours       TEXT NOT NULL,
    remarks     TEXT NOT NULL DEFAULT '',
    PRIMARY KEY (date, person_name)
);

CREATE TABLE IF NOT EXISTS global_note (
    id          TEXT PRIMARY KEY,
    content     TEXT NOT NULL,
    updated_by  TEXT NOT NULL,
    updated_at  TEXT
);
"#;

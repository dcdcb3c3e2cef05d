//! Global note row

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};

use super::{parsed_column, SqliteDb};
use crate::error::Result;
use crate::models::{GlobalNote, GLOBAL_NOTE_ID};
use crate::store::NoteBoard;

/// Note board over a shared [`SqliteDb`].
pub struct SqliteNotes {
    db: Arc<SqliteDb>,
}

impl SqliteNotes {
    pub fn new(db: Arc<SqliteDb>) -> Self {
        Self { db }
    }
}

/// `updated_at` is RFC 3339 text, NULL until the first save.
fn read_timestamp(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<Option<DateTime<Utc>>> {
    let raw: Option<String> = row.get(idx)?;
    if raw.is_none() {
        return Ok(None);
    }
    parsed_column(row, idx, |text| {
        DateTime::parse_from_rfc3339(text).map(|at| Some(at.with_timezone(&Utc)))
    })
}

impl NoteBoard for SqliteNotes {
    fn get(&self) -> Result<GlobalNote> {
        let row = self.db.with_conn(|conn| {
            Ok(conn
                .query_row(
                    "SELECT content, updated_by, updated_at FROM global_note WHERE id = ?1",
                    params![GLOBAL_NOTE_ID],
                    |row| {
                        Ok((
                            row.get::<_, String>(0)?,
                            row.get::<_, String>(1)?,
                            read_timestamp(row, 2)?,
                        ))
                    },
                )
                .optional()?)
        })?;

        Ok(match row {
            Some((content, updated_by, updated_at)) => GlobalNote {
                id: GLOBAL_NOTE_ID.to_string(),
                content,
                updated_by,
                updated_at,
            },
            None => GlobalNote::empty(),
        })
    }

    fn save(&self, content: &str, updated_by: &str) -> Result<GlobalNote> {
        let saved = GlobalNote::new(content, updated_by, Utc::now());
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO global_note (id, content, updated_by, updated_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(id) DO UPDATE SET
                 content = excluded.content,
                 updated_by = excluded.updated_by,
                 updated_at = excluded.updated_at",
                params![
                    saved.id,
                    saved.content,
                    saved.updated_by,
                    saved.updated_at.map(|at| at.to_rfc3339()),
                ],
            )?;
            Ok(())
        })?;
        Ok(saved)
    }
}

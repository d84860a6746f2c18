//! Note repository implementation

#![allow(clippy::cast_possible_wrap)] // SQLite uses i64 for LIMIT

use rusqlite::{params, Connection};

use crate::models::{Note, NoteId};
use crate::util::modification_instant;
use crate::Result;

const NOTE_COLUMNS: &str =
    "id, text, creation_date, modification_date, sort_order, not_deleted, not_archived, pinned";

/// `SQLite` access to the notes table
pub struct SqliteNoteRepository<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteNoteRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Parse a note from a database row
    fn parse_note(row: &rusqlite::Row<'_>) -> rusqlite::Result<Note> {
        let id: String = row.get(0)?;
        Ok(Note {
            id: NoteId::from(id.as_str()),
            text: row.get(1)?,
            creation_date: row.get(2)?,
            modification_date: row.get(3)?,
            order: row.get(4)?,
            not_deleted: row.get(5)?,
            not_archived: row.get(6)?,
            pinned: row.get(7)?,
        })
    }

    /// Get a note by id, tombstones included
    pub fn get(&self, id: &NoteId) -> Result<Option<Note>> {
        let result = self.conn.query_row(
            &format!("SELECT {NOTE_COLUMNS} FROM notes WHERE id = ?"),
            params![id.as_str()],
            Self::parse_note,
        );

        match result {
            Ok(note) => Ok(Some(note)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Insert or replace a note unless the stored copy is newer.
    ///
    /// Dates are compared as instants when both parse, as text otherwise.
    /// Returns `false` when the write was dropped as stale.
    pub fn upsert(&self, note: &Note) -> Result<bool> {
        let rows = self.conn.execute(
            "INSERT INTO notes (
                id, text, creation_date, modification_date, modified_at_us,
                sort_order, not_deleted, not_archived, pinned
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             ON CONFLICT(id) DO UPDATE SET
                text = excluded.text,
                creation_date = excluded.creation_date,
                modification_date = excluded.modification_date,
                modified_at_us = excluded.modified_at_us,
                sort_order = excluded.sort_order,
                not_deleted = excluded.not_deleted,
                not_archived = excluded.not_archived,
                pinned = excluded.pinned
             WHERE CASE
                WHEN excluded.modified_at_us IS NOT NULL AND notes.modified_at_us IS NOT NULL
                    THEN excluded.modified_at_us >= notes.modified_at_us
                ELSE excluded.modification_date >= notes.modification_date
             END",
            params![
                note.id.as_str(),
                note.text,
                note.creation_date,
                note.modification_date,
                modification_instant(&note.modification_date),
                note.order,
                note.not_deleted,
                note.not_archived,
                note.pinned,
            ],
        )?;

        Ok(rows > 0)
    }

    /// Notes that are not deleted, pinned first then highest order first
    pub fn list(&self, include_archived: bool) -> Result<Vec<Note>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {NOTE_COLUMNS}
             FROM notes
             WHERE not_deleted != 0 AND (?1 OR not_archived != 0)
             ORDER BY pinned != 0 DESC, sort_order DESC, id"
        ))?;

        let notes = stmt
            .query_map(params![include_archived], Self::parse_note)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(notes)
    }

    /// Ids starting with `prefix` (ASCII case-insensitive), at most `limit`
    pub fn ids_by_prefix(&self, prefix: &str, limit: usize) -> Result<Vec<NoteId>> {
        let mut stmt = self.conn.prepare(
            r"SELECT id FROM notes
              WHERE id LIKE ?1 || '%' ESCAPE '\'
              ORDER BY id
              LIMIT ?2",
        )?;

        let ids = stmt
            .query_map(params![escape_like(prefix), limit as i64], |row| {
                row.get::<_, String>(0)
            })?
            .map(|id| id.map(|id| NoteId::from(id.as_str())))
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(ids)
    }
}

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

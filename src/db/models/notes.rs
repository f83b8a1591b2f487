//! Note database operations
//!
//! The ownership rule lives in the queries: slug-keyed lookups are always
//! keyed by `(slug, author_id)` and return `None` for a non-owner, so a
//! foreign note is indistinguishable from a missing one.

use chrono::Utc;
use rusqlite::{OptionalExtension, Result as SqliteResult, Row};

use super::super::Database;
use crate::models::Note;

fn row_to_note(row: &Row) -> rusqlite::Result<Note> {
    let created_at_str: String = row.get(5)?;

    Ok(Note {
        id: row.get(0)?,
        title: row.get(1)?,
        text: row.get(2)?,
        slug: row.get(3)?,
        author_id: row.get(4)?,
        created_at: chrono::DateTime::parse_from_rfc3339(&created_at_str)
            .unwrap()
            .with_timezone(&Utc),
    })
}

impl Database {
    /// Insert a note. The slug must already have passed the uniqueness check.
    pub fn create_note(
        &self,
        title: &str,
        text: &str,
        slug: &str,
        author_id: i64,
    ) -> SqliteResult<Note> {
        let conn = self.conn.lock().unwrap();
        let created_at = Utc::now();

        conn.execute(
            "INSERT INTO notes (title, text, slug, author_id, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![title, text, slug, author_id, &created_at.to_rfc3339()],
        )?;

        let id = conn.last_insert_rowid();

        Ok(Note {
            id,
            title: title.to_string(),
            text: text.to_string(),
            slug: slug.to_string(),
            author_id,
            created_at,
        })
    }

    /// Slug-keyed lookup scoped to the requesting user. Returns `None` both
    /// for a missing slug and for someone else's note.
    pub fn get_note_for_author(&self, slug: &str, author_id: i64) -> SqliteResult<Option<Note>> {
        let conn = self.conn.lock().unwrap();

        conn.prepare(
            "SELECT id, title, text, slug, author_id, created_at FROM notes
             WHERE slug = ?1 AND author_id = ?2",
        )?
        .query_row(rusqlite::params![slug, author_id], row_to_note)
        .optional()
    }

    /// All notes owned by a user, in creation order (ascending id).
    pub fn list_notes_for_author(&self, author_id: i64) -> SqliteResult<Vec<Note>> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn.prepare(
            "SELECT id, title, text, slug, author_id, created_at FROM notes
             WHERE author_id = ?1 ORDER BY id ASC",
        )?;

        let notes = stmt
            .query_map([author_id], row_to_note)?
            .collect::<rusqlite::Result<Vec<Note>>>()?;

        Ok(notes)
    }

    /// Overwrite title/text/slug of an existing note. Id and author stay as
    /// they are; authorship never transfers.
    pub fn update_note(&self, id: i64, title: &str, text: &str, slug: &str) -> SqliteResult<bool> {
        let conn = self.conn.lock().unwrap();

        let rows_affected = conn.execute(
            "UPDATE notes SET title = ?1, text = ?2, slug = ?3 WHERE id = ?4",
            rusqlite::params![title, text, slug, id],
        )?;

        Ok(rows_affected > 0)
    }

    pub fn delete_note(&self, id: i64) -> SqliteResult<bool> {
        let conn = self.conn.lock().unwrap();
        let rows_affected = conn.execute("DELETE FROM notes WHERE id = ?1", [id])?;
        Ok(rows_affected > 0)
    }

    /// Whether a slug is already taken, optionally ignoring the note under
    /// edit so a note can keep its own slug.
    pub fn slug_in_use(&self, slug: &str, exclude_id: Option<i64>) -> SqliteResult<bool> {
        let conn = self.conn.lock().unwrap();

        let count: i64 = match exclude_id {
            Some(id) => conn.query_row(
                "SELECT COUNT(*) FROM notes WHERE slug = ?1 AND id != ?2",
                rusqlite::params![slug, id],
                |row| row.get(0),
            )?,
            None => conn.query_row(
                "SELECT COUNT(*) FROM notes WHERE slug = ?1",
                [slug],
                |row| row.get(0),
            )?,
        };

        Ok(count > 0)
    }

    pub fn count_notes(&self) -> SqliteResult<i64> {
        let conn = self.conn.lock().unwrap();
        conn.query_row("SELECT COUNT(*) FROM notes", [], |row| row.get(0))
    }
}

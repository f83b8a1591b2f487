//! Note form: validates a submitted title/text/slug before any write.

use serde::Deserialize;

use crate::db::Database;
use crate::notes::slug;

/// Suffix appended to a conflicting slug in the validation message.
pub const WARNING: &str = " - this slug is already in use, please choose a unique value.";

/// Client-submitted note fields. `slug` may be empty, in which case it is
/// derived from the title.
#[derive(Debug, Clone, Deserialize)]
pub struct NoteForm {
    pub title: String,
    pub text: String,
    #[serde(default)]
    pub slug: String,
}

/// Validated fields, ready to persist.
#[derive(Debug, Clone)]
pub struct CleanedNote {
    pub title: String,
    pub text: String,
    pub slug: String,
}

/// Validation failure attached to a single form field.
#[derive(Debug, Clone)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug)]
pub enum FormError {
    /// The resolved slug collides with another note's slug.
    Invalid(FieldError),
    Db(rusqlite::Error),
}

impl From<rusqlite::Error> for FormError {
    fn from(e: rusqlite::Error) -> Self {
        FormError::Db(e)
    }
}

impl NoteForm {
    /// Run the slug policy and the uniqueness check. `editing` carries the id
    /// of the note being edited so it may keep its own slug. Nothing is
    /// written here; persistence happens only after a clean result.
    pub fn clean(&self, db: &Database, editing: Option<i64>) -> Result<CleanedNote, FormError> {
        let resolved = slug::resolve(&self.slug, &self.title);

        if db.slug_in_use(&resolved, editing)? {
            return Err(FormError::Invalid(FieldError {
                field: "slug",
                message: format!("{}{}", resolved, WARNING),
            }));
        }

        Ok(CleanedNote {
            title: self.title.clone(),
            text: self.text.clone(),
            slug: resolved,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(title: &str, text: &str, slug: &str) -> NoteForm {
        NoteForm {
            title: title.to_string(),
            text: text.to_string(),
            slug: slug.to_string(),
        }
    }

    #[test]
    fn test_clean_accepts_fresh_slug() {
        let db = Database::open_in_memory().unwrap();
        let cleaned = form("Заметка", "Просто текст", "test_slug")
            .clean(&db, None)
            .unwrap();
        assert_eq!(cleaned.slug, "test_slug");
    }

    #[test]
    fn test_clean_fills_in_missing_slug() {
        let db = Database::open_in_memory().unwrap();
        let cleaned = form("Заметка", "Просто текст", "").clean(&db, None).unwrap();
        assert_eq!(cleaned.slug, "zametka");
    }

    #[test]
    fn test_clean_rejects_duplicate_slug() {
        let db = Database::open_in_memory().unwrap();
        let author = db.create_user("alice", "digest").unwrap().id;
        db.create_note("Заметка", "Просто текст", "test_slug", author)
            .unwrap();

        let err = form("Другая", "текст", "test_slug").clean(&db, None);
        match err {
            Err(FormError::Invalid(field_error)) => {
                assert_eq!(field_error.field, "slug");
                assert_eq!(field_error.message, format!("test_slug{}", WARNING));
            }
            other => panic!("expected slug validation error, got {:?}", other.map(|c| c.slug)),
        }
    }

    #[test]
    fn test_clean_allows_own_slug_while_editing() {
        let db = Database::open_in_memory().unwrap();
        let author = db.create_user("alice", "digest").unwrap().id;
        let note = db
            .create_note("Заметка", "Просто текст", "test_slug", author)
            .unwrap();

        let cleaned = form("Заметка", "Новый текст", "test_slug")
            .clean(&db, Some(note.id))
            .unwrap();
        assert_eq!(cleaned.slug, "test_slug");
    }
}

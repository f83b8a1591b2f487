//! SQLite connection wrapper and schema setup.
//!
//! A single connection behind a mutex is plenty for this service; every
//! write is a single-row statement and SQLite handles the atomicity.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{Connection, Result as SqliteResult};

pub struct Database {
    pub(super) conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) the database file and ensure the schema exists.
    pub fn new(db_path: &str) -> SqliteResult<Self> {
        if let Some(parent) = Path::new(db_path).parent() {
            std::fs::create_dir_all(parent).ok();
        }

        let conn = Connection::open(db_path)?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.create_tables()?;
        Ok(db)
    }

    /// In-memory database for tests.
    pub fn open_in_memory() -> SqliteResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.create_tables()?;
        Ok(db)
    }

    fn create_tables(&self) -> SqliteResult<()> {
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS auth_sessions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                token TEXT NOT NULL UNIQUE,
                user_id INTEGER NOT NULL REFERENCES users(id),
                created_at TEXT NOT NULL,
                expires_at TEXT NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS notes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                text TEXT NOT NULL,
                slug TEXT NOT NULL UNIQUE,
                author_id INTEGER NOT NULL REFERENCES users(id),
                created_at TEXT NOT NULL
            )",
            [],
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("notes.db");
        let db_path = db_path.to_str().unwrap();

        {
            let db = Database::new(db_path).unwrap();
            let user = db.create_user("alice", "digest").unwrap();
            db.create_note("Title", "Body", "title", user.id).unwrap();
        }

        let db = Database::new(db_path).unwrap();
        assert_eq!(db.count_notes().unwrap(), 1);
        assert!(db.get_user_by_username("alice").unwrap().is_some());
    }

    #[test]
    fn test_new_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("nested").join("notes.db");
        assert!(Database::new(db_path.to_str().unwrap()).is_ok());
    }
}

//! User database operations

use chrono::Utc;
use rusqlite::{OptionalExtension, Result as SqliteResult, Row};

use super::super::Database;
use crate::models::User;

fn row_to_user(row: &Row) -> rusqlite::Result<User> {
    let created_at_str: String = row.get(3)?;

    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        password_hash: row.get(2)?,
        created_at: chrono::DateTime::parse_from_rfc3339(&created_at_str)
            .unwrap()
            .with_timezone(&Utc),
    })
}

impl Database {
    /// Create a user account. Fails on a duplicate username (UNIQUE constraint).
    pub fn create_user(&self, username: &str, password_hash: &str) -> SqliteResult<User> {
        let conn = self.conn.lock().unwrap();
        let created_at = Utc::now();

        conn.execute(
            "INSERT INTO users (username, password_hash, created_at) VALUES (?1, ?2, ?3)",
            [username, password_hash, &created_at.to_rfc3339()],
        )?;

        let id = conn.last_insert_rowid();

        Ok(User {
            id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at,
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> SqliteResult<Option<User>> {
        let conn = self.conn.lock().unwrap();

        conn.prepare(
            "SELECT id, username, password_hash, created_at FROM users WHERE username = ?1",
        )?
        .query_row([username], row_to_user)
        .optional()
    }

    pub fn get_user(&self, id: i64) -> SqliteResult<Option<User>> {
        let conn = self.conn.lock().unwrap();

        conn.prepare("SELECT id, username, password_hash, created_at FROM users WHERE id = ?1")?
            .query_row([id], row_to_user)
            .optional()
    }
}

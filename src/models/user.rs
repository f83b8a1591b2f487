use chrono::{DateTime, Utc};
use serde::Serialize;

/// Registered account. Only ever exposed without the password digest.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

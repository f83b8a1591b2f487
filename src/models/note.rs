use chrono::{DateTime, Utc};
use serde::Serialize;

/// A note owned by exactly one user, addressed by its unique slug.
#[derive(Debug, Clone, Serialize)]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub text: String,
    pub slug: String,
    pub author_id: i64,
    pub created_at: DateTime<Utc>,
}

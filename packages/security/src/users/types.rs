// ABOUTME: User type definitions
// ABOUTME: Account owning auth tokens and loyalty cards

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

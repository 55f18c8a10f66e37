// ABOUTME: User storage layer using SQLite
// ABOUTME: Creates and looks up the accounts that own tokens and cards

use catima_storage::StorageError;
use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::debug;

use super::types::User;

pub struct UserStorage {
    pool: SqlitePool,
}

impl UserStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a user; surrounding whitespace is trimmed from the name
    pub async fn create_user(&self, username: &str) -> Result<User, StorageError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(StorageError::InvalidData(
                "username must not be empty".to_string(),
            ));
        }
        debug!("Creating user: {}", username);

        let created_at = Utc::now();
        let result = sqlx::query("INSERT INTO users (username, created_at) VALUES (?, ?)")
            .bind(username)
            .bind(created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::from_insert(e, format!("user {username}")))?;

        self.get_user(result.last_insert_rowid())
            .await?
            .ok_or_else(|| StorageError::NotFound(format!("user {username}")))
    }

    pub async fn get_user(&self, user_id: i64) -> Result<Option<User>, StorageError> {
        debug!("Fetching user: {}", user_id);

        let row = sqlx::query("SELECT id, username, created_at FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, StorageError> {
        let row = sqlx::query("SELECT id, username, created_at FROM users WHERE username = ?")
            .bind(username.trim())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    pub async fn list_users(&self) -> Result<Vec<User>, StorageError> {
        let rows = sqlx::query("SELECT id, username, created_at FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(Self::row_to_user).collect()
    }

    fn row_to_user(row: &SqliteRow) -> Result<User, StorageError> {
        Ok(User {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

// ABOUTME: Keyed record store for auth tokens
// ABOUTME: Async trait seam plus the SQLite implementation

use async_trait::async_trait;
use catima_storage::StorageError;
use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

use super::types::AuthToken;

#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn get_token(&self, token_name: &str) -> Result<Option<AuthToken>, StorageError>;

    /// Persist a freshly generated token. Fails with
    /// [`StorageError::Duplicate`] if the name is taken.
    async fn insert_token(&self, token: &AuthToken) -> Result<(), StorageError>;

    /// Replace the stored digest of an existing token
    async fn update_secret(&self, token_name: &str, token_secret: &str) -> Result<(), StorageError>;

    async fn touch_last_used(&self, token_name: &str, at: DateTime<Utc>) -> Result<(), StorageError>;

    async fn list_tokens_for_user(&self, user_id: i64) -> Result<Vec<AuthToken>, StorageError>;

    /// Returns whether a token was removed
    async fn delete_token(&self, token_name: &str) -> Result<bool, StorageError>;
}

pub struct SqliteTokenStore {
    pool: SqlitePool,
}

impl SqliteTokenStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_token(row: &SqliteRow) -> Result<AuthToken, StorageError> {
        Ok(AuthToken {
            token_name: row.try_get("token_name")?,
            token_secret: row.try_get("token_secret")?,
            user_id: row.try_get("user_id")?,
            device_name: row.try_get("device_name")?,
            last_used: row.try_get("last_used")?,
        })
    }
}

#[async_trait]
impl TokenStore for SqliteTokenStore {
    async fn get_token(&self, token_name: &str) -> Result<Option<AuthToken>, StorageError> {
        let row = sqlx::query(
            "SELECT token_name, token_secret, user_id, device_name, last_used
             FROM auth_tokens
             WHERE token_name = ?",
        )
        .bind(token_name)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::row_to_token).transpose()
    }

    async fn insert_token(&self, token: &AuthToken) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO auth_tokens (token_name, token_secret, user_id, device_name, last_used)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&token.token_name)
        .bind(&token.token_secret)
        .bind(token.user_id)
        .bind(token.device_name.as_deref())
        .bind(token.last_used)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::from_insert(e, format!("token {}", token.token_name)))?;

        Ok(())
    }

    async fn update_secret(&self, token_name: &str, token_secret: &str) -> Result<(), StorageError> {
        let result = sqlx::query("UPDATE auth_tokens SET token_secret = ? WHERE token_name = ?")
            .bind(token_secret)
            .bind(token_name)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(format!("token {token_name}")));
        }
        Ok(())
    }

    async fn touch_last_used(&self, token_name: &str, at: DateTime<Utc>) -> Result<(), StorageError> {
        sqlx::query("UPDATE auth_tokens SET last_used = ? WHERE token_name = ?")
            .bind(at)
            .bind(token_name)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn list_tokens_for_user(&self, user_id: i64) -> Result<Vec<AuthToken>, StorageError> {
        let rows = sqlx::query(
            "SELECT token_name, token_secret, user_id, device_name, last_used
             FROM auth_tokens
             WHERE user_id = ?
             ORDER BY token_name",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_token).collect()
    }

    async fn delete_token(&self, token_name: &str) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM auth_tokens WHERE token_name = ?")
            .bind(token_name)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

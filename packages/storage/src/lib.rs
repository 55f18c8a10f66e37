// ABOUTME: Persistence layer for Catima Sync backed by SQLite
// ABOUTME: Connection setup, embedded migrations and the shared storage error type

use thiserror::Error;

pub mod cards;
pub mod db;

pub use cards::CardStorage;
pub use db::{connect, connect_in_memory};

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("Sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Duplicate entry: {0}")]
    Duplicate(String),
    #[error("Invalid stored data: {0}")]
    InvalidData(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

impl StorageError {
    /// Map unique-constraint violations to [`StorageError::Duplicate`]
    pub fn from_insert(err: sqlx::Error, what: impl Into<String>) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                StorageError::Duplicate(what.into())
            }
            _ => StorageError::Sqlx(err),
        }
    }
}

// ABOUTME: User management module
// ABOUTME: Provides the user type and its SQLite storage

pub mod storage;
pub mod types;

#[cfg(test)]
mod storage_test;

pub use storage::UserStorage;
pub use types::User;

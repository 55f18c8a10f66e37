use std::env;
use std::path::PathBuf;

/// File name of the SQLite database inside the data directory
pub const DATABASE_FILE: &str = "catima.db";

/// Get the path to the Catima Sync data directory (~/.catima-sync)
pub fn catima_dir() -> PathBuf {
    // First try HOME environment variable (useful for tests)
    if let Ok(home) = env::var("HOME") {
        PathBuf::from(home).join(".catima-sync")
    } else {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".catima-sync")
    }
}

/// Get the default database path (~/.catima-sync/catima.db)
pub fn default_database_path() -> PathBuf {
    catima_dir().join(DATABASE_FILE)
}

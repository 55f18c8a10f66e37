// ABOUTME: Runtime configuration loaded from environment variables
// ABOUTME: Listen address, database location, CORS origin and hashing cost

use std::env;
use std::num::ParseIntError;
use std::path::PathBuf;

use catima_core::default_database_path;
use catima_security::HashParams;
use thiserror::Error;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;

/// OWASP baseline for Argon2id: 19 MiB, 2 iterations, 1 lane
pub const DEFAULT_ARGON2_MEMORY_KIB: u32 = 19 * 1024;
pub const DEFAULT_ARGON2_ITERATIONS: u32 = 2;
pub const DEFAULT_ARGON2_PARALLELISM: u32 = 1;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid port number: {0}")]
    InvalidPort(#[from] ParseIntError),
    #[error("Port {0} is out of valid range (1-65535)")]
    PortOutOfRange(u16),
    #[error("Invalid value for {var}: {value:?}")]
    InvalidNumber { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_path: PathBuf,
    /// No CORS layer is installed when unset
    pub cors_origin: Option<String>,
    pub hash_params: HashParams,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var("CATIMA_HOST")
            .ok()
            .filter(|h| !h.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match env::var("PORT") {
            Ok(port_str) => port_str.trim().parse::<u16>()?,
            Err(_) => DEFAULT_PORT,
        };

        if port == 0 {
            return Err(ConfigError::PortOutOfRange(port));
        }

        let database_path = env::var("CATIMA_DATABASE_PATH")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_database_path);

        let cors_origin = env::var("CORS_ORIGIN")
            .ok()
            .filter(|origin| !origin.trim().is_empty());

        let hash_params = HashParams {
            memory_kib: env_u32("CATIMA_ARGON2_MEMORY_KIB", DEFAULT_ARGON2_MEMORY_KIB)?,
            iterations: env_u32("CATIMA_ARGON2_ITERATIONS", DEFAULT_ARGON2_ITERATIONS)?,
            parallelism: env_u32("CATIMA_ARGON2_PARALLELISM", DEFAULT_ARGON2_PARALLELISM)?,
        };

        Ok(Config {
            host,
            port,
            database_path,
            cors_origin,
            hash_params,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn env_u32(var: &'static str, default: u32) -> Result<u32, ConfigError> {
    match env::var(var) {
        Ok(value) => value
            .trim()
            .parse::<u32>()
            .map_err(|_| ConfigError::InvalidNumber { var, value }),
        Err(_) => Ok(default),
    }
}

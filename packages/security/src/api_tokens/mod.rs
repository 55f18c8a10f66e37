// ABOUTME: API token management module
// ABOUTME: Token generation, secret hashing, storage, and authentication

pub mod authenticator;
pub mod generator;
pub mod hasher;
pub mod store;
pub mod types;

pub use authenticator::{AuthError, TokenAuthenticator, TokenError};
pub use hasher::{Argon2Hasher, HashError, HashParams, LegacySha256Hasher, SecretHasher, Verification};
pub use store::{SqliteTokenStore, TokenStore};
pub use types::{AuthToken, IssuedToken};

// ABOUTME: Token authentication and user accounts for Catima Sync
// ABOUTME: Provides credential issuance, secret hashing, verification, and user storage

pub mod api_tokens;
pub mod users;

// Re-export main types for convenience
pub use api_tokens::{
    Argon2Hasher, AuthError, AuthToken, HashError, HashParams, IssuedToken, SecretHasher,
    SqliteTokenStore, TokenAuthenticator, TokenError, TokenStore, Verification,
};
pub use users::{User, UserStorage};

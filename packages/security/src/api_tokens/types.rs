// ABOUTME: Type definitions for API token authentication
// ABOUTME: Stored token record and the issuance result carrying the plaintext secret

use std::fmt;

use chrono::{DateTime, Utc};

/// A token used to authenticate a device against the API
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken {
    pub token_name: String,
    /// Hash of the secret, never the secret itself
    pub token_secret: String,
    pub user_id: i64,
    pub device_name: Option<String>,
    pub last_used: Option<DateTime<Utc>>,
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthToken")
            .field("token_name", &self.token_name)
            .field("token_secret", &"<redacted>")
            .field("user_id", &self.user_id)
            .field("device_name", &self.device_name)
            .field("last_used", &self.last_used)
            .finish()
    }
}

/// Token issuance result - includes plaintext secret for display
/// This is the ONLY time the plaintext secret is available
#[derive(Clone)]
pub struct IssuedToken {
    /// Not persisted yet
    pub token: AuthToken,
    pub secret: String,
}

impl fmt::Debug for IssuedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssuedToken")
            .field("token", &self.token)
            .field("secret", &"<redacted>")
            .finish()
    }
}

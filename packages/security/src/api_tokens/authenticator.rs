// ABOUTME: Token issuance and verification against the token store
// ABOUTME: Unknown names and wrong secrets collapse into the same outcome

use std::sync::Arc;

use catima_storage::StorageError;
use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::generator::{generate_name, generate_secret, random_string, NAME_LENGTH, SECRET_LENGTH};
use super::hasher::{HashError, SecretHasher};
use super::store::TokenStore;
use super::types::{AuthToken, IssuedToken};

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Invalid token name {0:?}: must be 1 to {max} characters", max = NAME_LENGTH)]
    InvalidName(String),

    #[error("Token secret must not be empty")]
    InvalidSecret,

    #[error(transparent)]
    Hash(#[from] HashError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("No X-Token-Username or X-Token-Secret provided")]
    CredentialMissing,

    #[error("Token authentication failed")]
    CredentialInvalid,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub struct TokenAuthenticator {
    store: Arc<dyn TokenStore>,
    hasher: Arc<dyn SecretHasher>,
    /// Verified against on unknown names so both failure paths do the same work
    dummy_digest: String,
}

impl TokenAuthenticator {
    pub fn new(store: Arc<dyn TokenStore>, hasher: Arc<dyn SecretHasher>) -> Result<Self, HashError> {
        let dummy_digest = hasher.hash(&random_string(SECRET_LENGTH))?;
        Ok(Self {
            store,
            hasher,
            dummy_digest,
        })
    }

    pub fn store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }

    /// Create an unsaved token for `user_id`
    ///
    /// The returned [`IssuedToken`] carries the only copy of the plaintext
    /// secret; the token itself holds its hash.
    pub fn generate(
        &self,
        user_id: i64,
        device_name: Option<&str>,
        name: Option<&str>,
        secret: Option<&str>,
    ) -> Result<IssuedToken, TokenError> {
        let token_name = match name {
            Some(name) if name.is_empty() || name.chars().count() > NAME_LENGTH => {
                return Err(TokenError::InvalidName(name.to_string()));
            }
            Some(name) => name.to_string(),
            None => generate_name(),
        };

        let secret = match secret {
            Some("") => return Err(TokenError::InvalidSecret),
            Some(secret) => secret.to_string(),
            None => generate_secret(),
        };

        let token_secret = self.hasher.hash(&secret)?;

        Ok(IssuedToken {
            token: AuthToken {
                token_name,
                token_secret,
                user_id,
                device_name: device_name.map(str::to_string),
                last_used: None,
            },
            secret,
        })
    }

    /// Generate a token and persist it
    pub async fn issue(
        &self,
        user_id: i64,
        device_name: Option<&str>,
        name: Option<&str>,
        secret: Option<&str>,
    ) -> Result<IssuedToken, TokenError> {
        let issued = self.generate(user_id, device_name, name, secret)?;
        self.store.insert_token(&issued.token).await?;

        info!(
            token_name = %issued.token.token_name,
            user_id,
            "Issued auth token"
        );
        Ok(issued)
    }

    /// Resolve a token by name and check the presented secret
    ///
    /// Returns `Ok(None)` both for an unknown name and for a wrong secret.
    pub async fn verify(
        &self,
        token_name: &str,
        secret: &str,
    ) -> Result<Option<AuthToken>, StorageError> {
        let Some(mut token) = self.store.get_token(token_name).await? else {
            let _ = self.hasher.verify(secret, &self.dummy_digest);
            debug!(token_name, "Unknown token name");
            return Ok(None);
        };

        let verification = self.hasher.verify(secret, &token.token_secret);
        if !verification.matches {
            return Ok(None);
        }

        if verification.should_upgrade {
            self.upgrade_secret(&mut token, secret).await;
        }

        let now = Utc::now();
        match self.store.touch_last_used(&token.token_name, now).await {
            Ok(()) => token.last_used = Some(now),
            Err(e) => warn!(
                token_name = %token.token_name,
                error = %e,
                "Failed to update token last_used"
            ),
        }

        Ok(Some(token))
    }

    async fn upgrade_secret(&self, token: &mut AuthToken, secret: &str) {
        let digest = match self.hasher.hash(secret) {
            Ok(digest) => digest,
            Err(e) => {
                warn!(token_name = %token.token_name, error = %e, "Failed to re-hash token secret");
                return;
            }
        };

        match self.store.update_secret(&token.token_name, &digest).await {
            Ok(()) => {
                debug!(token_name = %token.token_name, "Upgraded token secret hash");
                token.token_secret = digest;
            }
            Err(e) => warn!(
                token_name = %token.token_name,
                error = %e,
                "Failed to persist upgraded token secret hash"
            ),
        }
    }

    /// Credential check used by the request gate
    pub async fn authenticate(
        &self,
        name: Option<&str>,
        secret: Option<&str>,
    ) -> Result<AuthToken, AuthError> {
        let (Some(name), Some(secret)) = (name, secret) else {
            return Err(AuthError::CredentialMissing);
        };
        if name.is_empty() || secret.is_empty() {
            return Err(AuthError::CredentialMissing);
        }

        match self.verify(name, secret).await? {
            Some(token) => Ok(token),
            None => {
                warn!(token_name = name, "Token authentication failed");
                Err(AuthError::CredentialInvalid)
            }
        }
    }
}

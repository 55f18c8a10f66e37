// ABOUTME: Secret hashing capability with a needs-upgrade signal
// ABOUTME: Argon2id for new digests, salted SHA-256 legacy digests still verify

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use thiserror::Error;
use tracing::debug;

use super::generator::random_string;

/// Prefix of digests produced by the previous SHA-256 scheme
pub const LEGACY_SHA256_PREFIX: &str = "sha256$";

const LEGACY_SALT_LENGTH: usize = 16;

#[derive(Debug, Error)]
pub enum HashError {
    #[error("Invalid hash parameters: {0}")]
    InvalidParams(String),

    #[error("Failed to hash secret: {0}")]
    Hashing(String),
}

/// Outcome of checking a secret against a stored digest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verification {
    pub matches: bool,
    /// The digest is valid but uses an outdated scheme or cost
    pub should_upgrade: bool,
}

impl Verification {
    pub const REJECTED: Verification = Verification {
        matches: false,
        should_upgrade: false,
    };
}

pub trait SecretHasher: Send + Sync {
    fn hash(&self, secret: &str) -> Result<String, HashError>;

    /// Compare in constant time with respect to the secret's content
    fn verify(&self, secret: &str, digest: &str) -> Verification;
}

/// Argon2id cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashParams {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashParams {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

pub struct Argon2Hasher {
    argon2: Argon2<'static>,
    params: Params,
}

impl Argon2Hasher {
    pub fn new(params: HashParams) -> Result<Self, HashError> {
        let params = Params::new(params.memory_kib, params.iterations, params.parallelism, None)
            .map_err(|e| HashError::InvalidParams(e.to_string()))?;
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params.clone());
        Ok(Self { argon2, params })
    }

    fn is_outdated(&self, parsed: &PasswordHash<'_>) -> bool {
        if parsed.algorithm != Algorithm::Argon2id.ident() {
            return true;
        }
        if parsed.version != Some(Version::V0x13.into()) {
            return true;
        }
        match Params::try_from(parsed) {
            Ok(stored) => {
                stored.m_cost() != self.params.m_cost()
                    || stored.t_cost() != self.params.t_cost()
                    || stored.p_cost() != self.params.p_cost()
            }
            Err(_) => true,
        }
    }
}

impl SecretHasher for Argon2Hasher {
    fn hash(&self, secret: &str) -> Result<String, HashError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(secret.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| HashError::Hashing(e.to_string()))
    }

    fn verify(&self, secret: &str, digest: &str) -> Verification {
        if digest.starts_with(LEGACY_SHA256_PREFIX) {
            let legacy = LegacySha256Hasher.verify(secret, digest);
            return Verification {
                matches: legacy.matches,
                should_upgrade: legacy.matches,
            };
        }

        let parsed = match PasswordHash::new(digest) {
            Ok(parsed) => parsed,
            Err(e) => {
                debug!(error = %e, "Stored digest is not a valid PHC string");
                return Verification::REJECTED;
            }
        };

        // Uses the algorithm and cost recorded in the digest; the output
        // comparison is constant-time
        if self.argon2.verify_password(secret.as_bytes(), &parsed).is_err() {
            return Verification::REJECTED;
        }

        Verification {
            matches: true,
            should_upgrade: self.is_outdated(&parsed),
        }
    }
}

/// Salted SHA-256 digests, `sha256$<salt>$<hex>`
///
/// Only kept so that tokens issued before the switch to Argon2 keep
/// working; [`Argon2Hasher`] upgrades them on first use.
pub struct LegacySha256Hasher;

impl LegacySha256Hasher {
    fn digest_hex(salt: &str, secret: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(salt.as_bytes());
        hasher.update(secret.as_bytes());
        hex::encode(hasher.finalize())
    }
}

impl SecretHasher for LegacySha256Hasher {
    fn hash(&self, secret: &str) -> Result<String, HashError> {
        let salt = random_string(LEGACY_SALT_LENGTH);
        let hex = Self::digest_hex(&salt, secret);
        Ok(format!("{LEGACY_SHA256_PREFIX}{salt}${hex}"))
    }

    fn verify(&self, secret: &str, digest: &str) -> Verification {
        let Some((salt, stored_hex)) = digest
            .strip_prefix(LEGACY_SHA256_PREFIX)
            .and_then(|rest| rest.split_once('$'))
        else {
            return Verification::REJECTED;
        };

        let computed = Self::digest_hex(salt, secret);
        let matches: bool = computed.as_bytes().ct_eq(stored_hex.as_bytes()).into();
        Verification {
            matches,
            should_upgrade: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Cheap parameters so tests stay fast
    fn test_params() -> HashParams {
        HashParams {
            memory_kib: 64,
            iterations: 1,
            parallelism: 1,
        }
    }

    fn hasher() -> Argon2Hasher {
        Argon2Hasher::new(test_params()).unwrap()
    }

    #[test]
    fn test_hash_is_salted_argon2id() {
        let hasher = hasher();
        let first = hasher.hash("secret").unwrap();
        let second = hasher.hash("secret").unwrap();

        assert!(first.starts_with("$argon2id$v=19$m=64,t=1,p=1$"));
        assert_ne!(first, second);
        assert!(first.len() <= super::super::generator::HASHED_SECRET_MAX_LENGTH);
    }

    #[test]
    fn test_verify_accepts_correct_secret() {
        let hasher = hasher();
        let digest = hasher.hash("correct horse").unwrap();

        assert_eq!(
            hasher.verify("correct horse", &digest),
            Verification {
                matches: true,
                should_upgrade: false,
            }
        );
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let hasher = hasher();
        let digest = hasher.hash("correct horse").unwrap();

        assert_eq!(hasher.verify("correct horsex", &digest), Verification::REJECTED);
        assert_eq!(hasher.verify("", &digest), Verification::REJECTED);
    }

    #[test]
    fn test_verify_rejects_malformed_digest() {
        let hasher = hasher();
        assert_eq!(hasher.verify("secret", "secret"), Verification::REJECTED);
        assert_eq!(hasher.verify("secret", ""), Verification::REJECTED);
        assert_eq!(hasher.verify("secret", "sha256$nodollar"), Verification::REJECTED);
    }

    #[test]
    fn test_weaker_params_request_upgrade() {
        let weak = hasher();
        let digest = weak.hash("secret").unwrap();

        let stronger = Argon2Hasher::new(HashParams {
            memory_kib: 128,
            iterations: 2,
            parallelism: 1,
        })
        .unwrap();

        assert_eq!(
            stronger.verify("secret", &digest),
            Verification {
                matches: true,
                should_upgrade: true,
            }
        );
    }

    #[test]
    fn test_other_argon2_variant_requests_upgrade() {
        let params = Params::new(64, 1, 1, None).unwrap();
        let argon2i = Argon2::new(Algorithm::Argon2i, Version::V0x13, params);
        let salt = SaltString::generate(&mut OsRng);
        let digest = argon2i
            .hash_password(b"secret", &salt)
            .unwrap()
            .to_string();

        let verification = hasher().verify("secret", &digest);
        assert!(verification.matches);
        assert!(verification.should_upgrade);
    }

    #[test]
    fn test_legacy_digest_verifies_and_requests_upgrade() {
        let digest = LegacySha256Hasher.hash("secret").unwrap();
        assert!(digest.starts_with(LEGACY_SHA256_PREFIX));

        let hasher = hasher();
        assert_eq!(
            hasher.verify("secret", &digest),
            Verification {
                matches: true,
                should_upgrade: true,
            }
        );
        assert_eq!(hasher.verify("secreT", &digest), Verification::REJECTED);
    }

    #[test]
    fn test_invalid_params_are_rejected() {
        let result = Argon2Hasher::new(HashParams {
            memory_kib: 1,
            iterations: 0,
            parallelism: 1,
        });
        assert!(matches!(result, Err(HashError::InvalidParams(_))));
    }
}

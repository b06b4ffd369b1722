//! Password hashing
//!
//! New digests use the configured algorithm (bcrypt by default, argon2id
//! optionally). Verification reads the algorithm off the digest itself, so
//! switching algorithms keeps existing accounts working.
//!
//! # Performance Considerations
//!
//! Both algorithms are intentionally CPU-intensive. Request handlers use the
//! `_async` variants, which run on the blocking thread pool.

use crate::config::{PasswordAlgorithm, PasswordConfig};
use anyhow::Result;
use argon2::{
    password_hash::{
        self, rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
    },
    Argon2,
};
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Plaintext behind the decoy digest; no account can own it
const DECOY_PASSWORD: &str = "decoy-digest-for-unknown-accounts";

/// Password hashing service
///
/// Cloning is cheap; clones share the lazily built decoy digest.
#[derive(Debug, Clone)]
pub struct PasswordService {
    algorithm: PasswordAlgorithm,
    bcrypt_cost: u32,
    decoy: Arc<OnceCell<String>>,
}

impl PasswordService {
    pub fn new(config: &PasswordConfig) -> Self {
        Self {
            algorithm: config.algorithm,
            bcrypt_cost: config.bcrypt_cost,
            decoy: Arc::new(OnceCell::new()),
        }
    }

    /// Hash a password (blocking operation)
    ///
    /// Fails only when the digest cannot be computed, e.g. an out of range
    /// cost or an entropy failure.
    pub fn hash(&self, password: &str) -> Result<String> {
        match self.algorithm {
            PasswordAlgorithm::Bcrypt => bcrypt::hash(password, self.bcrypt_cost)
                .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e)),
            PasswordAlgorithm::Argon2 => {
                let salt = SaltString::generate(&mut OsRng);
                let hash = Argon2::default()
                    .hash_password(password.as_bytes(), &salt)
                    .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;
                Ok(hash.to_string())
            }
        }
    }

    /// Verify a password against a digest (blocking operation)
    ///
    /// `Ok(false)` means the password did not match. `Err` means the digest
    /// could not be checked at all.
    pub fn verify(password: &str, digest: &str) -> Result<bool> {
        if digest.starts_with("$argon2") {
            let parsed = PasswordHash::new(digest)
                .map_err(|e| anyhow::anyhow!("Invalid hash format: {}", e))?;
            if parsed.salt.is_none() || parsed.hash.is_none() {
                anyhow::bail!("Invalid hash format: digest has no salt or hash");
            }
            match Argon2::default().verify_password(password.as_bytes(), &parsed) {
                Ok(()) => Ok(true),
                Err(password_hash::Error::Password) => Ok(false),
                Err(e) => Err(anyhow::anyhow!("Failed to verify password: {}", e)),
            }
        } else {
            bcrypt::verify(password, digest)
                .map_err(|e| anyhow::anyhow!("Invalid hash format: {}", e))
        }
    }

    /// Hash a password on the blocking thread pool
    pub async fn hash_async(&self, password: String) -> Result<String> {
        let service = self.clone();
        tokio::task::spawn_blocking(move || service.hash(&password))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error: {}", e))?
    }

    /// Spend one verification on a digest no account owns
    ///
    /// Sign-in calls this for unknown emails so they take as long as a
    /// wrong password. The decoy is hashed with the configured algorithm on
    /// first use.
    pub async fn verify_decoy(&self, password: String) -> Result<()> {
        let digest = self
            .decoy
            .get_or_try_init(|| self.hash_async(DECOY_PASSWORD.to_string()))
            .await?
            .clone();

        Self::verify_async(password, digest).await?;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn decoy_digest(&self) -> Option<&str> {
        self.decoy.get().map(String::as_str)
    }

    /// Verify a password on the blocking thread pool
    pub async fn verify_async(password: String, digest: String) -> Result<bool> {
        tokio::task::spawn_blocking(move || Self::verify(&password, &digest))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error: {}", e))?
    }
}

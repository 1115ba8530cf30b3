//! Argon2id implementation of the `PasswordHasher` port.
//!
//! Hashing is deliberately slow, so both operations run on the blocking
//! thread pool with the request trace id carried across.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    Error as PhcError, PasswordHash as PhcString, PasswordHasher as _, PasswordVerifier as _,
    SaltString,
};
use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::domain::ports::{PasswordHashError, PasswordHasher};
use crate::domain::{PasswordHash, TraceId};

/// Argon2id hasher producing PHC strings (`$argon2id$v=19$...`).
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2PasswordHasher;

impl Argon2PasswordHasher {
    /// Create a hasher with the crate's default Argon2id parameters.
    pub fn new() -> Self {
        Self
    }
}

fn hash_blocking(password: &[u8]) -> Result<PasswordHash, PasswordHashError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password, &salt)
        .map(|hash| PasswordHash::new(hash.to_string()))
        .map_err(|err| PasswordHashError::hashing(err.to_string()))
}

fn verify_blocking(password: &[u8], encoded: &str) -> Result<bool, PasswordHashError> {
    let parsed =
        PhcString::new(encoded).map_err(|err| PasswordHashError::malformed_hash(err.to_string()))?;
    match Argon2::default().verify_password(password, &parsed) {
        Ok(()) => Ok(true),
        Err(PhcError::Password) => Ok(false),
        Err(err) => Err(PasswordHashError::hashing(err.to_string())),
    }
}

#[async_trait]
impl PasswordHasher for Argon2PasswordHasher {
    async fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHashError> {
        let password = Zeroizing::new(password.as_bytes().to_vec());
        TraceId::spawn_blocking(move || hash_blocking(&password))
            .await
            .map_err(|err| PasswordHashError::hashing(err.to_string()))?
    }

    async fn verify(
        &self,
        password: &str,
        hash: &PasswordHash,
    ) -> Result<bool, PasswordHashError> {
        let password = Zeroizing::new(password.as_bytes().to_vec());
        let encoded = hash.as_str().to_owned();
        TraceId::spawn_blocking(move || verify_blocking(&password, &encoded))
            .await
            .map_err(|err| PasswordHashError::hashing(err.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for Argon2 hashing.
    use super::*;

    #[tokio::test]
    async fn hashes_verify_against_original_password() {
        let hasher = Argon2PasswordHasher::new();
        let hash = hasher.hash("correct horse").await.expect("hash");

        assert!(hash.as_str().starts_with("$argon2id$"));
        assert!(hasher.verify("correct horse", &hash).await.expect("verify"));
        assert!(!hasher.verify("battery staple", &hash).await.expect("verify"));
    }

    #[tokio::test]
    async fn salts_differ_between_hashes() {
        let hasher = Argon2PasswordHasher::new();
        let first = hasher.hash("same").await.expect("hash");
        let second = hasher.hash("same").await.expect("hash");
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn malformed_hashes_are_reported() {
        let error = Argon2PasswordHasher::new()
            .verify("anything", &PasswordHash::new("plain-text"))
            .await
            .expect_err("malformed");
        assert!(matches!(error, PasswordHashError::MalformedHash { .. }));
    }
}

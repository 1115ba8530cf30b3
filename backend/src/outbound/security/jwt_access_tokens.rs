//! HS256 JSON Web Token implementation of the `AccessTokens` port.
//!
//! Claims are `{sub, role, iat, exp}` with `exp = iat + ttl`. Verification
//! checks the signature and expiry with no leeway.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::ports::{AccessTokenError, AccessTokens};
use crate::domain::{AccessToken, Principal, Role};

/// Shortest accepted signing secret, in bytes.
pub const MIN_SECRET_LEN: usize = 32;

/// Rejected token configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenSecretError {
    /// The secret is too short for HS256.
    #[error("token secret must be at least {MIN_SECRET_LEN} bytes, got {actual}")]
    TooShort { actual: usize },
    /// Tokens would expire immediately.
    #[error("token lifetime must be positive")]
    NonPositiveTtl,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: Uuid,
    role: Role,
    iat: i64,
    exp: i64,
}

/// Signs and verifies HS256 access tokens with a shared secret.
#[derive(Clone)]
pub struct JwtAccessTokens {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl fmt::Debug for JwtAccessTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtAccessTokens")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl JwtAccessTokens {
    /// Build a signer from a configured secret.
    ///
    /// # Errors
    /// Rejects secrets shorter than [`MIN_SECRET_LEN`] and non-positive TTLs.
    pub fn new(secret: &[u8], ttl: Duration) -> Result<Self, TokenSecretError> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(TokenSecretError::TooShort {
                actual: secret.len(),
            });
        }
        if ttl <= Duration::zero() {
            return Err(TokenSecretError::NonPositiveTtl);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        })
    }

    /// Build a signer with a random per-process secret.
    ///
    /// Tokens stop verifying when the process restarts.
    ///
    /// # Errors
    /// Rejects non-positive TTLs.
    pub fn ephemeral(ttl: Duration) -> Result<Self, TokenSecretError> {
        let mut secret = zeroize::Zeroizing::new([0_u8; MIN_SECRET_LEN]);
        rand::thread_rng().fill_bytes(secret.as_mut());
        Self::new(secret.as_ref(), ttl)
    }
}

impl AccessTokens for JwtAccessTokens {
    fn issue(
        &self,
        principal: Principal,
        issued_at: DateTime<Utc>,
    ) -> Result<AccessToken, AccessTokenError> {
        let expires_at = issued_at + self.ttl;
        let claims = Claims {
            sub: principal.subject(),
            role: principal.role(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map(|token| AccessToken::new(token, expires_at))
            .map_err(|err| AccessTokenError::signing(err.to_string()))
    }

    fn verify(&self, token: &str) -> Result<Principal, AccessTokenError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|err| match err.kind() {
                ErrorKind::ExpiredSignature => AccessTokenError::expired(),
                _ => AccessTokenError::invalid(err.to_string()),
            })?;
        Ok(Principal::new(data.claims.sub, data.claims.role))
    }
}

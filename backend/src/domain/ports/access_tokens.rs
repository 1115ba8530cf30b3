//! Port for issuing and verifying signed bearer tokens.
use chrono::{DateTime, Utc};

use crate::domain::{AccessToken, Principal};

use super::define_port_error;

define_port_error! {
    /// Failures raised by token adapters.
    pub enum AccessTokenError {
        /// The token is malformed, tampered with or signed with another key.
        Invalid { message: String } => "access token is invalid: {message}",
        /// The token signature is valid but `exp` has passed.
        Expired => "access token has expired",
        /// A token could not be produced.
        Signing { message: String } => "access token could not be signed: {message}",
    }
}

/// Issues and verifies access tokens.
///
/// Signing is CPU-light and synchronous, so this port is not async.
#[cfg_attr(test, mockall::automock)]
pub trait AccessTokens: Send + Sync {
    /// Sign a token for `principal` valid from `issued_at`.
    fn issue(
        &self,
        principal: Principal,
        issued_at: DateTime<Utc>,
    ) -> Result<AccessToken, AccessTokenError>;

    /// Verify signature and expiry, returning the embedded principal.
    fn verify(&self, token: &str) -> Result<Principal, AccessTokenError>;
}

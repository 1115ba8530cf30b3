//! Driving port for officer accounts: signup, login and admin decisions.
//!
//! Inbound adapters call this port without knowing which repository,
//! hasher or token signer backs it, so handler tests can substitute a mock.

use async_trait::async_trait;

use crate::domain::{
    AccessToken, Error, LoginCredentials, Officer, OfficerDecision, OfficerId, OfficerSignup,
};

/// Successful officer login.
#[derive(Debug, Clone)]
pub struct OfficerSession {
    pub token: AccessToken,
    pub officer: Officer,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OfficerDirectory: Send + Sync {
    /// Register a pending officer.
    async fn sign_up(&self, signup: OfficerSignup) -> Result<Officer, Error>;

    /// Authenticate an approved officer and issue a token.
    async fn login(&self, credentials: LoginCredentials) -> Result<OfficerSession, Error>;

    /// Officers awaiting a decision, newest first.
    async fn pending(&self) -> Result<Vec<Officer>, Error>;

    /// Approve or reject a pending officer.
    async fn decide(&self, id: OfficerId, decision: OfficerDecision) -> Result<Officer, Error>;
}

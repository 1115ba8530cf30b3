//! Driving port for administrator authentication.

use async_trait::async_trait;

use crate::domain::{AccessToken, Admin, Error, LoginCredentials};

/// Successful admin login.
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub token: AccessToken,
    pub admin: Admin,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminLogin: Send + Sync {
    /// Validate credentials and issue an admin token.
    async fn login(&self, credentials: LoginCredentials) -> Result<AdminSession, Error>;
}

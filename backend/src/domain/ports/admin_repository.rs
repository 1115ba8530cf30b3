//! Port abstraction for administrator account persistence.
use async_trait::async_trait;

use crate::domain::Admin;

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by admin repository adapters.
    pub enum AdminRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "admin repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "admin repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminRepository: Send + Sync {
    /// Insert the admin or refresh the name and credential of an existing
    /// account with the same username. Returns the stored account.
    async fn upsert(&self, admin: &Admin) -> Result<Admin, AdminRepositoryError>;

    /// Fetch an admin by username.
    async fn find_by_username(&self, username: &str)
    -> Result<Option<Admin>, AdminRepositoryError>;
}

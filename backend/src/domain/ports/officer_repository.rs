//! Port abstraction for officer account persistence.
use async_trait::async_trait;

use crate::domain::{Email, Officer, OfficerDecision, OfficerId, OfficerStatus};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by officer repository adapters.
    pub enum OfficerRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "officer repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "officer repository query failed: {message}",
        /// A unique identity column already holds this value.
        Duplicate { field: IdentityField } => "officer {field} already registered",
    }
}

/// Officer columns that must be unique across the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityField {
    /// National identity number.
    IdNumber,
    /// Normalised email address.
    Email,
}

impl IdentityField {
    /// Client-facing field name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::IdNumber => "idNumber",
            Self::Email => "email",
        }
    }
}

impl std::fmt::Display for IdentityField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a conditional approve/reject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecisionOutcome {
    /// The officer was pending and now carries the decided status.
    Applied(Officer),
    /// No officer with that id.
    NotFound,
    /// The officer was already decided; carries the current status.
    NotEligible(OfficerStatus),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OfficerRepository: Send + Sync {
    /// Insert a newly registered officer.
    ///
    /// Unique-constraint violations surface as
    /// [`OfficerRepositoryError::Duplicate`].
    async fn insert(&self, officer: &Officer) -> Result<(), OfficerRepositoryError>;

    /// Report which identity column, if any, already holds the given values.
    async fn find_identity_conflict(
        &self,
        id_number: &str,
        email: &Email,
    ) -> Result<Option<IdentityField>, OfficerRepositoryError>;

    /// Fetch an officer by normalised email.
    async fn find_by_email(&self, email: &Email) -> Result<Option<Officer>, OfficerRepositoryError>;

    /// Fetch an officer by id.
    async fn find_by_id(&self, id: OfficerId) -> Result<Option<Officer>, OfficerRepositoryError>;

    /// Officers awaiting a decision, newest first.
    async fn list_pending(&self) -> Result<Vec<Officer>, OfficerRepositoryError>;

    /// Apply a decision only if the officer is still pending.
    async fn decide(
        &self,
        id: OfficerId,
        decision: OfficerDecision,
    ) -> Result<DecisionOutcome, OfficerRepositoryError>;
}

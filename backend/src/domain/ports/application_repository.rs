//! Port abstraction for application persistence: records, documents, audit
//! events, identifier counters and read projections.
use async_trait::async_trait;

use crate::domain::{
    Application, ApplicationEvent, ApplicationId, ApplicationNumber, IdentifierScope,
    NewDocument, OfficerId, StoredDocument, TransitionOutcome, TransitionRequest,
};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by application repository adapters.
    pub enum ApplicationRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "application repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "application repository query failed: {message}",
        /// A unique identifier collided with an existing record.
        Duplicate { message: String } => "application identifier already used: {message}",
    }
}

/// Read projections over applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationFilter {
    /// Every application that is not a renewal.
    NonRenewal,
    /// Applications currently in `approved`.
    Approved,
    /// Renewal-type applications.
    Renewals,
    /// Applications owned by one officer.
    OwnedBy(OfficerId),
}

impl ApplicationFilter {
    /// Whether `application` belongs in this projection.
    #[must_use]
    pub fn matches(self, application: &Application) -> bool {
        use crate::domain::{ApplicationStatus, ApplicationType};
        match self {
            Self::NonRenewal => application.application_type() != ApplicationType::Renewal,
            Self::Approved => application.status() == ApplicationStatus::Approved,
            Self::Renewals => application.application_type() == ApplicationType::Renewal,
            Self::OwnedBy(officer) => application.officer_id() == officer,
        }
    }
}

/// Application joined with the owning officer's name.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationListing {
    pub application: Application,
    pub officer_name: Option<String>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Atomically advance the counter for `scope` and return the new value.
    async fn allocate_sequence(
        &self,
        scope: IdentifierScope,
    ) -> Result<u64, ApplicationRepositoryError>;

    /// Insert a submitted application, its documents and its creation event
    /// in one transaction.
    async fn create(
        &self,
        application: &Application,
        documents: &[NewDocument],
        event: &ApplicationEvent,
    ) -> Result<(), ApplicationRepositoryError>;

    /// Apply a transition as one conditional update, allocating the ID number
    /// and appending the audit event in the same transaction.
    async fn apply_transition(
        &self,
        request: TransitionRequest,
    ) -> Result<TransitionOutcome, ApplicationRepositoryError>;

    /// Fetch one application with its officer name.
    async fn find_by_id(
        &self,
        id: ApplicationId,
    ) -> Result<Option<ApplicationListing>, ApplicationRepositoryError>;

    /// Fetch one application by its public number.
    async fn find_by_number(
        &self,
        number: &ApplicationNumber,
    ) -> Result<Option<Application>, ApplicationRepositoryError>;

    /// Documents stored for an application, in upload order.
    async fn documents(
        &self,
        id: ApplicationId,
    ) -> Result<Vec<StoredDocument>, ApplicationRepositoryError>;

    /// Applications matching `filter`, newest first.
    async fn list(
        &self,
        filter: ApplicationFilter,
    ) -> Result<Vec<ApplicationListing>, ApplicationRepositoryError>;

    /// Audit events for an application, oldest first.
    async fn history(
        &self,
        id: ApplicationId,
    ) -> Result<Vec<ApplicationEvent>, ApplicationRepositoryError>;
}

//! Driving port for application read projections.

use async_trait::async_trait;

use crate::domain::{Application, ApplicationEvent, ApplicationId, Error, StoredDocument};

use super::{ApplicationFilter, ApplicationListing};

/// One application with its documents.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationDetail {
    pub listing: ApplicationListing,
    pub documents: Vec<StoredDocument>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApplicationQuery: Send + Sync {
    /// Public status lookup by application number.
    async fn track(&self, application_number: &str) -> Result<Application, Error>;

    /// Applications matching `filter`, newest first.
    async fn list(&self, filter: ApplicationFilter) -> Result<Vec<ApplicationListing>, Error>;

    /// One application with its documents.
    async fn detail(&self, id: ApplicationId) -> Result<ApplicationDetail, Error>;

    /// Audit events for one application, oldest first.
    async fn history(&self, id: ApplicationId) -> Result<Vec<ApplicationEvent>, Error>;
}

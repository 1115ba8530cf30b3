//! Driving port for application submission and lifecycle transitions.

use async_trait::async_trait;

use crate::domain::{
    Actor, ApplicantDraft, Application, ApplicationId, ApplicationNumber, ApplicationType,
    DocumentUpload, Error, OfficerId, Transition,
};

/// Submission received from an authenticated officer.
#[derive(Debug, Clone)]
pub struct SubmitApplicationRequest {
    pub officer_id: OfficerId,
    pub application_type: ApplicationType,
    pub applicant: ApplicantDraft,
    pub documents: Vec<DocumentUpload>,
}

/// Identifiers handed back after a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub application_id: ApplicationId,
    pub application_number: ApplicationNumber,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApplicationCommand: Send + Sync {
    /// Validate, store documents and create the application.
    async fn submit(&self, request: SubmitApplicationRequest) -> Result<SubmissionReceipt, Error>;

    /// Apply one lifecycle transition on behalf of `actor`.
    ///
    /// Missing or foreign applications fail with `not_found`; guard failures
    /// with `not_eligible`.
    async fn transition(
        &self,
        id: ApplicationId,
        transition: Transition,
        actor: Actor,
    ) -> Result<Application, Error>;
}

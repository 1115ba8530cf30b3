//! Application domain services.
//!
//! One service implements both the command and query driving ports. The
//! submission path validates the applicant, reserves an application number,
//! writes document files, and only then creates the application row together
//! with its documents and creation event in one repository transaction.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::{Map, Value, json};
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::ports::{
    ApplicationCommand, ApplicationDetail, ApplicationFilter, ApplicationListing,
    ApplicationQuery, ApplicationRepository, ApplicationRepositoryError, DocumentStore,
    DocumentStoreError, SubmissionReceipt, SubmitApplicationRequest,
};
use crate::domain::{
    Actor, ApplicantDetails, ApplicantValidationError, Application, ApplicationEvent,
    ApplicationId, ApplicationNumber, DocumentUpload, Error, IdentifierScope, NewApplication,
    NewDocument, Transition, TransitionOutcome, TransitionRequest, stored_file_name,
};

fn map_repository_error(error: ApplicationRepositoryError) -> Error {
    match error {
        ApplicationRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("application repository unavailable: {message}"))
        }
        ApplicationRepositoryError::Query { message } => {
            Error::internal(format!("application repository error: {message}"))
        }
        ApplicationRepositoryError::Duplicate { message } => {
            Error::conflict(format!("application identifier already used: {message}"))
        }
    }
}

fn map_store_error(error: DocumentStoreError) -> Error {
    match error {
        DocumentStoreError::Unavailable { message } => {
            Error::service_unavailable(format!("document storage unavailable: {message}"))
        }
        DocumentStoreError::Write { .. } => Error::internal(error.to_string()),
    }
}

fn applicant_error(error: ApplicantValidationError) -> Error {
    let (field, code) = match error {
        ApplicantValidationError::MissingField(field) => (field, "missing_field"),
        ApplicantValidationError::InvalidDateOfBirth => ("dateOfBirth", "invalid_date"),
        ApplicantValidationError::FutureDateOfBirth => ("dateOfBirth", "future_date"),
        ApplicantValidationError::TooLong { field, .. } => (field, "too_long"),
    };
    Error::invalid_request(error.to_string()).with_details(json!({
        "field": field,
        "code": code,
    }))
}

fn not_found() -> Error {
    Error::not_found("application not found")
}

/// Application service implementing [`ApplicationCommand`] and
/// [`ApplicationQuery`].
#[derive(Clone)]
pub struct ApplicationService<R, D> {
    applications: Arc<R>,
    documents: Arc<D>,
    clock: Arc<dyn Clock>,
}

impl<R, D> ApplicationService<R, D> {
    /// Create a new service from its collaborators.
    pub fn new(applications: Arc<R>, documents: Arc<D>, clock: Arc<dyn Clock>) -> Self {
        Self {
            applications,
            documents,
            clock,
        }
    }
}

impl<R, D> ApplicationService<R, D>
where
    R: ApplicationRepository,
    D: DocumentStore,
{
    async fn reserve_number(&self) -> Result<ApplicationNumber, Error> {
        let sequence = self
            .applications
            .allocate_sequence(IdentifierScope::ApplicationNumber)
            .await
            .map_err(map_repository_error)?;
        Ok(ApplicationNumber::from_sequence(self.clock.utc(), sequence))
    }

    /// Write every named upload and describe it for the application record.
    async fn store_documents(
        &self,
        number: &ApplicationNumber,
        uploads: Vec<DocumentUpload>,
    ) -> Result<(Vec<NewDocument>, Value), Error> {
        let mut rows = Vec::with_capacity(uploads.len());
        let mut summary = Map::new();
        for upload in uploads {
            if upload.original_name.trim().is_empty() {
                continue;
            }
            let file_name = stored_file_name(number, upload.document_type, &upload.original_name);
            let file_path = self
                .documents
                .store(&file_name, &upload.bytes)
                .await
                .map_err(map_store_error)?;
            summary.insert(
                upload.document_type.field_key().to_owned(),
                json!({
                    "fileName": file_name,
                    "originalName": upload.original_name,
                }),
            );
            rows.push(NewDocument {
                id: Uuid::new_v4(),
                document_type: upload.document_type,
                file_path,
                original_name: upload.original_name,
            });
        }
        Ok((rows, Value::Object(summary)))
    }
}

#[async_trait]
impl<R, D> ApplicationCommand for ApplicationService<R, D>
where
    R: ApplicationRepository,
    D: DocumentStore,
{
    async fn submit(&self, request: SubmitApplicationRequest) -> Result<SubmissionReceipt, Error> {
        let SubmitApplicationRequest {
            officer_id,
            application_type,
            applicant,
            documents,
        } = request;

        let submitted_at = self.clock.utc();
        let applicant = ApplicantDetails::try_from_draft(applicant, submitted_at.date_naive())
            .map_err(applicant_error)?;

        let number = self.reserve_number().await?;
        let (document_rows, supporting_documents) =
            self.store_documents(&number, documents).await?;

        let application = Application::submit(
            NewApplication {
                id: ApplicationId::random(),
                officer_id,
                application_type,
                applicant,
                supporting_documents,
                submitted_at,
            },
            number,
        );
        let event =
            ApplicationEvent::submitted(application.id(), Actor::Officer(officer_id), submitted_at);
        self.applications
            .create(&application, &document_rows, &event)
            .await
            .map_err(map_repository_error)?;

        info!(
            application_id = %application.id(),
            application_number = %application.application_number(),
            officer_id = %officer_id,
            documents = document_rows.len(),
            "application submitted"
        );
        Ok(SubmissionReceipt {
            application_id: application.id(),
            application_number: application.application_number().clone(),
        })
    }

    async fn transition(
        &self,
        id: ApplicationId,
        transition: Transition,
        actor: Actor,
    ) -> Result<Application, Error> {
        if actor.role() != transition.actor_role() {
            return Err(Error::forbidden(format!(
                "{} may not {transition} applications",
                actor.role()
            )));
        }

        let request = TransitionRequest {
            application_id: id,
            transition,
            actor,
            requested_at: self.clock.utc(),
        };
        match self
            .applications
            .apply_transition(request)
            .await
            .map_err(map_repository_error)?
        {
            TransitionOutcome::Applied(application) => {
                info!(
                    application_id = %id,
                    transition = %transition,
                    status = %application.status(),
                    "application transition applied"
                );
                Ok(application)
            }
            TransitionOutcome::NotFound => Err(not_found()),
            TransitionOutcome::NotEligible(reason) => {
                warn!(application_id = %id, transition = %transition, %reason, "transition refused");
                Err(Error::not_eligible(reason.to_string()))
            }
        }
    }
}

#[async_trait]
impl<R, D> ApplicationQuery for ApplicationService<R, D>
where
    R: ApplicationRepository,
    D: DocumentStore,
{
    async fn track(&self, application_number: &str) -> Result<Application, Error> {
        let Ok(number) = ApplicationNumber::parse(application_number) else {
            return Err(not_found());
        };
        self.applications
            .find_by_number(&number)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(not_found)
    }

    async fn list(&self, filter: ApplicationFilter) -> Result<Vec<ApplicationListing>, Error> {
        self.applications
            .list(filter)
            .await
            .map_err(map_repository_error)
    }

    async fn detail(&self, id: ApplicationId) -> Result<ApplicationDetail, Error> {
        let listing = self
            .applications
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(not_found)?;
        let documents = self
            .applications
            .documents(id)
            .await
            .map_err(map_repository_error)?;
        Ok(ApplicationDetail { listing, documents })
    }

    async fn history(&self, id: ApplicationId) -> Result<Vec<ApplicationEvent>, Error> {
        if self
            .applications
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .is_none()
        {
            return Err(not_found());
        }
        self.applications
            .history(id)
            .await
            .map_err(map_repository_error)
    }
}

#[cfg(test)]
#[path = "application_service_tests.rs"]
mod tests;

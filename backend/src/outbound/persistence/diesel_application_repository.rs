//! PostgreSQL-backed `ApplicationRepository` implementation using Diesel ORM.
//!
//! Identifier counters live in `identifier_sequences` and advance through a
//! single `INSERT ... ON CONFLICT DO UPDATE ... RETURNING`, so the counter row
//! lock serialises concurrent allocators. Transitions lock the application
//! row, evaluate the domain guards, allocate the ID number when approving,
//! and write the state change and its audit event in one transaction. The
//! update still filters on the required status so it can never apply twice.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{
    ApplicationFilter, ApplicationListing, ApplicationRepository, ApplicationRepositoryError,
};
use crate::domain::{
    Actor, ApplicantRecord, Application, ApplicationDraft, ApplicationEvent, ApplicationId,
    ApplicationNumber, ApplicationStatus, ApplicationType, DocumentType, EventAction, IdNumber,
    IdentifierScope, NewDocument, OfficerId, Role, StoredDocument, TransitionOutcome,
    TransitionRequest,
};

use super::diesel_basic_error_mapping::{
    map_basic_diesel_error, map_basic_pool_error, unique_violation,
};
use super::models::{
    ApplicationEventRow, ApplicationRow, ApplicationStateUpdate, DocumentRow, NewApplicationRow,
    NewDocumentRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{application_events, applications, documents, identifier_sequences, officers};

/// Diesel-backed implementation of the application repository port.
#[derive(Clone)]
pub struct DieselApplicationRepository {
    pool: DbPool,
}

impl DieselApplicationRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ApplicationRepositoryError {
    map_basic_pool_error(error, |message| ApplicationRepositoryError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> ApplicationRepositoryError {
    if let Some(constraint) = unique_violation(&error) {
        return ApplicationRepositoryError::duplicate(constraint);
    }
    map_basic_diesel_error(
        error,
        ApplicationRepositoryError::query,
        ApplicationRepositoryError::connection,
    )
}

/// Failures inside a transaction body: either Diesel itself or stored data
/// that no longer converts into domain types.
enum TransactionError {
    Diesel(diesel::result::Error),
    Repository(ApplicationRepositoryError),
}

impl From<diesel::result::Error> for TransactionError {
    fn from(error: diesel::result::Error) -> Self {
        Self::Diesel(error)
    }
}

impl From<ApplicationRepositoryError> for TransactionError {
    fn from(error: ApplicationRepositoryError) -> Self {
        Self::Repository(error)
    }
}

fn map_transaction_error(error: TransactionError) -> ApplicationRepositoryError {
    match error {
        TransactionError::Diesel(error) => map_diesel_error(error),
        TransactionError::Repository(error) => error,
    }
}

fn corrupt(column: &str, error: impl std::fmt::Display) -> ApplicationRepositoryError {
    ApplicationRepositoryError::query(format!("stored {column} is invalid: {error}"))
}

fn row_to_application(row: ApplicationRow) -> Result<Application, ApplicationRepositoryError> {
    let application_number = ApplicationNumber::parse(row.application_number)
        .map_err(|err| corrupt("application_number", err))?;
    let application_type = row
        .application_type
        .parse::<ApplicationType>()
        .map_err(|err| corrupt("application_type", err))?;
    let status = row
        .status
        .parse::<ApplicationStatus>()
        .map_err(|err| corrupt("status", err))?;
    let generated_id_number = row
        .generated_id_number
        .map(IdNumber::parse)
        .transpose()
        .map_err(|err| corrupt("generated_id_number", err))?;
    let applicant = ApplicantRecord {
        first_name: row.first_name,
        last_name: row.last_name,
        date_of_birth: row.date_of_birth,
        gender: row.gender,
        place_of_birth: row.place_of_birth,
        phone_number: row.phone_number,
        address: row.address,
        father_name: row.father_name,
        mother_name: row.mother_name,
        previous_id_number: row.previous_id_number,
    };

    Application::new(ApplicationDraft {
        id: ApplicationId::from_uuid(row.id),
        application_number,
        officer_id: OfficerId::from_uuid(row.officer_id),
        application_type,
        applicant: applicant.into(),
        supporting_documents: row.supporting_documents,
        status,
        generated_id_number,
        card_arrived: row.card_arrived,
        collected: row.collected,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
    .map_err(|err| corrupt("application", err))
}

fn application_to_row(application: &Application) -> NewApplicationRow<'_> {
    let applicant = application.applicant();
    NewApplicationRow {
        id: *application.id().as_uuid(),
        application_number: application.application_number().as_str(),
        officer_id: *application.officer_id().as_uuid(),
        application_type: application.application_type().as_str(),
        first_name: applicant.first_name(),
        last_name: applicant.last_name(),
        date_of_birth: applicant.date_of_birth(),
        gender: applicant.gender(),
        place_of_birth: applicant.place_of_birth(),
        phone_number: applicant.phone_number(),
        address: applicant.address(),
        father_name: applicant.father_name(),
        mother_name: applicant.mother_name(),
        previous_id_number: applicant.previous_id_number(),
        supporting_documents: application.supporting_documents(),
        status: application.status().as_str(),
        created_at: application.created_at(),
        updated_at: application.updated_at(),
    }
}

fn document_to_row<'a>(
    application_id: ApplicationId,
    document: &'a NewDocument,
    uploaded_at: DateTime<Utc>,
) -> NewDocumentRow<'a> {
    NewDocumentRow {
        id: document.id,
        application_id: *application_id.as_uuid(),
        document_type: document.document_type.field_key(),
        file_path: &document.file_path,
        original_name: &document.original_name,
        uploaded_at,
    }
}

fn row_to_document(row: DocumentRow) -> Result<StoredDocument, ApplicationRepositoryError> {
    let document_type = row
        .document_type
        .parse::<DocumentType>()
        .map_err(|err| corrupt("document_type", err))?;
    Ok(StoredDocument {
        id: row.id,
        application_id: ApplicationId::from_uuid(row.application_id),
        document_type,
        file_path: row.file_path,
        original_name: row.original_name,
        uploaded_at: row.uploaded_at,
    })
}

fn event_to_row(event: &ApplicationEvent) -> ApplicationEventRow {
    ApplicationEventRow {
        id: event.id,
        application_id: *event.application_id.as_uuid(),
        action: event.action.as_str().to_owned(),
        from_status: event.from_status.map(|status| status.as_str().to_owned()),
        to_status: event.to_status.as_str().to_owned(),
        actor_role: event.actor.role().as_str().to_owned(),
        actor_id: event.actor.account_id(),
        occurred_at: event.occurred_at,
    }
}

fn row_to_event(row: ApplicationEventRow) -> Result<ApplicationEvent, ApplicationRepositoryError> {
    let action = row
        .action
        .parse::<EventAction>()
        .map_err(|err| corrupt("action", err))?;
    let from_status = row
        .from_status
        .map(|status| status.parse::<ApplicationStatus>())
        .transpose()
        .map_err(|err| corrupt("from_status", err))?;
    let to_status = row
        .to_status
        .parse::<ApplicationStatus>()
        .map_err(|err| corrupt("to_status", err))?;
    let role = row
        .actor_role
        .parse::<Role>()
        .map_err(|err| corrupt("actor_role", err))?;
    Ok(ApplicationEvent {
        id: row.id,
        application_id: ApplicationId::from_uuid(row.application_id),
        action,
        from_status,
        to_status,
        actor: Actor::from_parts(role, row.actor_id),
        occurred_at: row.occurred_at,
    })
}

fn sequence_value(raw: i64) -> Result<u64, ApplicationRepositoryError> {
    u64::try_from(raw).map_err(|err| corrupt("identifier sequence", err))
}

/// Advance the counter for `scope`, creating it at 1 on first use.
async fn next_sequence<C>(
    conn: &mut C,
    scope: IdentifierScope,
) -> Result<i64, diesel::result::Error>
where
    C: AsyncConnection<Backend = diesel::pg::Pg> + Send,
{
    diesel::insert_into(identifier_sequences::table)
        .values((
            identifier_sequences::scope.eq(scope.as_str()),
            identifier_sequences::last_value.eq(1_i64),
        ))
        .on_conflict(identifier_sequences::scope)
        .do_update()
        .set(identifier_sequences::last_value.eq(identifier_sequences::last_value + 1_i64))
        .returning(identifier_sequences::last_value)
        .get_result(conn)
        .await
}

fn listing(
    (row, officer_name): (ApplicationRow, Option<String>),
) -> Result<ApplicationListing, ApplicationRepositoryError> {
    Ok(ApplicationListing {
        application: row_to_application(row)?,
        officer_name,
    })
}

#[async_trait]
impl ApplicationRepository for DieselApplicationRepository {
    async fn allocate_sequence(
        &self,
        scope: IdentifierScope,
    ) -> Result<u64, ApplicationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let raw = next_sequence(&mut conn, scope)
            .await
            .map_err(map_diesel_error)?;
        sequence_value(raw)
    }

    async fn create(
        &self,
        application: &Application,
        documents: &[NewDocument],
        event: &ApplicationEvent,
    ) -> Result<(), ApplicationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let application_row = application_to_row(application);
        let document_rows: Vec<NewDocumentRow<'_>> = documents
            .iter()
            .map(|document| document_to_row(application.id(), document, application.created_at()))
            .collect();
        let event_row = event_to_row(event);

        conn.transaction(|conn| {
            async move {
                diesel::insert_into(applications::table)
                    .values(&application_row)
                    .execute(conn)
                    .await?;
                if !document_rows.is_empty() {
                    diesel::insert_into(documents::table)
                        .values(&document_rows)
                        .execute(conn)
                        .await?;
                }
                diesel::insert_into(application_events::table)
                    .values(&event_row)
                    .execute(conn)
                    .await?;
                Ok::<_, diesel::result::Error>(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn apply_transition(
        &self,
        request: TransitionRequest,
    ) -> Result<TransitionOutcome, ApplicationRepositoryError> {
        let TransitionRequest {
            application_id,
            transition,
            actor,
            requested_at,
        } = request;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction(|conn| {
            async move {
                let current: Option<ApplicationRow> = applications::table
                    .find(application_id.as_uuid())
                    .select(ApplicationRow::as_select())
                    .for_update()
                    .first(conn)
                    .await
                    .optional()?;
                let Some(current) = current.map(row_to_application).transpose()? else {
                    return Ok(TransitionOutcome::NotFound);
                };
                if !transition.is_visible_to(&current, &actor) {
                    return Ok(TransitionOutcome::NotFound);
                }
                if let Err(reason) = transition.check(&current) {
                    return Ok(TransitionOutcome::NotEligible(reason));
                }

                let generated_id_number = if transition.allocates_id_number() {
                    let raw = next_sequence(conn, IdentifierScope::IdNumber).await?;
                    let sequence = sequence_value(raw)?;
                    Some(IdNumber::from_sequence(requested_at, sequence))
                } else {
                    None
                };
                let next = transition
                    .apply(&current, generated_id_number, requested_at)
                    .map_err(|err| corrupt("transition result", err))?;

                let changes = ApplicationStateUpdate {
                    status: next.status().as_str(),
                    generated_id_number: next.generated_id_number().map(IdNumber::as_str),
                    card_arrived: next.card_arrived(),
                    collected: next.collected(),
                    updated_at: next.updated_at(),
                };
                let updated: Option<ApplicationRow> = diesel::update(
                    applications::table
                        .filter(applications::id.eq(application_id.as_uuid()))
                        .filter(applications::status.eq(transition.required_status().as_str())),
                )
                .set(&changes)
                .returning(ApplicationRow::as_returning())
                .get_result(conn)
                .await
                .optional()?;
                let Some(updated) = updated else {
                    return Ok(TransitionOutcome::from_unmatched(
                        transition,
                        Some(&current),
                        &actor,
                    ));
                };

                let event = ApplicationEvent::transitioned(
                    application_id,
                    transition,
                    current.status(),
                    actor,
                    requested_at,
                );
                diesel::insert_into(application_events::table)
                    .values(&event_to_row(&event))
                    .execute(conn)
                    .await?;

                Ok::<_, TransactionError>(TransitionOutcome::Applied(row_to_application(updated)?))
            }
            .scope_boxed()
        })
        .await
        .map_err(map_transaction_error)
    }

    async fn find_by_id(
        &self,
        id: ApplicationId,
    ) -> Result<Option<ApplicationListing>, ApplicationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        applications::table
            .left_join(officers::table)
            .filter(applications::id.eq(id.as_uuid()))
            .select((ApplicationRow::as_select(), officers::full_name.nullable()))
            .first::<(ApplicationRow, Option<String>)>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(listing)
            .transpose()
    }

    async fn find_by_number(
        &self,
        number: &ApplicationNumber,
    ) -> Result<Option<Application>, ApplicationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        applications::table
            .filter(applications::application_number.eq(number.as_str()))
            .select(ApplicationRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_application)
            .transpose()
    }

    async fn documents(
        &self,
        id: ApplicationId,
    ) -> Result<Vec<StoredDocument>, ApplicationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        documents::table
            .filter(documents::application_id.eq(id.as_uuid()))
            .order((documents::uploaded_at.asc(), documents::document_type.asc()))
            .select(DocumentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?
            .into_iter()
            .map(row_to_document)
            .collect()
    }

    async fn list(
        &self,
        filter: ApplicationFilter,
    ) -> Result<Vec<ApplicationListing>, ApplicationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = applications::table
            .left_join(officers::table)
            .select((ApplicationRow::as_select(), officers::full_name.nullable()))
            .order(applications::created_at.desc())
            .into_boxed();
        query = match filter {
            ApplicationFilter::NonRenewal => query
                .filter(applications::application_type.ne(ApplicationType::Renewal.as_str())),
            ApplicationFilter::Approved => {
                query.filter(applications::status.eq(ApplicationStatus::Approved.as_str()))
            }
            ApplicationFilter::Renewals => query
                .filter(applications::application_type.eq(ApplicationType::Renewal.as_str())),
            ApplicationFilter::OwnedBy(officer) => {
                query.filter(applications::officer_id.eq(*officer.as_uuid()))
            }
        };

        query
            .load::<(ApplicationRow, Option<String>)>(&mut conn)
            .await
            .map_err(map_diesel_error)?
            .into_iter()
            .map(listing)
            .collect()
    }

    async fn history(
        &self,
        id: ApplicationId,
    ) -> Result<Vec<ApplicationEvent>, ApplicationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        application_events::table
            .filter(application_events::application_id.eq(id.as_uuid()))
            .order(application_events::occurred_at.asc())
            .select(ApplicationEventRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?
            .into_iter()
            .map(row_to_event)
            .collect()
    }
}

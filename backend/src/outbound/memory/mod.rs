//! In-process store implementing every repository port.
//!
//! Used when no database URL is configured and by the HTTP scenario tests.
//! One mutex guards all tables, so each operation is atomic the same way a
//! database transaction is.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{
    AdminRepository, AdminRepositoryError, ApplicationFilter, ApplicationListing,
    ApplicationRepository, ApplicationRepositoryError, DecisionOutcome, IdentityField,
    OfficerRepository, OfficerRepositoryError,
};
use crate::domain::{
    Admin, Application, ApplicationEvent, ApplicationId, ApplicationNumber, Email, IdNumber,
    IdentifierScope, NewDocument, Officer, OfficerDecision, OfficerId, OfficerStatus,
    StoredDocument, TransitionOutcome, TransitionRequest,
};

#[derive(Debug, Default)]
struct Tables {
    officers: Vec<Officer>,
    admins: Vec<Admin>,
    sequences: HashMap<IdentifierScope, u64>,
    applications: Vec<Application>,
    documents: Vec<StoredDocument>,
    events: Vec<ApplicationEvent>,
}

impl Tables {
    fn next_sequence(&mut self, scope: IdentifierScope) -> u64 {
        let value = self.sequences.entry(scope).or_insert(0);
        *value += 1;
        *value
    }

    fn officer_name(&self, id: OfficerId) -> Option<String> {
        self.officers
            .iter()
            .find(|officer| officer.id() == id)
            .map(|officer| officer.full_name().to_owned())
    }

    fn listing(&self, application: &Application) -> ApplicationListing {
        ApplicationListing {
            application: application.clone(),
            officer_name: self.officer_name(application.officer_id()),
        }
    }
}

/// Thread-safe in-memory tables for officers, admins and applications.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, String> {
        self.tables
            .lock()
            .map_err(|_| "in-memory store lock poisoned".to_owned())
    }
}

#[async_trait]
impl OfficerRepository for InMemoryStore {
    async fn insert(&self, officer: &Officer) -> Result<(), OfficerRepositoryError> {
        let mut tables = self.lock().map_err(OfficerRepositoryError::query)?;
        if let Some(field) = identity_conflict(&tables.officers, officer.id_number(), officer.email())
        {
            return Err(OfficerRepositoryError::duplicate(field));
        }
        tables.officers.push(officer.clone());
        Ok(())
    }

    async fn find_identity_conflict(
        &self,
        id_number: &str,
        email: &Email,
    ) -> Result<Option<IdentityField>, OfficerRepositoryError> {
        let tables = self.lock().map_err(OfficerRepositoryError::query)?;
        Ok(identity_conflict(&tables.officers, id_number, email))
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<Officer>, OfficerRepositoryError> {
        let tables = self.lock().map_err(OfficerRepositoryError::query)?;
        Ok(tables
            .officers
            .iter()
            .find(|officer| officer.email() == email)
            .cloned())
    }

    async fn find_by_id(&self, id: OfficerId) -> Result<Option<Officer>, OfficerRepositoryError> {
        let tables = self.lock().map_err(OfficerRepositoryError::query)?;
        Ok(tables
            .officers
            .iter()
            .find(|officer| officer.id() == id)
            .cloned())
    }

    async fn list_pending(&self) -> Result<Vec<Officer>, OfficerRepositoryError> {
        let tables = self.lock().map_err(OfficerRepositoryError::query)?;
        let mut pending: Vec<Officer> = tables
            .officers
            .iter()
            .filter(|officer| officer.status() == OfficerStatus::Pending)
            .cloned()
            .collect();
        pending.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(pending)
    }

    async fn decide(
        &self,
        id: OfficerId,
        decision: OfficerDecision,
    ) -> Result<DecisionOutcome, OfficerRepositoryError> {
        let mut tables = self.lock().map_err(OfficerRepositoryError::query)?;
        let Some(slot) = tables.officers.iter_mut().find(|officer| officer.id() == id) else {
            return Ok(DecisionOutcome::NotFound);
        };
        if slot.status() != OfficerStatus::Pending {
            return Ok(DecisionOutcome::NotEligible(slot.status()));
        }
        *slot = slot.with_status(decision.target_status());
        Ok(DecisionOutcome::Applied(slot.clone()))
    }
}

fn identity_conflict(officers: &[Officer], id_number: &str, email: &Email) -> Option<IdentityField> {
    if officers.iter().any(|officer| officer.id_number() == id_number) {
        Some(IdentityField::IdNumber)
    } else if officers.iter().any(|officer| officer.email() == email) {
        Some(IdentityField::Email)
    } else {
        None
    }
}

#[async_trait]
impl AdminRepository for InMemoryStore {
    async fn upsert(&self, admin: &Admin) -> Result<Admin, AdminRepositoryError> {
        let mut tables = self.lock().map_err(AdminRepositoryError::query)?;
        if let Some(existing) = tables
            .admins
            .iter_mut()
            .find(|stored| stored.username() == admin.username())
        {
            *existing = Admin::new(
                existing.id(),
                admin.username(),
                admin.full_name(),
                admin.password_hash().clone(),
            );
            return Ok(existing.clone());
        }
        tables.admins.push(admin.clone());
        Ok(admin.clone())
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Admin>, AdminRepositoryError> {
        let tables = self.lock().map_err(AdminRepositoryError::query)?;
        let username = username.trim();
        Ok(tables
            .admins
            .iter()
            .find(|admin| admin.username() == username)
            .cloned())
    }
}

#[async_trait]
impl ApplicationRepository for InMemoryStore {
    async fn allocate_sequence(
        &self,
        scope: IdentifierScope,
    ) -> Result<u64, ApplicationRepositoryError> {
        let mut tables = self.lock().map_err(ApplicationRepositoryError::query)?;
        Ok(tables.next_sequence(scope))
    }

    async fn create(
        &self,
        application: &Application,
        documents: &[NewDocument],
        event: &ApplicationEvent,
    ) -> Result<(), ApplicationRepositoryError> {
        let mut tables = self.lock().map_err(ApplicationRepositoryError::query)?;
        if tables.applications.iter().any(|stored| {
            stored.id() == application.id()
                || stored.application_number() == application.application_number()
        }) {
            return Err(ApplicationRepositoryError::duplicate(
                application.application_number().as_str(),
            ));
        }
        tables.applications.push(application.clone());
        tables
            .documents
            .extend(documents.iter().map(|document| StoredDocument {
                id: document.id,
                application_id: application.id(),
                document_type: document.document_type,
                file_path: document.file_path.clone(),
                original_name: document.original_name.clone(),
                uploaded_at: application.created_at(),
            }));
        tables.events.push(event.clone());
        Ok(())
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
        let mut tables = self.lock().map_err(ApplicationRepositoryError::query)?;
        let Some(index) = tables
            .applications
            .iter()
            .position(|application| application.id() == application_id)
        else {
            return Ok(TransitionOutcome::NotFound);
        };
        let current = tables.applications[index].clone();
        if !transition.is_visible_to(&current, &actor) {
            return Ok(TransitionOutcome::NotFound);
        }
        if let Err(reason) = transition.check(&current) {
            return Ok(TransitionOutcome::NotEligible(reason));
        }

        let generated_id_number = transition.allocates_id_number().then(|| {
            let sequence = tables.next_sequence(IdentifierScope::IdNumber);
            IdNumber::from_sequence(requested_at, sequence)
        });
        if let Some(number) = &generated_id_number {
            let taken = tables
                .applications
                .iter()
                .any(|stored| stored.generated_id_number() == Some(number));
            if taken {
                return Err(ApplicationRepositoryError::duplicate(number.as_str()));
            }
        }
        let next = transition
            .apply(&current, generated_id_number, requested_at)
            .map_err(|err| ApplicationRepositoryError::query(err.to_string()))?;

        tables.applications[index] = next.clone();
        tables.events.push(ApplicationEvent::transitioned(
            application_id,
            transition,
            current.status(),
            actor,
            requested_at,
        ));
        Ok(TransitionOutcome::Applied(next))
    }

    async fn find_by_id(
        &self,
        id: ApplicationId,
    ) -> Result<Option<ApplicationListing>, ApplicationRepositoryError> {
        let tables = self.lock().map_err(ApplicationRepositoryError::query)?;
        Ok(tables
            .applications
            .iter()
            .find(|application| application.id() == id)
            .map(|application| tables.listing(application)))
    }

    async fn find_by_number(
        &self,
        number: &ApplicationNumber,
    ) -> Result<Option<Application>, ApplicationRepositoryError> {
        let tables = self.lock().map_err(ApplicationRepositoryError::query)?;
        Ok(tables
            .applications
            .iter()
            .find(|application| application.application_number() == number)
            .cloned())
    }

    async fn documents(
        &self,
        id: ApplicationId,
    ) -> Result<Vec<StoredDocument>, ApplicationRepositoryError> {
        let tables = self.lock().map_err(ApplicationRepositoryError::query)?;
        Ok(tables
            .documents
            .iter()
            .filter(|document| document.application_id == id)
            .cloned()
            .collect())
    }

    async fn list(
        &self,
        filter: ApplicationFilter,
    ) -> Result<Vec<ApplicationListing>, ApplicationRepositoryError> {
        let tables = self.lock().map_err(ApplicationRepositoryError::query)?;
        // Newest insert first among equal timestamps.
        let mut listings: Vec<ApplicationListing> = tables
            .applications
            .iter()
            .rev()
            .filter(|application| filter.matches(application))
            .map(|application| tables.listing(application))
            .collect();
        listings.sort_by(|a, b| b.application.created_at().cmp(&a.application.created_at()));
        Ok(listings)
    }

    async fn history(
        &self,
        id: ApplicationId,
    ) -> Result<Vec<ApplicationEvent>, ApplicationRepositoryError> {
        let tables = self.lock().map_err(ApplicationRepositoryError::query)?;
        Ok(tables
            .events
            .iter()
            .filter(|event| event.application_id == id)
            .cloned()
            .collect())
    }
}

//! Officer directory service.
//!
//! Implements signup, login and the admin approval workflow on top of the
//! officer repository, the password hasher and the token signer. Unique
//! identity values are checked before hashing so duplicates fail fast, but
//! the repository's unique constraint remains the authoritative guard.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{
    AccessTokenError, AccessTokens, DecisionOutcome, IdentityField, OfficerDirectory,
    OfficerRepository, OfficerRepositoryError, OfficerSession, PasswordHashError, PasswordHasher,
};
use crate::domain::{
    Email, Error, LoginCredentials, Officer, OfficerDecision, OfficerId, OfficerSignup,
    OfficerStatus, Principal, Role,
};

const INVALID_CREDENTIALS: &str = "invalid credentials";
const NOT_APPROVED: &str = "account not approved";

pub(crate) fn map_hash_error(error: PasswordHashError) -> Error {
    Error::internal(format!("password hashing failed: {error}"))
}

pub(crate) fn map_token_error(error: AccessTokenError) -> Error {
    Error::internal(format!("failed to issue access token: {error}"))
}

fn map_repository_error(error: OfficerRepositoryError) -> Error {
    match error {
        OfficerRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("officer repository unavailable: {message}"))
        }
        OfficerRepositoryError::Query { message } => {
            Error::internal(format!("officer repository error: {message}"))
        }
        OfficerRepositoryError::Duplicate { field } => duplicate_identity(field),
    }
}

fn duplicate_identity(field: IdentityField) -> Error {
    let message = match field {
        IdentityField::IdNumber => "an officer with this ID number already exists",
        IdentityField::Email => "an officer with this email already exists",
    };
    Error::conflict(message).with_details(json!({
        "field": field.as_str(),
        "code": "duplicate",
    }))
}

/// Officer directory implementing [`OfficerDirectory`].
#[derive(Clone)]
pub struct OfficerDirectoryService<R, H, T> {
    officers: Arc<R>,
    hasher: Arc<H>,
    tokens: Arc<T>,
    clock: Arc<dyn Clock>,
}

impl<R, H, T> OfficerDirectoryService<R, H, T> {
    /// Create a new service from its collaborators.
    pub fn new(officers: Arc<R>, hasher: Arc<H>, tokens: Arc<T>, clock: Arc<dyn Clock>) -> Self {
        Self {
            officers,
            hasher,
            tokens,
            clock,
        }
    }
}

#[async_trait]
impl<R, H, T> OfficerDirectory for OfficerDirectoryService<R, H, T>
where
    R: OfficerRepository,
    H: PasswordHasher,
    T: AccessTokens,
{
    async fn sign_up(&self, signup: OfficerSignup) -> Result<Officer, Error> {
        if let Some(field) = self
            .officers
            .find_identity_conflict(signup.id_number(), signup.email())
            .await
            .map_err(map_repository_error)?
        {
            return Err(duplicate_identity(field));
        }

        let hash = self
            .hasher
            .hash(signup.password())
            .await
            .map_err(map_hash_error)?;
        let officer = Officer::register(&signup, hash, self.clock.utc());
        self.officers
            .insert(&officer)
            .await
            .map_err(map_repository_error)?;

        info!(officer_id = %officer.id(), station = officer.station(), "officer signed up");
        Ok(officer)
    }

    async fn login(&self, credentials: LoginCredentials) -> Result<OfficerSession, Error> {
        let Ok(email) = Email::parse(credentials.identifier()) else {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };
        let Some(officer) = self
            .officers
            .find_by_email(&email)
            .await
            .map_err(map_repository_error)?
        else {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        let matches = self
            .hasher
            .verify(credentials.password(), officer.password_hash())
            .await
            .map_err(map_hash_error)?;
        if !matches {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }
        if officer.status() != OfficerStatus::Approved {
            warn!(officer_id = %officer.id(), status = %officer.status(), "login refused for unapproved officer");
            return Err(Error::forbidden(NOT_APPROVED));
        }

        let principal = Principal::new(*officer.id().as_uuid(), Role::Officer);
        let token = self
            .tokens
            .issue(principal, self.clock.utc())
            .map_err(map_token_error)?;
        Ok(OfficerSession { token, officer })
    }

    async fn pending(&self) -> Result<Vec<Officer>, Error> {
        self.officers
            .list_pending()
            .await
            .map_err(map_repository_error)
    }

    async fn decide(&self, id: OfficerId, decision: OfficerDecision) -> Result<Officer, Error> {
        match self
            .officers
            .decide(id, decision)
            .await
            .map_err(map_repository_error)?
        {
            DecisionOutcome::Applied(officer) => {
                info!(officer_id = %id, status = %officer.status(), "officer decision applied");
                Ok(officer)
            }
            DecisionOutcome::NotFound => Err(Error::not_found("officer not found")),
            DecisionOutcome::NotEligible(status) => {
                Err(Error::not_eligible(format!("officer already {status}")))
            }
        }
    }
}

#[cfg(test)]
#[path = "officer_directory_service_tests.rs"]
mod tests;

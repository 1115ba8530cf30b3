//! PostgreSQL-backed `OfficerRepository` implementation using Diesel ORM.
//!
//! Identity uniqueness is enforced by the `officers_id_number_key` and
//! `officers_email_key` constraints; violations are reported as
//! [`OfficerRepositoryError::Duplicate`]. Decisions are a single conditional
//! update on `status = 'pending'`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{
    DecisionOutcome, IdentityField, OfficerRepository, OfficerRepositoryError,
};
use crate::domain::{
    Email, Officer, OfficerDecision, OfficerDraft, OfficerId, OfficerStatus, PasswordHash,
};

use super::diesel_basic_error_mapping::{
    map_basic_diesel_error, map_basic_pool_error, unique_violation,
};
use super::models::{NewOfficerRow, OfficerRow};
use super::pool::{DbPool, PoolError};
use super::schema::officers;

/// Diesel-backed implementation of the officer repository port.
#[derive(Clone)]
pub struct DieselOfficerRepository {
    pool: DbPool,
}

impl DieselOfficerRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> OfficerRepositoryError {
    map_basic_pool_error(error, |message| OfficerRepositoryError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> OfficerRepositoryError {
    if let Some(constraint) = unique_violation(&error) {
        let field = if constraint.contains("email") {
            IdentityField::Email
        } else {
            IdentityField::IdNumber
        };
        return OfficerRepositoryError::duplicate(field);
    }
    map_basic_diesel_error(
        error,
        OfficerRepositoryError::query,
        OfficerRepositoryError::connection,
    )
}

fn row_to_officer(row: OfficerRow) -> Result<Officer, OfficerRepositoryError> {
    let status = row
        .status
        .parse::<OfficerStatus>()
        .map_err(|err| OfficerRepositoryError::query(err.to_string()))?;
    let email = Email::parse(&row.email).map_err(|err| {
        warn!(officer_id = %row.id, "stored officer email failed validation");
        OfficerRepositoryError::query(err.to_string())
    })?;
    Ok(Officer::from(OfficerDraft {
        id: OfficerId::from_uuid(row.id),
        id_number: row.id_number,
        email,
        phone_number: row.phone_number,
        full_name: row.full_name,
        station: row.station,
        password_hash: PasswordHash::new(row.password_hash),
        status,
        created_at: row.created_at,
    }))
}

#[async_trait]
impl OfficerRepository for DieselOfficerRepository {
    async fn insert(&self, officer: &Officer) -> Result<(), OfficerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewOfficerRow {
            id: *officer.id().as_uuid(),
            id_number: officer.id_number(),
            email: officer.email().as_str(),
            phone_number: officer.phone_number(),
            full_name: officer.full_name(),
            station: officer.station(),
            password_hash: officer.password_hash().as_str(),
            status: officer.status().as_str(),
            created_at: officer.created_at(),
        };

        diesel::insert_into(officers::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_identity_conflict(
        &self,
        id_number: &str,
        email: &Email,
    ) -> Result<Option<IdentityField>, OfficerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let existing: Vec<(String, String)> = officers::table
            .filter(
                officers::id_number
                    .eq(id_number)
                    .or(officers::email.eq(email.as_str())),
            )
            .select((officers::id_number, officers::email))
            .limit(2)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        if existing.iter().any(|(stored, _)| stored == id_number) {
            return Ok(Some(IdentityField::IdNumber));
        }
        Ok((!existing.is_empty()).then_some(IdentityField::Email))
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<Officer>, OfficerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        officers::table
            .filter(officers::email.eq(email.as_str()))
            .select(OfficerRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_officer)
            .transpose()
    }

    async fn find_by_id(&self, id: OfficerId) -> Result<Option<Officer>, OfficerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        officers::table
            .find(id.as_uuid())
            .select(OfficerRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_officer)
            .transpose()
    }

    async fn list_pending(&self) -> Result<Vec<Officer>, OfficerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        officers::table
            .filter(officers::status.eq(OfficerStatus::Pending.as_str()))
            .order(officers::created_at.desc())
            .select(OfficerRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?
            .into_iter()
            .map(row_to_officer)
            .collect()
    }

    async fn decide(
        &self,
        id: OfficerId,
        decision: OfficerDecision,
    ) -> Result<DecisionOutcome, OfficerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated: Option<OfficerRow> = diesel::update(
            officers::table
                .filter(officers::id.eq(id.as_uuid()))
                .filter(officers::status.eq(OfficerStatus::Pending.as_str())),
        )
        .set(officers::status.eq(decision.target_status().as_str()))
        .returning(OfficerRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

        if let Some(row) = updated {
            return row_to_officer(row).map(DecisionOutcome::Applied);
        }

        let current: Option<String> = officers::table
            .find(id.as_uuid())
            .select(officers::status)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        match current {
            None => Ok(DecisionOutcome::NotFound),
            Some(status) => status
                .parse::<OfficerStatus>()
                .map(DecisionOutcome::NotEligible)
                .map_err(|err| OfficerRepositoryError::query(err.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for officer row mapping.
    use chrono::Utc;
    use rstest::rstest;
    use uuid::Uuid;

    use super::*;

    fn row(status: &str, email: &str) -> OfficerRow {
        OfficerRow {
            id: Uuid::new_v4(),
            id_number: "12345678".into(),
            email: email.into(),
            phone_number: "+254700000001".into(),
            full_name: "Jane Wanjiru".into(),
            station: "Nairobi Central".into(),
            password_hash: "$argon2id$v=19$fixture".into(),
            status: status.into(),
            created_at: Utc::now(),
        }
    }

    #[rstest]
    #[case("pending", OfficerStatus::Pending)]
    #[case("approved", OfficerStatus::Approved)]
    #[case("rejected", OfficerStatus::Rejected)]
    fn rows_map_known_statuses(#[case] raw: &str, #[case] expected: OfficerStatus) {
        let officer = row_to_officer(row(raw, "jane@example.org")).expect("valid row");
        assert_eq!(officer.status(), expected);
    }

    #[rstest]
    fn unknown_status_is_a_query_error() {
        let error = row_to_officer(row("suspended", "jane@example.org")).expect_err("invalid");
        assert!(matches!(error, OfficerRepositoryError::Query { .. }));
    }

    #[rstest]
    fn pool_errors_are_connection_errors() {
        let error = map_pool_error(PoolError::checkout("timed out"));
        assert_eq!(error, OfficerRepositoryError::connection("timed out"));
    }
}

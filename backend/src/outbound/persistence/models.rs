//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions back into domain types go
//! through the domain constructors so stored data is revalidated on read.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{admins, application_events, applications, documents, officers};

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

/// Row struct for reading from the officers table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = officers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct OfficerRow {
    pub id: Uuid,
    pub id_number: String,
    pub email: String,
    pub phone_number: String,
    pub full_name: String,
    pub station: String,
    pub password_hash: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for newly registered officers.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = officers)]
pub(crate) struct NewOfficerRow<'a> {
    pub id: Uuid,
    pub id_number: &'a str,
    pub email: &'a str,
    pub phone_number: &'a str,
    pub full_name: &'a str,
    pub station: &'a str,
    pub password_hash: &'a str,
    pub status: &'a str,
    pub created_at: DateTime<Utc>,
}

/// Row struct for reading from the admins table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = admins)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AdminRow {
    pub id: Uuid,
    pub username: String,
    pub full_name: String,
    pub password_hash: String,
}

/// Insertable struct for seeded admins.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = admins)]
pub(crate) struct NewAdminRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub full_name: &'a str,
    pub password_hash: &'a str,
}

// ---------------------------------------------------------------------------
// Applications
// ---------------------------------------------------------------------------

/// Row struct for reading from the applications table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = applications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ApplicationRow {
    pub id: Uuid,
    pub application_number: String,
    pub officer_id: Uuid,
    pub application_type: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub place_of_birth: String,
    pub phone_number: String,
    pub address: String,
    pub father_name: String,
    pub mother_name: String,
    pub previous_id_number: Option<String>,
    pub supporting_documents: serde_json::Value,
    pub status: String,
    pub generated_id_number: Option<String>,
    pub card_arrived: bool,
    pub collected: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for submitted applications.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = applications)]
pub(crate) struct NewApplicationRow<'a> {
    pub id: Uuid,
    pub application_number: &'a str,
    pub officer_id: Uuid,
    pub application_type: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub date_of_birth: NaiveDate,
    pub gender: &'a str,
    pub place_of_birth: &'a str,
    pub phone_number: &'a str,
    pub address: &'a str,
    pub father_name: &'a str,
    pub mother_name: &'a str,
    pub previous_id_number: Option<&'a str>,
    pub supporting_documents: &'a serde_json::Value,
    pub status: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset written by lifecycle transitions.
///
/// `treat_none_as_null` so a transition can never leave a stale ID number.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = applications)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct ApplicationStateUpdate<'a> {
    pub status: &'a str,
    pub generated_id_number: Option<&'a str>,
    pub card_arrived: bool,
    pub collected: bool,
    pub updated_at: DateTime<Utc>,
}

/// Row struct for reading from the documents table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = documents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DocumentRow {
    pub id: Uuid,
    pub application_id: Uuid,
    pub document_type: String,
    pub file_path: String,
    pub original_name: String,
    pub uploaded_at: DateTime<Utc>,
}

/// Insertable struct for document metadata.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = documents)]
pub(crate) struct NewDocumentRow<'a> {
    pub id: Uuid,
    pub application_id: Uuid,
    pub document_type: &'a str,
    pub file_path: &'a str,
    pub original_name: &'a str,
    pub uploaded_at: DateTime<Utc>,
}

/// Row struct for reading from the application_events table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = application_events)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ApplicationEventRow {
    pub id: Uuid,
    pub application_id: Uuid,
    pub action: String,
    pub from_status: Option<String>,
    pub to_status: String,
    pub actor_role: String,
    pub actor_id: Uuid,
    pub occurred_at: DateTime<Utc>,
}

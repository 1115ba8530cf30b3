//! JSON views returned by the HTTP adapter.
//!
//! Domain types stay free of wire concerns; these views fix the camelCase
//! field names, render timestamps as RFC 3339 strings and never expose
//! password hashes.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{ApplicationDetail, ApplicationListing};
use crate::domain::{
    Admin, ApplicantDetails, Application, ApplicationEvent, IdNumber, Officer, StoredDocument,
};

fn rfc3339(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Plain acknowledgement body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Officer registered; awaiting approval")]
    pub message: String,
}

impl MessageResponse {
    /// Wrap an acknowledgement message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Officer profile returned on login.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OfficerProfile {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub station: String,
}

impl From<&Officer> for OfficerProfile {
    fn from(officer: &Officer) -> Self {
        Self {
            id: officer.id().to_string(),
            email: officer.email().to_string(),
            full_name: officer.full_name().to_owned(),
            station: officer.station().to_owned(),
        }
    }
}

/// Officer record shown to administrators.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OfficerView {
    pub id: String,
    pub id_number: String,
    pub email: String,
    pub phone_number: String,
    pub full_name: String,
    pub station: String,
    #[schema(example = "pending")]
    pub status: String,
    pub created_at: String,
}

impl From<&Officer> for OfficerView {
    fn from(officer: &Officer) -> Self {
        Self {
            id: officer.id().to_string(),
            id_number: officer.id_number().to_owned(),
            email: officer.email().to_string(),
            phone_number: officer.phone_number().to_owned(),
            full_name: officer.full_name().to_owned(),
            station: officer.station().to_owned(),
            status: officer.status().to_string(),
            created_at: rfc3339(officer.created_at()),
        }
    }
}

/// Admin profile returned on login.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminProfile {
    pub username: String,
    pub full_name: String,
}

impl From<&Admin> for AdminProfile {
    fn from(admin: &Admin) -> Self {
        Self {
            username: admin.username().to_owned(),
            full_name: admin.full_name().to_owned(),
        }
    }
}

/// Applicant biographical fields.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantView {
    pub first_name: String,
    pub last_name: String,
    #[schema(example = "1990-05-17")]
    pub date_of_birth: String,
    pub gender: String,
    pub place_of_birth: String,
    pub phone_number: String,
    pub address: String,
    pub father_name: String,
    pub mother_name: String,
    pub previous_id_number: Option<String>,
}

impl From<&ApplicantDetails> for ApplicantView {
    fn from(applicant: &ApplicantDetails) -> Self {
        Self {
            first_name: applicant.first_name().to_owned(),
            last_name: applicant.last_name().to_owned(),
            date_of_birth: applicant.date_of_birth().to_string(),
            gender: applicant.gender().to_owned(),
            place_of_birth: applicant.place_of_birth().to_owned(),
            phone_number: applicant.phone_number().to_owned(),
            address: applicant.address().to_owned(),
            father_name: applicant.father_name().to_owned(),
            mother_name: applicant.mother_name().to_owned(),
            previous_id_number: applicant.previous_id_number().map(str::to_owned),
        }
    }
}

/// Application record with optional officer name.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationView {
    pub id: String,
    #[schema(example = "APP2025000001")]
    pub application_number: String,
    pub officer_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub officer_name: Option<String>,
    #[schema(example = "new")]
    pub application_type: String,
    pub applicant: ApplicantView,
    #[schema(value_type = Object)]
    pub supporting_documents: serde_json::Value,
    #[schema(example = "submitted")]
    pub status: String,
    #[schema(example = "ID202500000001")]
    pub generated_id_number: Option<String>,
    pub card_arrived: bool,
    pub collected: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl ApplicationView {
    fn build(application: &Application, officer_name: Option<String>) -> Self {
        Self {
            id: application.id().to_string(),
            application_number: application.application_number().to_string(),
            officer_id: application.officer_id().to_string(),
            officer_name,
            application_type: application.application_type().as_str().to_owned(),
            applicant: ApplicantView::from(application.applicant()),
            supporting_documents: application.supporting_documents().clone(),
            status: application.status().to_string(),
            generated_id_number: application
                .generated_id_number()
                .map(IdNumber::to_string),
            card_arrived: application.card_arrived(),
            collected: application.collected(),
            created_at: rfc3339(application.created_at()),
            updated_at: rfc3339(application.updated_at()),
        }
    }
}

impl From<&Application> for ApplicationView {
    fn from(application: &Application) -> Self {
        Self::build(application, None)
    }
}

impl From<&ApplicationListing> for ApplicationView {
    fn from(listing: &ApplicationListing) -> Self {
        Self::build(&listing.application, listing.officer_name.clone())
    }
}

/// Public status summary returned by tracking. Applicant details are
/// omitted because the endpoint is unauthenticated.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrackingView {
    #[schema(example = "APP2025000001")]
    pub application_number: String,
    pub application_type: String,
    pub status: String,
    pub generated_id_number: Option<String>,
    pub card_arrived: bool,
    pub collected: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Application> for TrackingView {
    fn from(application: &Application) -> Self {
        Self {
            application_number: application.application_number().to_string(),
            application_type: application.application_type().as_str().to_owned(),
            status: application.status().to_string(),
            generated_id_number: application
                .generated_id_number()
                .map(IdNumber::to_string),
            card_arrived: application.card_arrived(),
            collected: application.collected(),
            created_at: rfc3339(application.created_at()),
            updated_at: rfc3339(application.updated_at()),
        }
    }
}

/// Stored supporting document.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentView {
    pub id: String,
    #[schema(example = "passport_photo")]
    pub document_type: String,
    pub file_path: String,
    pub original_name: String,
    pub uploaded_at: String,
}

impl From<&StoredDocument> for DocumentView {
    fn from(document: &StoredDocument) -> Self {
        Self {
            id: document.id.to_string(),
            document_type: document.document_type.to_string(),
            file_path: document.file_path.clone(),
            original_name: document.original_name.clone(),
            uploaded_at: rfc3339(document.uploaded_at),
        }
    }
}

/// Application with its documents.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApplicationDetailView {
    pub application: ApplicationView,
    pub documents: Vec<DocumentView>,
}

impl From<&ApplicationDetail> for ApplicationDetailView {
    fn from(detail: &ApplicationDetail) -> Self {
        Self {
            application: ApplicationView::from(&detail.listing),
            documents: detail.documents.iter().map(DocumentView::from).collect(),
        }
    }
}

/// One audit record.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventView {
    #[schema(example = "approve")]
    pub action: String,
    pub from_status: Option<String>,
    pub to_status: String,
    #[schema(example = "admin")]
    pub actor_role: String,
    pub actor_id: String,
    pub occurred_at: String,
}

impl From<&ApplicationEvent> for EventView {
    fn from(event: &ApplicationEvent) -> Self {
        Self {
            action: event.action.to_string(),
            from_status: event.from_status.map(|status| status.to_string()),
            to_status: event.to_status.to_string(),
            actor_role: event.actor.role().to_string(),
            actor_id: event.actor.account_id().to_string(),
            occurred_at: rfc3339(event.occurred_at),
        }
    }
}

/// Result of an applied transition.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TransitionResponse {
    pub message: String,
    pub application: ApplicationView,
}

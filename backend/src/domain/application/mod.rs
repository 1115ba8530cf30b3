//! Citizen ID applications.
//!
//! An application is created by an officer on behalf of an applicant and then
//! moves through the lifecycle described in [`transition`]. Its status and
//! derived fields never change outside a [`Transition`].

mod applicant;
mod document;
mod event;
pub mod transition;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{ApplicationNumber, IdNumber, OfficerId};

pub use applicant::{ApplicantDetails, ApplicantDraft, ApplicantRecord, ApplicantValidationError};
pub use document::{
    DocumentType, DocumentUpload, NewDocument, StoredDocument, UnknownDocumentType,
    sanitize_file_name, stored_file_name,
};
pub use event::{ApplicationEvent, EventAction};
pub use transition::{Actor, Ineligibility, Transition, TransitionOutcome, TransitionRequest};

/// Stable application identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationId(Uuid);

impl ApplicationId {
    /// Generate a fresh identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the inner UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether the applicant is applying for the first time or renewing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationType {
    /// First-time application.
    New,
    /// Replacement of an existing ID.
    Renewal,
}

impl ApplicationType {
    /// Stable storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Renewal => "renewal",
        }
    }
}

impl FromStr for ApplicationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "new" => Ok(Self::New),
            "renewal" => Ok(Self::Renewal),
            other => Err(format!("unknown application type: {other}")),
        }
    }
}

/// Lifecycle status of an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    /// Awaiting an administrator decision.
    Submitted,
    /// Approved; an ID number has been generated.
    Approved,
    /// Refused; terminal.
    Rejected,
    /// The card has been dispatched; terminal.
    Dispatched,
}

impl ApplicationStatus {
    /// Stable storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Dispatched => "dispatched",
        }
    }

    /// Whether an application in this status carries a generated ID number.
    #[must_use]
    pub const fn carries_id_number(self) -> bool {
        matches!(self, Self::Approved | Self::Dispatched)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "submitted" => Ok(Self::Submitted),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "dispatched" => Ok(Self::Dispatched),
            other => Err(format!("unknown application status: {other}")),
        }
    }
}

/// Violations of the application record invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApplicationValidationError {
    /// Approved and dispatched records must carry an ID number; others must not.
    #[error("generated ID number presence does not match status {0}")]
    IdNumberMismatch(ApplicationStatus),
    /// Collection recorded before arrival.
    #[error("collected is set without card_arrived")]
    CollectedBeforeArrival,
    /// Card arrival recorded on an application that was never approved.
    #[error("card_arrived is set on a {0} application")]
    ArrivalWithoutApproval(ApplicationStatus),
}

/// Field bundle used to construct an [`Application`].
#[derive(Debug, Clone)]
pub struct ApplicationDraft {
    pub id: ApplicationId,
    pub application_number: ApplicationNumber,
    pub officer_id: OfficerId,
    pub application_type: ApplicationType,
    pub applicant: ApplicantDetails,
    pub supporting_documents: serde_json::Value,
    pub status: ApplicationStatus,
    pub generated_id_number: Option<IdNumber>,
    pub card_arrived: bool,
    pub collected: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Application aggregate.
///
/// ## Invariants
/// - `generated_id_number` is present iff status is approved or dispatched.
/// - `collected` implies `card_arrived`.
/// - `card_arrived` implies the application was approved.
#[derive(Debug, Clone, PartialEq)]
pub struct Application {
    id: ApplicationId,
    application_number: ApplicationNumber,
    officer_id: OfficerId,
    application_type: ApplicationType,
    applicant: ApplicantDetails,
    supporting_documents: serde_json::Value,
    status: ApplicationStatus,
    generated_id_number: Option<IdNumber>,
    card_arrived: bool,
    collected: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Application {
    /// Validate a draft into an application.
    pub fn new(draft: ApplicationDraft) -> Result<Self, ApplicationValidationError> {
        let ApplicationDraft {
            id,
            application_number,
            officer_id,
            application_type,
            applicant,
            supporting_documents,
            status,
            generated_id_number,
            card_arrived,
            collected,
            created_at,
            updated_at,
        } = draft;

        if generated_id_number.is_some() != status.carries_id_number() {
            return Err(ApplicationValidationError::IdNumberMismatch(status));
        }
        if collected && !card_arrived {
            return Err(ApplicationValidationError::CollectedBeforeArrival);
        }
        if card_arrived && !status.carries_id_number() {
            return Err(ApplicationValidationError::ArrivalWithoutApproval(status));
        }

        Ok(Self {
            id,
            application_number,
            officer_id,
            application_type,
            applicant,
            supporting_documents,
            status,
            generated_id_number,
            card_arrived,
            collected,
            created_at,
            updated_at,
        })
    }

    /// Create a freshly submitted application.
    #[must_use]
    pub fn submit(submission: NewApplication, application_number: ApplicationNumber) -> Self {
        let NewApplication {
            id,
            officer_id,
            application_type,
            applicant,
            supporting_documents,
            submitted_at,
        } = submission;
        Self {
            id,
            application_number,
            officer_id,
            application_type,
            applicant,
            supporting_documents,
            status: ApplicationStatus::Submitted,
            generated_id_number: None,
            card_arrived: false,
            collected: false,
            created_at: submitted_at,
            updated_at: submitted_at,
        }
    }

    #[must_use]
    pub const fn id(&self) -> ApplicationId {
        self.id
    }

    #[must_use]
    pub const fn application_number(&self) -> &ApplicationNumber {
        &self.application_number
    }

    #[must_use]
    pub const fn officer_id(&self) -> OfficerId {
        self.officer_id
    }

    #[must_use]
    pub const fn application_type(&self) -> ApplicationType {
        self.application_type
    }

    #[must_use]
    pub const fn applicant(&self) -> &ApplicantDetails {
        &self.applicant
    }

    /// Submitted document metadata keyed by document field.
    #[must_use]
    pub const fn supporting_documents(&self) -> &serde_json::Value {
        &self.supporting_documents
    }

    #[must_use]
    pub const fn status(&self) -> ApplicationStatus {
        self.status
    }

    #[must_use]
    pub const fn generated_id_number(&self) -> Option<&IdNumber> {
        self.generated_id_number.as_ref()
    }

    #[must_use]
    pub const fn card_arrived(&self) -> bool {
        self.card_arrived
    }

    #[must_use]
    pub const fn collected(&self) -> bool {
        self.collected
    }

    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// Application data supplied by an officer before a number is allocated.
#[derive(Debug, Clone, PartialEq)]
pub struct NewApplication {
    pub id: ApplicationId,
    pub officer_id: OfficerId,
    pub application_type: ApplicationType,
    pub applicant: ApplicantDetails,
    pub supporting_documents: serde_json::Value,
    pub submitted_at: DateTime<Utc>,
}

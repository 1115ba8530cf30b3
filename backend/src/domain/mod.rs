//! Domain primitives, aggregates and services.
//!
//! Purpose: Define strongly typed entities used by the HTTP and persistence
//! adapters, the application lifecycle state machine, and the services that
//! implement the driving ports. Types validate on construction and stay
//! immutable afterwards; adapters rebuild them through the same constructors.
//!
//! Public surface:
//! - Error / ErrorCode: API error payload and stable error identifiers.
//! - ApplicationNumber / IdNumber: sequential public identifiers.
//! - Officer, Admin, Application: the aggregates.
//! - Transition: the lifecycle state machine.

pub mod admin;
mod admin_login_service;
pub mod application;
mod application_service;
pub mod auth;
pub mod error;
pub mod identifiers;
pub mod officer;
mod officer_directory_service;
pub mod ports;
pub mod trace_id;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use self::admin::Admin;
pub use self::admin_login_service::{AdminLoginService, AdminSeed, seed_admin};
pub use self::application::{
    Actor, ApplicantDetails, ApplicantDraft, ApplicantRecord, ApplicantValidationError,
    Application, ApplicationDraft, ApplicationEvent, ApplicationId, ApplicationStatus,
    ApplicationType, ApplicationValidationError, DocumentType, DocumentUpload, EventAction,
    Ineligibility, NewApplication, NewDocument, StoredDocument, Transition, TransitionOutcome,
    TransitionRequest, UnknownDocumentType, sanitize_file_name, stored_file_name,
};
pub use self::application_service::ApplicationService;
pub use self::auth::{
    AccessToken, LoginCredentials, LoginValidationError, PasswordHash, Principal, Role,
};
pub use self::error::{Error, ErrorCode};
pub use self::identifiers::{ApplicationNumber, IdNumber, IdentifierError, IdentifierScope};
pub use self::officer::{
    Email, EmailValidationError, Officer, OfficerDecision, OfficerDraft, OfficerId,
    OfficerSignup, OfficerSignupDraft, OfficerStatus, SignupValidationError, UnknownOfficerStatus,
};
pub use self::officer_directory_service::OfficerDirectoryService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use idtrack::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;

//! Officer accounts and their approval lifecycle.
//!
//! Officers sign up with their identity details and wait in `pending` until
//! an administrator approves or rejects them. Only approved officers may log
//! in; both decisions are terminal.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::domain::PasswordHash;

/// Stable officer identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OfficerId(Uuid);

impl OfficerId {
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

impl fmt::Display for OfficerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Approval state of an officer account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfficerStatus {
    /// Awaiting an administrator decision.
    Pending,
    /// May log in and submit applications.
    Approved,
    /// Permanently refused.
    Rejected,
}

impl OfficerStatus {
    /// Stable storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for OfficerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error raised when a stored status string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown officer status: {0}")]
pub struct UnknownOfficerStatus(pub String);

impl FromStr for OfficerStatus {
    type Err = UnknownOfficerStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(UnknownOfficerStatus(other.to_owned())),
        }
    }
}

/// Administrator decision on a pending officer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfficerDecision {
    /// Move the officer to [`OfficerStatus::Approved`].
    Approve,
    /// Move the officer to [`OfficerStatus::Rejected`].
    Reject,
}

impl OfficerDecision {
    /// Status the officer ends up in once the decision applies.
    #[must_use]
    pub const fn target_status(self) -> OfficerStatus {
        match self {
            Self::Approve => OfficerStatus::Approved,
            Self::Reject => OfficerStatus::Rejected,
        }
    }
}

/// Email address normalised for case-insensitive uniqueness.
///
/// # Examples
/// ```
/// use idtrack::domain::Email;
///
/// let email = Email::parse("  Jane.Doe@Example.ORG ").expect("valid email");
/// assert_eq!(email.as_ref(), "jane.doe@example.org");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Email(String);

/// Validation errors for [`Email`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmailValidationError {
    /// Nothing left after trimming.
    #[error("email must not be empty")]
    Empty,
    /// Missing the local part, the `@` or the domain.
    #[error("email must look like name@domain")]
    Malformed,
}

impl Email {
    /// Trim, lowercase and validate an email address.
    pub fn parse(raw: &str) -> Result<Self, EmailValidationError> {
        let normalised = raw.trim().to_lowercase();
        if normalised.is_empty() {
            return Err(EmailValidationError::Empty);
        }
        match normalised.split_once('@') {
            Some((local, domain))
                if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
            {
                Ok(Self(normalised))
            }
            _ => Err(EmailValidationError::Malformed),
        }
    }

    /// Normalised address as stored.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Raw signup fields as received from a client.
#[derive(Debug, Clone, Default)]
pub struct OfficerSignupDraft {
    pub id_number: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub full_name: Option<String>,
    pub station: Option<String>,
    pub password: Option<String>,
}

/// Validation errors for officer signup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignupValidationError {
    /// A required field was absent or blank. Carries the client field name.
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    /// The email could not be parsed.
    #[error(transparent)]
    InvalidEmail(#[from] EmailValidationError),
    /// A field exceeds its stored width, in characters.
    #[error("{field} must be at most {max} characters")]
    TooLong {
        /// Client field name.
        field: &'static str,
        /// Largest accepted length.
        max: usize,
    },
}

/// Validated signup request.
#[derive(Debug, Clone)]
pub struct OfficerSignup {
    id_number: String,
    email: Email,
    phone_number: String,
    full_name: String,
    station: String,
    password: Zeroizing<String>,
}

fn required(value: Option<String>, field: &'static str) -> Result<String, SignupValidationError> {
    value
        .map(|raw| raw.trim().to_owned())
        .filter(|trimmed| !trimmed.is_empty())
        .ok_or(SignupValidationError::MissingField(field))
}

const MAX_ID_NUMBER_CHARS: usize = 32;
const MAX_EMAIL_CHARS: usize = 254;
const MAX_PHONE_CHARS: usize = 32;
const MAX_NAME_CHARS: usize = 128;

fn within(value: &str, field: &'static str, max: usize) -> Result<(), SignupValidationError> {
    if value.chars().count() > max {
        return Err(SignupValidationError::TooLong { field, max });
    }
    Ok(())
}

fn bounded(
    value: Option<String>,
    field: &'static str,
    max: usize,
) -> Result<String, SignupValidationError> {
    let value = required(value, field)?;
    within(&value, field, max)?;
    Ok(value)
}

impl OfficerSignup {
    /// Validate the six signup fields.
    ///
    /// Text fields are trimmed; the password keeps caller whitespace but must
    /// not be empty.
    pub fn try_from_draft(draft: OfficerSignupDraft) -> Result<Self, SignupValidationError> {
        let OfficerSignupDraft {
            id_number,
            email,
            phone_number,
            full_name,
            station,
            password,
        } = draft;

        let id_number = bounded(id_number, "idNumber", MAX_ID_NUMBER_CHARS)?;
        let email = Email::parse(&required(email, "email")?)?;
        within(email.as_str(), "email", MAX_EMAIL_CHARS)?;
        let phone_number = bounded(phone_number, "phoneNumber", MAX_PHONE_CHARS)?;
        let full_name = bounded(full_name, "fullName", MAX_NAME_CHARS)?;
        let station = bounded(station, "station", MAX_NAME_CHARS)?;
        let password = password
            .filter(|value| !value.is_empty())
            .ok_or(SignupValidationError::MissingField("password"))?;

        Ok(Self {
            id_number,
            email,
            phone_number,
            full_name,
            station,
            password: Zeroizing::new(password),
        })
    }

    /// National identity number of the officer.
    #[must_use]
    pub fn id_number(&self) -> &str {
        &self.id_number
    }

    /// Normalised email.
    #[must_use]
    pub const fn email(&self) -> &Email {
        &self.email
    }

    /// Contact phone number.
    #[must_use]
    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    /// Officer's full name.
    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Registration station.
    #[must_use]
    pub fn station(&self) -> &str {
        &self.station
    }

    /// Plain-text password supplied at signup.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Field bundle used to rebuild an [`Officer`] from storage.
#[derive(Debug, Clone)]
pub struct OfficerDraft {
    pub id: OfficerId,
    pub id_number: String,
    pub email: Email,
    pub phone_number: String,
    pub full_name: String,
    pub station: String,
    pub password_hash: PasswordHash,
    pub status: OfficerStatus,
    pub created_at: DateTime<Utc>,
}

/// Officer account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Officer {
    id: OfficerId,
    id_number: String,
    email: Email,
    phone_number: String,
    full_name: String,
    station: String,
    password_hash: PasswordHash,
    status: OfficerStatus,
    created_at: DateTime<Utc>,
}

impl From<OfficerDraft> for Officer {
    fn from(draft: OfficerDraft) -> Self {
        let OfficerDraft {
            id,
            id_number,
            email,
            phone_number,
            full_name,
            station,
            password_hash,
            status,
            created_at,
        } = draft;
        Self {
            id,
            id_number,
            email,
            phone_number,
            full_name,
            station,
            password_hash,
            status,
            created_at,
        }
    }
}

impl Officer {
    /// Create a freshly signed-up officer in [`OfficerStatus::Pending`].
    #[must_use]
    pub fn register(
        signup: &OfficerSignup,
        password_hash: PasswordHash,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: OfficerId::random(),
            id_number: signup.id_number.clone(),
            email: signup.email.clone(),
            phone_number: signup.phone_number.clone(),
            full_name: signup.full_name.clone(),
            station: signup.station.clone(),
            password_hash,
            status: OfficerStatus::Pending,
            created_at,
        }
    }

    /// Copy of this officer after an applied decision.
    #[must_use]
    pub fn with_status(&self, status: OfficerStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }

    /// Account identifier.
    #[must_use]
    pub const fn id(&self) -> OfficerId {
        self.id
    }

    /// National identity number.
    #[must_use]
    pub fn id_number(&self) -> &str {
        &self.id_number
    }

    #[must_use]
    pub const fn email(&self) -> &Email {
        &self.email
    }

    #[must_use]
    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    #[must_use]
    pub fn station(&self) -> &str {
        &self.station
    }

    /// Stored password credential.
    #[must_use]
    pub const fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// Approval state.
    #[must_use]
    pub const fn status(&self) -> OfficerStatus {
        self.status
    }

    /// Signup time.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

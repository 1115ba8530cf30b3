//! Applicant biographical details.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Raw applicant fields as received from a submission form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicantDraft {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub place_of_birth: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub father_name: Option<String>,
    pub mother_name: Option<String>,
    pub previous_id_number: Option<String>,
}

/// Validation errors for applicant details.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApplicantValidationError {
    /// A required field was absent or blank. Carries the client field name.
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    /// `dateOfBirth` is not an ISO `YYYY-MM-DD` date.
    #[error("dateOfBirth must be a YYYY-MM-DD date")]
    InvalidDateOfBirth,
    /// `dateOfBirth` lies after the submission date.
    #[error("dateOfBirth must not be in the future")]
    FutureDateOfBirth,
    /// A field exceeds its stored width, in characters.
    #[error("{field} must be at most {max} characters")]
    TooLong {
        /// Client field name.
        field: &'static str,
        /// Largest accepted length.
        max: usize,
    },
}

/// Validated applicant details, stored verbatim on the application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantDetails {
    first_name: String,
    last_name: String,
    date_of_birth: NaiveDate,
    gender: String,
    place_of_birth: String,
    phone_number: String,
    address: String,
    father_name: String,
    mother_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    previous_id_number: Option<String>,
}

/// Already-validated applicant fields loaded from storage.
#[derive(Debug, Clone)]
pub struct ApplicantRecord {
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
}

impl From<ApplicantRecord> for ApplicantDetails {
    fn from(record: ApplicantRecord) -> Self {
        let ApplicantRecord {
            first_name,
            last_name,
            date_of_birth,
            gender,
            place_of_birth,
            phone_number,
            address,
            father_name,
            mother_name,
            previous_id_number,
        } = record;
        Self {
            first_name,
            last_name,
            date_of_birth,
            gender,
            place_of_birth,
            phone_number,
            address,
            father_name,
            mother_name,
            previous_id_number,
        }
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ApplicantValidationError> {
    value
        .map(|raw| raw.trim().to_owned())
        .filter(|trimmed| !trimmed.is_empty())
        .ok_or(ApplicantValidationError::MissingField(field))
}

const MAX_NAME_CHARS: usize = 128;
const MAX_SHORT_CHARS: usize = 32;

fn within(
    value: String,
    field: &'static str,
    max: usize,
) -> Result<String, ApplicantValidationError> {
    if value.chars().count() > max {
        return Err(ApplicantValidationError::TooLong { field, max });
    }
    Ok(value)
}

fn bounded(
    value: Option<String>,
    field: &'static str,
    max: usize,
) -> Result<String, ApplicantValidationError> {
    within(required(value, field)?, field, max)
}

impl ApplicantDetails {
    /// Validate raw applicant fields against the submission date.
    pub fn try_from_draft(
        draft: ApplicantDraft,
        today: NaiveDate,
    ) -> Result<Self, ApplicantValidationError> {
        let ApplicantDraft {
            first_name,
            last_name,
            date_of_birth,
            gender,
            place_of_birth,
            phone_number,
            address,
            father_name,
            mother_name,
            previous_id_number,
        } = draft;

        let first_name = bounded(first_name, "firstName", MAX_NAME_CHARS)?;
        let last_name = bounded(last_name, "lastName", MAX_NAME_CHARS)?;
        let date_of_birth = NaiveDate::parse_from_str(
            &required(date_of_birth, "dateOfBirth")?,
            "%Y-%m-%d",
        )
        .map_err(|_| ApplicantValidationError::InvalidDateOfBirth)?;
        if date_of_birth > today {
            return Err(ApplicantValidationError::FutureDateOfBirth);
        }

        Ok(Self {
            first_name,
            last_name,
            date_of_birth,
            gender: bounded(gender, "gender", MAX_SHORT_CHARS)?,
            place_of_birth: bounded(place_of_birth, "placeOfBirth", MAX_NAME_CHARS)?,
            phone_number: bounded(phone_number, "phoneNumber", MAX_SHORT_CHARS)?,
            address: required(address, "address")?,
            father_name: bounded(father_name, "fatherName", MAX_NAME_CHARS)?,
            mother_name: bounded(mother_name, "motherName", MAX_NAME_CHARS)?,
            previous_id_number: previous_id_number
                .map(|raw| raw.trim().to_owned())
                .filter(|trimmed| !trimmed.is_empty())
                .map(|value| within(value, "previousIdNumber", MAX_SHORT_CHARS))
                .transpose()?,
        })
    }

    /// Given name.
    #[must_use]
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    #[must_use]
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// Date of birth, never in the future.
    #[must_use]
    pub const fn date_of_birth(&self) -> NaiveDate {
        self.date_of_birth
    }

    #[must_use]
    pub fn gender(&self) -> &str {
        &self.gender
    }

    #[must_use]
    pub fn place_of_birth(&self) -> &str {
        &self.place_of_birth
    }

    #[must_use]
    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    #[must_use]
    pub fn father_name(&self) -> &str {
        &self.father_name
    }

    #[must_use]
    pub fn mother_name(&self) -> &str {
        &self.mother_name
    }

    /// ID number being replaced, for renewals.
    #[must_use]
    pub fn previous_id_number(&self) -> Option<&str> {
        self.previous_id_number.as_deref()
    }
}

//! Decoding of application submissions.
//!
//! Submissions arrive either as JSON (applicant fields only) or as
//! `multipart/form-data` where text parts carry the same camelCase fields
//! and file parts are keyed by document type.

use actix_multipart::{Field, Multipart};
use futures_util::TryStreamExt;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::SubmitApplicationRequest;
use crate::domain::{
    ApplicantDraft, ApplicationType, DocumentType, DocumentUpload, Error, OfficerId,
};
use crate::inbound::http::validation::{
    FieldName, invalid_value_error, unknown_document_error, unknown_field_error,
};

/// Largest accepted document, in bytes.
pub const MAX_DOCUMENT_BYTES: usize = 10 * 1024 * 1024;

/// Largest accepted submission body. JSON or multipart bodies are buffered
/// whole before the format is chosen, so this bounds memory per request.
pub const MAX_SUBMISSION_BYTES: usize = 64 * 1024 * 1024;

const MAX_TEXT_FIELD_BYTES: usize = 64 * 1024;

/// Applicant fields shared by JSON and multipart submissions.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitApplicationBody {
    /// `new` or `renewal`; defaults to `new`.
    #[schema(example = "new")]
    pub application_type: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[schema(example = "1990-05-17")]
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub place_of_birth: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub father_name: Option<String>,
    pub mother_name: Option<String>,
    pub previous_id_number: Option<String>,
}

impl SubmitApplicationBody {
    fn slot(&mut self, name: &str) -> Option<&mut Option<String>> {
        let slot = match name {
            "applicationType" => &mut self.application_type,
            "firstName" => &mut self.first_name,
            "lastName" => &mut self.last_name,
            "dateOfBirth" => &mut self.date_of_birth,
            "gender" => &mut self.gender,
            "placeOfBirth" => &mut self.place_of_birth,
            "phoneNumber" => &mut self.phone_number,
            "address" => &mut self.address,
            "fatherName" => &mut self.father_name,
            "motherName" => &mut self.mother_name,
            "previousIdNumber" => &mut self.previous_id_number,
            _ => return None,
        };
        Some(slot)
    }

    /// Build the port request for `officer_id`.
    ///
    /// # Errors
    /// Rejects an unknown `applicationType`.
    pub fn into_request(
        self,
        officer_id: OfficerId,
        documents: Vec<DocumentUpload>,
    ) -> Result<SubmitApplicationRequest, Error> {
        let application_type = match self.application_type.as_deref().map(str::trim) {
            None | Some("") => ApplicationType::New,
            Some(raw) => raw.parse::<ApplicationType>().map_err(|_| {
                invalid_value_error(
                    FieldName::new("applicationType"),
                    raw,
                    "applicationType must be new or renewal",
                )
            })?,
        };
        Ok(SubmitApplicationRequest {
            officer_id,
            application_type,
            applicant: ApplicantDraft {
                first_name: self.first_name,
                last_name: self.last_name,
                date_of_birth: self.date_of_birth,
                gender: self.gender,
                place_of_birth: self.place_of_birth,
                phone_number: self.phone_number,
                address: self.address,
                father_name: self.father_name,
                mother_name: self.mother_name,
                previous_id_number: self.previous_id_number,
            },
            documents,
        })
    }
}

/// Decoded multipart submission.
#[derive(Debug, Default)]
pub struct MultipartSubmission {
    pub body: SubmitApplicationBody,
    pub documents: Vec<DocumentUpload>,
}

fn multipart_error(err: impl std::fmt::Display) -> Error {
    Error::invalid_request(format!("malformed multipart body: {err}"))
}

async fn read_field(field: &mut Field, limit: usize, name: &str) -> Result<Vec<u8>, Error> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.try_next().await.map_err(multipart_error)? {
        if bytes.len() + chunk.len() > limit {
            return Err(invalid_value_error(
                FieldName::new("document"),
                name,
                "document exceeds the upload size limit",
            ));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

/// Drain a multipart stream into applicant fields and document uploads.
///
/// # Errors
/// Rejects malformed bodies, unknown part names and oversized files.
pub async fn read_multipart(mut payload: Multipart) -> Result<MultipartSubmission, Error> {
    let mut submission = MultipartSubmission::default();
    while let Some(mut field) = payload.try_next().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_owned();
        let file_name = field
            .content_disposition()
            .and_then(|disposition| disposition.get_filename())
            .map(str::to_owned);

        if let Some(original_name) = file_name {
            let document_type: DocumentType =
                name.parse().map_err(|err| unknown_document_error(&err))?;
            let bytes = read_field(&mut field, MAX_DOCUMENT_BYTES, &original_name).await?;
            submission.documents.push(DocumentUpload {
                document_type,
                original_name,
                bytes,
            });
            continue;
        }

        let bytes = read_field(&mut field, MAX_TEXT_FIELD_BYTES, &name).await?;
        let value = String::from_utf8(bytes).map_err(|_| {
            invalid_value_error(FieldName::new("form"), &name, "form fields must be UTF-8")
        })?;
        let Some(slot) = submission.body.slot(&name) else {
            return Err(unknown_field_error(&name));
        };
        *slot = Some(value);
    }
    Ok(submission)
}

#[cfg(test)]
mod tests {
    //! Conversion checks for submission bodies.
    use super::*;

    #[test]
    fn missing_type_defaults_to_new() {
        let request = SubmitApplicationBody::default()
            .into_request(OfficerId::random(), Vec::new())
            .expect("valid");
        assert_eq!(request.application_type, ApplicationType::New);
    }

    #[test]
    fn unknown_type_is_rejected() {
        let body = SubmitApplicationBody {
            application_type: Some("replacement".into()),
            ..SubmitApplicationBody::default()
        };
        let error = body
            .into_request(OfficerId::random(), Vec::new())
            .expect_err("invalid type");
        assert_eq!(error.details().expect("details")["field"], "applicationType");
    }

    #[test]
    fn text_slots_cover_applicant_fields() {
        let mut body = SubmitApplicationBody::default();
        for name in ["firstName", "motherName", "previousIdNumber", "applicationType"] {
            *body.slot(name).expect("known field") = Some(name.to_owned());
        }
        assert!(body.slot("passport_photo").is_none());
        assert_eq!(body.mother_name.as_deref(), Some("motherName"));
    }
}

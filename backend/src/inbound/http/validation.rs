//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every helper produces an `invalid_request` error whose details carry the
//! client field name and a machine code.

use serde_json::json;
use uuid::Uuid;

use crate::domain::{
    EmailValidationError, Error, LoginValidationError, SignupValidationError, UnknownDocumentType,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    InvalidEmail,
    InvalidValue,
    UnknownField,
    TooLong,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidEmail => "invalid_email",
            ErrorCode::InvalidValue => "invalid_value",
            ErrorCode::UnknownField => "unknown_field",
            ErrorCode::TooLong => "too_long",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    const fn as_str(self) -> &'static str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("missing required field: {field}"))
        .with_code(ErrorCode::MissingField)
}

pub(crate) fn invalid_value_error(field: FieldName, value: &str, message: &str) -> Error {
    ValidationError::new(field.as_str(), message).with_value(ErrorCode::InvalidValue, value)
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must be a valid UUID"))
        .with_value(ErrorCode::InvalidUuid, value)
}

pub(crate) fn parse_uuid(value: &str, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(value.trim()).map_err(|_| invalid_uuid_error(field, value))
}

pub(crate) fn unknown_field_error(name: &str) -> Error {
    ValidationError::new(name, format!("unknown form field: {name}"))
        .with_value(ErrorCode::UnknownField, name)
}

pub(crate) fn unknown_document_error(err: &UnknownDocumentType) -> Error {
    ValidationError::new(err.0.as_str(), err.to_string())
        .with_value(ErrorCode::UnknownField, err.0.as_str())
}

pub(crate) fn map_signup_validation_error(err: SignupValidationError) -> Error {
    match err {
        SignupValidationError::MissingField(field) => missing_field_error(FieldName::new(field)),
        SignupValidationError::InvalidEmail(email) => map_email_error(&email),
        SignupValidationError::TooLong { field, max } => {
            ValidationError::new(field, format!("{field} must be at most {max} characters"))
                .with_code(ErrorCode::TooLong)
        }
    }
}

fn map_email_error(err: &EmailValidationError) -> Error {
    match err {
        EmailValidationError::Empty => missing_field_error(FieldName::new("email")),
        EmailValidationError::Malformed => {
            ValidationError::new("email", err.to_string()).with_code(ErrorCode::InvalidEmail)
        }
    }
}

pub(crate) fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyIdentifier(field) => missing_field_error(FieldName::new(field)),
        LoginValidationError::EmptyPassword => missing_field_error(FieldName::new("password")),
    }
}

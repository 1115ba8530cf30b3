//! Supporting documents uploaded with an application.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{ApplicationId, ApplicationNumber};

/// Kinds of supporting document accepted with a submission.
///
/// The serialised form doubles as the multipart field key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    PassportPhoto,
    BirthCertificate,
    ParentIdFront,
    ParentIdBack,
    PreviousId,
    PoliceAbstract,
}

impl DocumentType {
    /// Every accepted document type.
    pub const ALL: [Self; 6] = [
        Self::PassportPhoto,
        Self::BirthCertificate,
        Self::ParentIdFront,
        Self::ParentIdBack,
        Self::PreviousId,
        Self::PoliceAbstract,
    ];

    /// Form field key and storage representation.
    #[must_use]
    pub const fn field_key(self) -> &'static str {
        match self {
            Self::PassportPhoto => "passport_photo",
            Self::BirthCertificate => "birth_certificate",
            Self::ParentIdFront => "parent_id_front",
            Self::ParentIdBack => "parent_id_back",
            Self::PreviousId => "previous_id",
            Self::PoliceAbstract => "police_abstract",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_key())
    }
}

/// Raised for field keys outside [`DocumentType::ALL`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown document field: {0}")]
pub struct UnknownDocumentType(pub String);

impl FromStr for DocumentType {
    type Err = UnknownDocumentType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.field_key() == s)
            .ok_or_else(|| UnknownDocumentType(s.to_owned()))
    }
}

/// File received with a submission, before it is stored.
#[derive(Clone, PartialEq, Eq)]
pub struct DocumentUpload {
    pub document_type: DocumentType,
    pub original_name: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for DocumentUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentUpload")
            .field("document_type", &self.document_type)
            .field("original_name", &self.original_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Document row to insert alongside a new application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDocument {
    pub id: Uuid,
    pub document_type: DocumentType,
    pub file_path: String,
    pub original_name: String,
}

/// Persisted document metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredDocument {
    pub id: Uuid,
    pub application_id: ApplicationId,
    pub document_type: DocumentType,
    pub file_path: String,
    pub original_name: String,
    pub uploaded_at: DateTime<Utc>,
}

/// Longest sanitised name kept, in bytes. The stored name adds the
/// application number and field key, and must stay within 255 bytes.
const MAX_SANITIZED_NAME_BYTES: usize = 200;
const MAX_KEPT_EXTENSION_BYTES: usize = 16;

/// Shorten an ASCII name, keeping a short extension intact.
fn truncate_keeping_extension(mut name: String) -> String {
    if name.len() <= MAX_SANITIZED_NAME_BYTES {
        return name;
    }
    let extension = match name.rfind('.') {
        Some(dot) if name.len() - dot <= MAX_KEPT_EXTENSION_BYTES => name.split_off(dot),
        _ => String::new(),
    };
    name.truncate(MAX_SANITIZED_NAME_BYTES - extension.len());
    name.push_str(&extension);
    name
}

/// Reduce a client-supplied file name to a safe final path component.
///
/// Directory parts are dropped and characters outside `[A-Za-z0-9._-]`
/// become `_`. Names that reduce to dots only become `_`. Long names are
/// cut to 200 bytes, keeping a short extension.
///
/// # Examples
/// ```
/// use idtrack::domain::sanitize_file_name;
///
/// assert_eq!(sanitize_file_name("C:\\scans\\my photo.jpg"), "my_photo.jpg");
/// assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
/// ```
#[must_use]
pub fn sanitize_file_name(original: &str) -> String {
    let last = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();
    let cleaned: String = last
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-') {
                ch
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.chars().all(|ch| ch == '.') {
        "_".to_owned()
    } else {
        truncate_keeping_extension(cleaned)
    }
}

/// Name under which an uploaded file is stored:
/// `{application_number}_{field_key}_{sanitised original}`.
#[must_use]
pub fn stored_file_name(
    application_number: &ApplicationNumber,
    document_type: DocumentType,
    original: &str,
) -> String {
    format!(
        "{}_{}_{}",
        application_number,
        document_type.field_key(),
        sanitize_file_name(original)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("photo.png", "photo.png")]
    #[case("dir/sub/photo.png", "photo.png")]
    #[case("..", "_")]
    #[case("", "_")]
    #[case("birth cert (1).pdf", "birth_cert__1_.pdf")]
    fn sanitises_names(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(sanitize_file_name(raw), expected);
    }

    #[rstest]
    fn long_names_keep_their_extension() {
        let sanitised = sanitize_file_name(&format!("{}.jpeg", "é".repeat(300)));
        assert_eq!(sanitised.len(), 200);
        assert!(sanitised.ends_with("_.jpeg"));
    }

    #[rstest]
    fn long_names_without_short_extension_are_cut() {
        let sanitised = sanitize_file_name(&format!("scan.{}", "x".repeat(300)));
        assert_eq!(sanitised.len(), 200);
        assert!(sanitised.starts_with("scan.xxx"));
    }

    #[rstest]
    fn longest_stored_name_fits_a_file_name() {
        let number = ApplicationNumber::parse("APP2025000001").expect("valid");
        let name = stored_file_name(&number, DocumentType::BirthCertificate, &"b".repeat(400));
        assert!(name.len() <= 255, "{} bytes", name.len());
    }

    #[rstest]
    fn builds_stored_name() {
        let number = ApplicationNumber::parse("APP2025000001").expect("valid");
        assert_eq!(
            stored_file_name(&number, DocumentType::ParentIdFront, "front.jpg"),
            "APP2025000001_parent_id_front_front.jpg"
        );
    }

    #[rstest]
    fn parses_every_field_key() {
        for kind in DocumentType::ALL {
            assert_eq!(kind.field_key().parse::<DocumentType>(), Ok(kind));
        }
        assert!("selfie".parse::<DocumentType>().is_err());
    }
}

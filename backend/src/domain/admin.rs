//! Administrator accounts.
//!
//! Admins are seed data: one account is upserted from configuration at
//! startup and never transitions afterwards.

use uuid::Uuid;

use crate::domain::PasswordHash;

/// Administrator account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admin {
    id: Uuid,
    username: String,
    full_name: String,
    password_hash: PasswordHash,
}

impl Admin {
    /// Assemble an admin from stored or seeded values.
    ///
    /// The username is trimmed.
    pub fn new(
        id: Uuid,
        username: impl AsRef<str>,
        full_name: impl Into<String>,
        password_hash: PasswordHash,
    ) -> Self {
        Self {
            id,
            username: username.as_ref().trim().to_owned(),
            full_name: full_name.into(),
            password_hash,
        }
    }

    /// Stable account id, kept across reseeding.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    #[must_use]
    pub const fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }
}

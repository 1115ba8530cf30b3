//! Human-readable sequential identifiers.
//!
//! Application numbers and generated ID numbers share one shape:
//! `<PREFIX><YEAR><SEQUENCE>`, where the sequence is zero-padded to a
//! scope-specific width. Allocation of the sequence itself belongs to the
//! store, which serialises concurrent allocators; this module only formats
//! and parses.

use std::fmt;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

/// Counter scope an identifier is allocated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentifierScope {
    /// Every submitted application, regardless of type or status.
    ApplicationNumber,
    /// Applications that reached `approved`.
    IdNumber,
}

impl IdentifierScope {
    /// Textual prefix placed before the year.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::ApplicationNumber => "APP",
            Self::IdNumber => "ID",
        }
    }

    /// Minimum number of sequence digits.
    #[must_use]
    pub const fn width(self) -> usize {
        match self {
            Self::ApplicationNumber => 6,
            Self::IdNumber => 8,
        }
    }

    /// Stable key naming the counter row in persistent storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ApplicationNumber => "application_number",
            Self::IdNumber => "id_number",
        }
    }

    /// Format an allocated sequence value for this scope.
    ///
    /// Sequences wider than the padding are rendered in full.
    ///
    /// # Examples
    /// ```
    /// use idtrack::domain::IdentifierScope;
    ///
    /// assert_eq!(IdentifierScope::ApplicationNumber.format(2025, 1), "APP2025000001");
    /// assert_eq!(IdentifierScope::IdNumber.format(2025, 42), "ID202500000042");
    /// ```
    #[must_use]
    pub fn format(self, year: i32, sequence: u64) -> String {
        format!(
            "{prefix}{year:04}{sequence:0width$}",
            prefix = self.prefix(),
            width = self.width()
        )
    }

    /// Format a sequence using the UTC year of `allocated_at`.
    #[must_use]
    pub fn format_at(self, allocated_at: DateTime<Utc>, sequence: u64) -> String {
        self.format(allocated_at.year(), sequence)
    }

    fn validate(self, raw: &str) -> Result<(), IdentifierError> {
        let rest = raw
            .strip_prefix(self.prefix())
            .ok_or(IdentifierError::WrongPrefix {
                expected: self.prefix(),
            })?;
        if !rest.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(IdentifierError::NonDigit);
        }
        if rest.len() < 4 + self.width() {
            return Err(IdentifierError::TooShort {
                minimum: self.prefix().len() + 4 + self.width(),
            });
        }
        Ok(())
    }
}

/// Validation failures when parsing identifiers from untrusted input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentifierError {
    /// The identifier does not start with the scope prefix.
    #[error("identifier must start with {expected}")]
    WrongPrefix { expected: &'static str },
    /// Year or sequence contains something other than ASCII digits.
    #[error("identifier must contain only digits after the prefix")]
    NonDigit,
    /// Year or sequence is shorter than the scope requires.
    #[error("identifier must be at least {minimum} characters long")]
    TooShort { minimum: usize },
}

macro_rules! sequential_identifier {
    ($(#[$meta:meta])* $name:ident, $scope:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Counter scope this identifier is allocated from.
            pub const SCOPE: IdentifierScope = $scope;

            /// Validate and wrap an identifier string.
            pub fn parse(raw: impl Into<String>) -> Result<Self, IdentifierError> {
                let raw = raw.into();
                let trimmed = raw.trim();
                Self::SCOPE.validate(trimmed)?;
                Ok(Self(trimmed.to_owned()))
            }

            /// Build the identifier for an allocated sequence value.
            #[must_use]
            pub fn from_sequence(allocated_at: DateTime<Utc>, sequence: u64) -> Self {
                Self(Self::SCOPE.format_at(allocated_at, sequence))
            }

            /// Borrow the identifier text.
            #[must_use]
            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdentifierError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

sequential_identifier!(
    /// Application number such as `APP2025000001`.
    ApplicationNumber,
    IdentifierScope::ApplicationNumber
);

sequential_identifier!(
    /// Generated citizen ID number such as `ID202500000001`.
    IdNumber,
    IdentifierScope::IdNumber
);

//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`OfficerDirectory`, `AdminLogin`, `ApplicationCommand`,
//! `ApplicationQuery`) are called by inbound adapters. Driven ports
//! (repositories, hashing, tokens, document storage) are implemented by
//! outbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod access_tokens;
mod admin_login;
mod admin_repository;
mod application_command;
mod application_query;
mod application_repository;
mod document_store;
mod officer_directory;
mod officer_repository;
mod password_hasher;

#[cfg(test)]
pub use access_tokens::MockAccessTokens;
pub use access_tokens::{AccessTokenError, AccessTokens};
#[cfg(test)]
pub use admin_login::MockAdminLogin;
pub use admin_login::{AdminLogin, AdminSession};
#[cfg(test)]
pub use admin_repository::MockAdminRepository;
pub use admin_repository::{AdminRepository, AdminRepositoryError};
#[cfg(test)]
pub use application_command::MockApplicationCommand;
pub use application_command::{ApplicationCommand, SubmissionReceipt, SubmitApplicationRequest};
#[cfg(test)]
pub use application_query::MockApplicationQuery;
pub use application_query::{ApplicationDetail, ApplicationQuery};
#[cfg(test)]
pub use application_repository::MockApplicationRepository;
pub use application_repository::{
    ApplicationFilter, ApplicationListing, ApplicationRepository, ApplicationRepositoryError,
};
#[cfg(test)]
pub use document_store::MockDocumentStore;
pub use document_store::{DocumentStore, DocumentStoreError};
#[cfg(test)]
pub use officer_directory::MockOfficerDirectory;
pub use officer_directory::{OfficerDirectory, OfficerSession};
#[cfg(test)]
pub use officer_repository::MockOfficerRepository;
pub use officer_repository::{
    DecisionOutcome, IdentityField, OfficerRepository, OfficerRepositoryError,
};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};

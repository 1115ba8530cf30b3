//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repositories here implement the domain's driven ports on top of
//! `diesel-async` connections checked out of a `bb8` pool.
//!
//! - **Thin adapters**: repositories translate between Diesel rows and
//!   domain types; lifecycle rules stay in the domain.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Strongly typed errors**: Diesel and pool failures map onto each port's
//!   error enum.
//!
//! # Example
//!
//! ```no_run
//! use idtrack::outbound::persistence::{DbPool, DieselOfficerRepository, PoolConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/idtrack")).await?;
//! let officers = DieselOfficerRepository::new(pool);
//! # let _ = officers;
//! # Ok(())
//! # }
//! ```

mod diesel_admin_repository;
mod diesel_application_repository;
mod diesel_basic_error_mapping;
mod diesel_officer_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_admin_repository::DieselAdminRepository;
pub use diesel_application_repository::DieselApplicationRepository;
pub use diesel_officer_repository::DieselOfficerRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};

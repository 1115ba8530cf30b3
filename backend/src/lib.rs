//! ID application tracking backend.
//!
//! Hexagonal layout: `domain` holds entities, the application lifecycle
//! state machine and the services behind the driving ports; `inbound`
//! adapts HTTP onto those ports; `outbound` implements the driven ports on
//! PostgreSQL, the in-memory store, Argon2, JWT and the filesystem.

pub mod doc;
pub mod domain;
pub mod inbound;
/// Request tracing middleware.
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;

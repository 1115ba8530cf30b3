//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccessTokens, AdminLogin, ApplicationCommand, ApplicationQuery, OfficerDirectory,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub officers: Arc<dyn OfficerDirectory>,
    pub admin_login: Arc<dyn AdminLogin>,
    pub applications: Arc<dyn ApplicationCommand>,
    pub application_queries: Arc<dyn ApplicationQuery>,
    /// Verifies bearer tokens in the authentication extractors.
    pub tokens: Arc<dyn AccessTokens>,
}

impl HttpState {
    /// Bundle the ports used by the HTTP handlers.
    pub fn new(
        officers: Arc<dyn OfficerDirectory>,
        admin_login: Arc<dyn AdminLogin>,
        applications: Arc<dyn ApplicationCommand>,
        application_queries: Arc<dyn ApplicationQuery>,
        tokens: Arc<dyn AccessTokens>,
    ) -> Self {
        Self {
            officers,
            admin_login,
            applications,
            application_queries,
            tokens,
        }
    }
}

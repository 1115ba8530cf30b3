//! HTTP inbound adapter exposing REST endpoints.
//!
//! [`configure`] registers every `/api` route; health probes sit outside the
//! API scope.

pub mod admin;
pub mod admin_applications;
pub mod applications;
pub mod auth;
pub mod error;
pub mod health;
pub mod officers;
pub mod schemas;
pub mod state;
pub mod submission;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register the `/api` scope.
///
/// Fixed admin application paths are registered before `{id}` so they are
/// matched first.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(web::PayloadConfig::new(submission::MAX_SUBMISSION_BYTES))
            .service(officers::signup)
            .service(officers::login)
            .service(admin::admin_login)
            .service(admin::pending_officers)
            .service(admin::approve_officer)
            .service(admin::reject_officer)
            .service(applications::submit_application)
            .service(applications::track_application)
            .service(applications::officer_applications)
            .service(applications::mark_card_arrived)
            .service(applications::mark_collected)
            .service(admin_applications::list_applications)
            .service(admin_applications::approved_applications)
            .service(admin_applications::renewal_applications)
            .service(admin_applications::application_detail)
            .service(admin_applications::application_history)
            .service(admin_applications::approve_application)
            .service(admin_applications::reject_application)
            .service(admin_applications::dispatch_application),
    );
}

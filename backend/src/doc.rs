//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint of the inbound layer, the
//! request and response payloads they exchange, and the bearer-token
//! security scheme applied to protected routes. Public routes opt out with
//! an empty `security` list on their path attribute.
//!
//! The generated document backs Swagger UI in debug builds and is exported
//! via `cargo run --bin openapi-dump` for external tooling.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::admin::{AdminLoginRequest, AdminLoginResponse, PendingOfficersResponse};
use crate::inbound::http::admin_applications::{ApprovalResponse, HistoryResponse};
use crate::inbound::http::applications::{ApplicationsResponse, SubmissionResponse};
use crate::inbound::http::officers::{OfficerLoginRequest, OfficerLoginResponse, SignupRequest};
use crate::inbound::http::schemas::{
    AdminProfile, ApplicantView, ApplicationDetailView, ApplicationView, DocumentView, EventView,
    MessageResponse, OfficerProfile, OfficerView, TrackingView, TransitionResponse,
};
use crate::inbound::http::submission::SubmitApplicationBody;

/// Name of the bearer security scheme in the generated document.
pub const BEARER_SCHEME: &str = "BearerAuth";

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some(
                        "Access token issued by POST /api/officer/login or POST /api/admin/login.",
                    ))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "ID application tracking API",
        description = "Officer onboarding, ID application submission, administrative review, and public status tracking."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerAuth" = [])),
    paths(
        crate::inbound::http::officers::signup,
        crate::inbound::http::officers::login,
        crate::inbound::http::admin::admin_login,
        crate::inbound::http::admin::pending_officers,
        crate::inbound::http::admin::approve_officer,
        crate::inbound::http::admin::reject_officer,
        crate::inbound::http::applications::submit_application,
        crate::inbound::http::applications::track_application,
        crate::inbound::http::applications::officer_applications,
        crate::inbound::http::applications::mark_card_arrived,
        crate::inbound::http::applications::mark_collected,
        crate::inbound::http::admin_applications::list_applications,
        crate::inbound::http::admin_applications::approved_applications,
        crate::inbound::http::admin_applications::renewal_applications,
        crate::inbound::http::admin_applications::application_detail,
        crate::inbound::http::admin_applications::application_history,
        crate::inbound::http::admin_applications::approve_application,
        crate::inbound::http::admin_applications::reject_application,
        crate::inbound::http::admin_applications::dispatch_application,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        MessageResponse,
        SignupRequest,
        OfficerLoginRequest,
        OfficerLoginResponse,
        OfficerProfile,
        OfficerView,
        AdminLoginRequest,
        AdminLoginResponse,
        AdminProfile,
        PendingOfficersResponse,
        SubmitApplicationBody,
        SubmissionResponse,
        ApplicationsResponse,
        ApplicantView,
        ApplicationView,
        TrackingView,
        DocumentView,
        ApplicationDetailView,
        EventView,
        HistoryResponse,
        ApprovalResponse,
        TransitionResponse,
    )),
    tags(
        (name = "officers", description = "Officer signup and login"),
        (name = "admin", description = "Administrator login, officer approval and application review"),
        (name = "applications", description = "Application submission, tracking and collection"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

//! Administrator application review handlers.
//!
//! ```text
//! GET /api/admin/applications               (non-renewal)
//! GET /api/admin/applications/approved
//! GET /api/admin/applications/renewals
//! GET /api/admin/applications/{id}          (+documents)
//! GET /api/admin/applications/{id}/history
//! PUT /api/admin/applications/{id}/approve|reject|dispatch
//! ```
//!
//! The fixed `approved` and `renewals` paths are registered ahead of `{id}`
//! so they never parse as an id.

use actix_web::{get, put, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::ports::ApplicationFilter;
use crate::domain::{Actor, ApplicationId, Error, Transition};
use crate::inbound::http::ApiResult;
use crate::inbound::http::applications::ApplicationsResponse;
use crate::inbound::http::auth::AuthenticatedAdmin;
use crate::inbound::http::schemas::{
    ApplicationDetailView, ApplicationView, EventView, TransitionResponse,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_uuid};

/// Audit trail of one application.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HistoryResponse {
    pub events: Vec<EventView>,
}

/// Approval result including the generated ID number.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalResponse {
    pub message: String,
    #[schema(example = "ID202500000001")]
    pub generated_id_number: Option<String>,
    pub application: ApplicationView,
}

fn application_id(raw: &str) -> Result<ApplicationId, Error> {
    parse_uuid(raw, FieldName::new("id")).map(ApplicationId::from_uuid)
}

async fn list(
    state: &HttpState,
    filter: ApplicationFilter,
) -> ApiResult<web::Json<ApplicationsResponse>> {
    let listings = state.application_queries.list(filter).await?;
    Ok(web::Json(ApplicationsResponse {
        applications: listings.iter().map(ApplicationView::from).collect(),
    }))
}

/// List every non-renewal application with its officer name.
#[utoipa::path(
    get,
    path = "/api/admin/applications",
    responses(
        (status = 200, description = "Applications", body = ApplicationsResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["admin"],
    operation_id = "listApplications"
)]
#[get("/admin/applications")]
pub async fn list_applications(
    _admin: AuthenticatedAdmin,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<ApplicationsResponse>> {
    list(&state, ApplicationFilter::NonRenewal).await
}

/// List applications awaiting dispatch.
#[utoipa::path(
    get,
    path = "/api/admin/applications/approved",
    responses(
        (status = 200, description = "Approved applications", body = ApplicationsResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["admin"],
    operation_id = "listApprovedApplications"
)]
#[get("/admin/applications/approved")]
pub async fn approved_applications(
    _admin: AuthenticatedAdmin,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<ApplicationsResponse>> {
    list(&state, ApplicationFilter::Approved).await
}

/// List renewal applications.
#[utoipa::path(
    get,
    path = "/api/admin/applications/renewals",
    responses(
        (status = 200, description = "Renewal applications", body = ApplicationsResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["admin"],
    operation_id = "listRenewalApplications"
)]
#[get("/admin/applications/renewals")]
pub async fn renewal_applications(
    _admin: AuthenticatedAdmin,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<ApplicationsResponse>> {
    list(&state, ApplicationFilter::Renewals).await
}

/// Fetch one application with its documents.
#[utoipa::path(
    get,
    path = "/api/admin/applications/{id}",
    params(("id" = String, Path, description = "Application id")),
    responses(
        (status = 200, description = "Application detail", body = ApplicationDetailView),
        (status = 400, description = "Invalid id", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["admin"],
    operation_id = "getApplication"
)]
#[get("/admin/applications/{id}")]
pub async fn application_detail(
    _admin: AuthenticatedAdmin,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<ApplicationDetailView>> {
    let detail = state
        .application_queries
        .detail(application_id(&path)?)
        .await?;
    Ok(web::Json(ApplicationDetailView::from(&detail)))
}

/// Audit history of one application, oldest first.
#[utoipa::path(
    get,
    path = "/api/admin/applications/{id}/history",
    params(("id" = String, Path, description = "Application id")),
    responses(
        (status = 200, description = "Audit events", body = HistoryResponse),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["admin"],
    operation_id = "getApplicationHistory"
)]
#[get("/admin/applications/{id}/history")]
pub async fn application_history(
    _admin: AuthenticatedAdmin,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<HistoryResponse>> {
    let events = state
        .application_queries
        .history(application_id(&path)?)
        .await?;
    Ok(web::Json(HistoryResponse {
        events: events.iter().map(EventView::from).collect(),
    }))
}

/// Approve a submitted application and allocate its ID number.
#[utoipa::path(
    put,
    path = "/api/admin/applications/{id}/approve",
    params(("id" = String, Path, description = "Application id")),
    responses(
        (status = 200, description = "Application approved", body = ApprovalResponse),
        (status = 404, description = "Not found or not submitted", body = Error)
    ),
    tags = ["admin"],
    operation_id = "approveApplication"
)]
#[put("/admin/applications/{id}/approve")]
pub async fn approve_application(
    admin: AuthenticatedAdmin,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<ApprovalResponse>> {
    let application = state
        .applications
        .transition(
            application_id(&path)?,
            Transition::Approve,
            Actor::Admin(admin.0),
        )
        .await?;
    let generated_id_number = application.generated_id_number().map(ToString::to_string);
    info!(
        application_number = %application.application_number(),
        generated_id_number = generated_id_number.as_deref().unwrap_or_default(),
        "application approved"
    );
    Ok(web::Json(ApprovalResponse {
        message: "Application approved".to_owned(),
        generated_id_number,
        application: ApplicationView::from(&application),
    }))
}

async fn admin_transition(
    admin: AuthenticatedAdmin,
    state: &HttpState,
    raw_id: &str,
    transition: Transition,
    message: &str,
) -> ApiResult<web::Json<TransitionResponse>> {
    let application = state
        .applications
        .transition(application_id(raw_id)?, transition, Actor::Admin(admin.0))
        .await?;
    Ok(web::Json(TransitionResponse {
        message: message.to_owned(),
        application: ApplicationView::from(&application),
    }))
}

/// Reject a submitted application.
#[utoipa::path(
    put,
    path = "/api/admin/applications/{id}/reject",
    params(("id" = String, Path, description = "Application id")),
    responses(
        (status = 200, description = "Application rejected", body = TransitionResponse),
        (status = 404, description = "Not found or not submitted", body = Error)
    ),
    tags = ["admin"],
    operation_id = "rejectApplication"
)]
#[put("/admin/applications/{id}/reject")]
pub async fn reject_application(
    admin: AuthenticatedAdmin,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<TransitionResponse>> {
    admin_transition(admin, &state, &path, Transition::Reject, "Application rejected").await
}

/// Dispatch the card of an approved application.
#[utoipa::path(
    put,
    path = "/api/admin/applications/{id}/dispatch",
    params(("id" = String, Path, description = "Application id")),
    responses(
        (status = 200, description = "Application dispatched", body = TransitionResponse),
        (status = 404, description = "Not found or not approved", body = Error)
    ),
    tags = ["admin"],
    operation_id = "dispatchApplication"
)]
#[put("/admin/applications/{id}/dispatch")]
pub async fn dispatch_application(
    admin: AuthenticatedAdmin,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<TransitionResponse>> {
    admin_transition(
        admin,
        &state,
        &path,
        Transition::Dispatch,
        "Application dispatched",
    )
    .await
}

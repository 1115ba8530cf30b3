//! Administrator login and officer approval handlers.
//!
//! ```text
//! POST /api/admin/login {"username":"registrar","password":"..."}
//! GET  /api/admin/officers/pending
//! PUT  /api/admin/officers/{id}/approve
//! PUT  /api/admin/officers/{id}/reject
//! ```

use actix_web::{get, post, put, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{Error, LoginCredentials, OfficerDecision, OfficerId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedAdmin;
use crate::inbound::http::schemas::{AdminProfile, MessageResponse, OfficerView};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, map_login_validation_error, parse_uuid};

/// Admin login body.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct AdminLoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Token and profile returned after admin login.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminLoginResponse {
    pub token: String,
    pub admin: AdminProfile,
}

/// Officers awaiting a decision.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PendingOfficersResponse {
    pub officers: Vec<OfficerView>,
}

/// Authenticate an administrator.
#[utoipa::path(
    post,
    path = "/api/admin/login",
    request_body = AdminLoginRequest,
    responses(
        (status = 200, description = "Login success", body = AdminLoginResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminLogin",
    security([])
)]
#[post("/admin/login")]
pub async fn admin_login(
    state: web::Data<HttpState>,
    payload: web::Json<AdminLoginRequest>,
) -> ApiResult<web::Json<AdminLoginResponse>> {
    let AdminLoginRequest { username, password } = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts("username", &username, &password)
        .map_err(map_login_validation_error)?;
    let session = state.admin_login.login(credentials).await?;
    Ok(web::Json(AdminLoginResponse {
        admin: AdminProfile::from(&session.admin),
        token: session.token.into_string(),
    }))
}

/// List officers awaiting approval, newest first.
#[utoipa::path(
    get,
    path = "/api/admin/officers/pending",
    responses(
        (status = 200, description = "Pending officers", body = PendingOfficersResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["admin"],
    operation_id = "listPendingOfficers"
)]
#[get("/admin/officers/pending")]
pub async fn pending_officers(
    _admin: AuthenticatedAdmin,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<PendingOfficersResponse>> {
    let officers = state.officers.pending().await?;
    Ok(web::Json(PendingOfficersResponse {
        officers: officers.iter().map(OfficerView::from).collect(),
    }))
}

async fn decide(
    admin: AuthenticatedAdmin,
    state: &HttpState,
    raw_id: &str,
    decision: OfficerDecision,
) -> ApiResult<web::Json<MessageResponse>> {
    let id = OfficerId::from_uuid(parse_uuid(raw_id, FieldName::new("id"))?);
    let officer = state.officers.decide(id, decision).await?;
    info!(
        officer_id = %id,
        admin_id = %admin.0,
        status = %officer.status(),
        "officer decision applied"
    );
    Ok(web::Json(MessageResponse::new(format!(
        "Officer {}",
        officer.status()
    ))))
}

/// Approve a pending officer.
#[utoipa::path(
    put,
    path = "/api/admin/officers/{id}/approve",
    params(("id" = String, Path, description = "Officer id")),
    responses(
        (status = 200, description = "Officer approved", body = MessageResponse),
        (status = 400, description = "Invalid id", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found or not pending", body = Error)
    ),
    tags = ["admin"],
    operation_id = "approveOfficer"
)]
#[put("/admin/officers/{id}/approve")]
pub async fn approve_officer(
    admin: AuthenticatedAdmin,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    decide(admin, &state, &path, OfficerDecision::Approve).await
}

/// Reject a pending officer.
#[utoipa::path(
    put,
    path = "/api/admin/officers/{id}/reject",
    params(("id" = String, Path, description = "Officer id")),
    responses(
        (status = 200, description = "Officer rejected", body = MessageResponse),
        (status = 400, description = "Invalid id", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found or not pending", body = Error)
    ),
    tags = ["admin"],
    operation_id = "rejectOfficer"
)]
#[put("/admin/officers/{id}/reject")]
pub async fn reject_officer(
    admin: AuthenticatedAdmin,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    decide(admin, &state, &path, OfficerDecision::Reject).await
}

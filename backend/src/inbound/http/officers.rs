//! Officer account handlers.
//!
//! ```text
//! POST /api/officer/signup {"idNumber":"12345678","email":"jane@example.org",...}
//! POST /api/officer/login  {"email":"jane@example.org","password":"..."}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{Error, LoginCredentials, OfficerSignup, OfficerSignupDraft};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{MessageResponse, OfficerProfile};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{map_login_validation_error, map_signup_validation_error};

/// Signup request body. Every field is required.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub id_number: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub full_name: Option<String>,
    pub station: Option<String>,
    pub password: Option<String>,
}

impl From<SignupRequest> for OfficerSignupDraft {
    fn from(value: SignupRequest) -> Self {
        Self {
            id_number: value.id_number,
            email: value.email,
            phone_number: value.phone_number,
            full_name: value.full_name,
            station: value.station,
            password: value.password,
        }
    }
}

/// Officer login body.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct OfficerLoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Token and profile returned after officer login.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OfficerLoginResponse {
    pub token: String,
    pub officer: OfficerProfile,
}

/// Register a new officer in `pending` status.
#[utoipa::path(
    post,
    path = "/api/officer/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Officer registered", body = MessageResponse),
        (status = 400, description = "Missing field or duplicate identity", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["officers"],
    operation_id = "officerSignup",
    security([])
)]
#[post("/officer/signup")]
pub async fn signup(
    state: web::Data<HttpState>,
    payload: web::Json<SignupRequest>,
) -> ApiResult<HttpResponse> {
    let registration = OfficerSignup::try_from_draft(payload.into_inner().into())
        .map_err(map_signup_validation_error)?;
    let officer = state.officers.sign_up(registration).await?;
    info!(officer_id = %officer.id(), "officer signup received");
    Ok(HttpResponse::Created().json(MessageResponse::new(
        "Officer registered; awaiting admin approval",
    )))
}

/// Authenticate an approved officer.
#[utoipa::path(
    post,
    path = "/api/officer/login",
    request_body = OfficerLoginRequest,
    responses(
        (status = 200, description = "Login success", body = OfficerLoginResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 403, description = "Account not approved", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["officers"],
    operation_id = "officerLogin",
    security([])
)]
#[post("/officer/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<OfficerLoginRequest>,
) -> ApiResult<web::Json<OfficerLoginResponse>> {
    let OfficerLoginRequest { email, password } = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts("email", &email, &password)
        .map_err(map_login_validation_error)?;
    let session = state.officers.login(credentials).await?;
    Ok(web::Json(OfficerLoginResponse {
        officer: OfficerProfile::from(&session.officer),
        token: session.token.into_string(),
    }))
}

#[cfg(test)]
#[path = "officers_tests.rs"]
mod tests;

//! Officer-facing application handlers and public tracking.
//!
//! ```text
//! POST /api/applications                               (officer; JSON or multipart)
//! GET  /api/applications/track/{application_number}    (public)
//! GET  /api/officer/applications[?officer_id=]         (officer)
//! PUT  /api/officer/applications/{id}/card-arrived     (officer)
//! PUT  /api/officer/applications/{id}/collected        (officer)
//! ```

use actix_multipart::Multipart;
use actix_web::{Either, HttpResponse, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::ApplicationFilter;
use crate::domain::{Actor, ApplicationId, Error, Transition};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedOfficer;
use crate::inbound::http::schemas::{ApplicationView, TrackingView, TransitionResponse};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::submission::{SubmitApplicationBody, read_multipart};
use crate::inbound::http::validation::{FieldName, parse_uuid};

/// Identifiers handed back after a submission.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    pub message: String,
    #[schema(example = "APP2025000001")]
    pub application_number: String,
    pub application_id: String,
}

/// Applications owned by the calling officer.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApplicationsResponse {
    pub applications: Vec<ApplicationView>,
}

/// Optional owner filter; must match the token when present.
#[derive(Debug, Deserialize, IntoParams)]
pub struct OfficerApplicationsQuery {
    pub officer_id: Option<String>,
}

/// Submit a new application with its supporting documents.
#[utoipa::path(
    post,
    path = "/api/applications",
    request_body(
        content = SubmitApplicationBody,
        description = "JSON applicant fields, or multipart/form-data with the same \
                       text fields plus one file part per document type"
    ),
    responses(
        (status = 201, description = "Application submitted", body = SubmissionResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 503, description = "Storage unavailable", body = Error)
    ),
    tags = ["applications"],
    operation_id = "submitApplication"
)]
#[post("/applications")]
pub async fn submit_application(
    officer: AuthenticatedOfficer,
    state: web::Data<HttpState>,
    payload: Either<web::Json<SubmitApplicationBody>, Multipart>,
) -> ApiResult<HttpResponse> {
    let (body, documents) = match payload {
        Either::Left(json) => (json.into_inner(), Vec::new()),
        Either::Right(multipart) => {
            let submission = read_multipart(multipart).await?;
            (submission.body, submission.documents)
        }
    };
    let request = body.into_request(officer.0, documents)?;
    let receipt = state.applications.submit(request).await?;
    Ok(HttpResponse::Created().json(SubmissionResponse {
        message: "Application submitted".to_owned(),
        application_number: receipt.application_number.to_string(),
        application_id: receipt.application_id.to_string(),
    }))
}

/// Look up an application's status by its public number.
#[utoipa::path(
    get,
    path = "/api/applications/track/{application_number}",
    params(("application_number" = String, Path, description = "Application number")),
    responses(
        (status = 200, description = "Application status", body = TrackingView),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["applications"],
    operation_id = "trackApplication",
    security([])
)]
#[get("/applications/track/{application_number}")]
pub async fn track_application(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<TrackingView>> {
    let application = state.application_queries.track(&path).await?;
    Ok(web::Json(TrackingView::from(&application)))
}

/// List the calling officer's applications, newest first.
#[utoipa::path(
    get,
    path = "/api/officer/applications",
    params(OfficerApplicationsQuery),
    responses(
        (status = 200, description = "Officer applications", body = ApplicationsResponse),
        (status = 400, description = "Invalid officer id", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Another officer's applications", body = Error)
    ),
    tags = ["applications"],
    operation_id = "listOfficerApplications"
)]
#[get("/officer/applications")]
pub async fn officer_applications(
    officer: AuthenticatedOfficer,
    state: web::Data<HttpState>,
    query: web::Query<OfficerApplicationsQuery>,
) -> ApiResult<web::Json<ApplicationsResponse>> {
    if let Some(raw) = query.officer_id.as_deref() {
        let requested = parse_uuid(raw, FieldName::new("officer_id"))?;
        if requested != *officer.0.as_uuid() {
            return Err(Error::forbidden(
                "officers may only list their own applications",
            ));
        }
    }
    let listings = state
        .application_queries
        .list(ApplicationFilter::OwnedBy(officer.0))
        .await?;
    Ok(web::Json(ApplicationsResponse {
        applications: listings.iter().map(ApplicationView::from).collect(),
    }))
}

async fn officer_transition(
    officer: AuthenticatedOfficer,
    state: &HttpState,
    raw_id: &str,
    transition: Transition,
    message: &str,
) -> ApiResult<web::Json<TransitionResponse>> {
    let id = ApplicationId::from_uuid(parse_uuid(raw_id, FieldName::new("id"))?);
    let application = state
        .applications
        .transition(id, transition, Actor::Officer(officer.0))
        .await?;
    Ok(web::Json(TransitionResponse {
        message: message.to_owned(),
        application: ApplicationView::from(&application),
    }))
}

/// Record that the printed card reached the officer's station.
#[utoipa::path(
    put,
    path = "/api/officer/applications/{id}/card-arrived",
    params(("id" = String, Path, description = "Application id")),
    responses(
        (status = 200, description = "Arrival recorded", body = TransitionResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found or not eligible", body = Error)
    ),
    tags = ["applications"],
    operation_id = "markCardArrived"
)]
#[put("/officer/applications/{id}/card-arrived")]
pub async fn mark_card_arrived(
    officer: AuthenticatedOfficer,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<TransitionResponse>> {
    officer_transition(
        officer,
        &state,
        &path,
        Transition::MarkCardArrived,
        "Card marked as arrived",
    )
    .await
}

/// Record that the applicant collected the card.
#[utoipa::path(
    put,
    path = "/api/officer/applications/{id}/collected",
    params(("id" = String, Path, description = "Application id")),
    responses(
        (status = 200, description = "Collection recorded", body = TransitionResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found or not eligible", body = Error)
    ),
    tags = ["applications"],
    operation_id = "markCollected"
)]
#[put("/officer/applications/{id}/collected")]
pub async fn mark_collected(
    officer: AuthenticatedOfficer,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<TransitionResponse>> {
    officer_transition(
        officer,
        &state,
        &path,
        Transition::MarkCollected,
        "Card marked as collected",
    )
    .await
}

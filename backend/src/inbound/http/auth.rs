//! Bearer-token extractors used by HTTP handlers.
//!
//! Handlers name the role they require by taking [`AuthenticatedOfficer`] or
//! [`AuthenticatedAdmin`]. A missing, malformed or expired token yields
//! `401`; a valid token for the other role yields `403`.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::{Ready, ready};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::AccessTokenError;
use crate::domain::{Error, OfficerId, Principal, Role};
use crate::inbound::http::state::HttpState;

const BEARER_PREFIX: &str = "Bearer ";

fn bearer_token(req: &HttpRequest) -> Result<&str, Error> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("access token required"))?;
    let value = header
        .to_str()
        .map_err(|_| Error::unauthorized("malformed authorization header"))?;
    value
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| Error::unauthorized("malformed authorization header"))
}

fn verify_principal(req: &HttpRequest, role: Role) -> Result<Principal, Error> {
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("HTTP state not configured"))?;
    let token = bearer_token(req)?;
    let principal = state.tokens.verify(token).map_err(|err| {
        debug!(error = %err, "access token rejected");
        match err {
            AccessTokenError::Expired => Error::unauthorized("access token expired"),
            _ => Error::unauthorized("invalid access token"),
        }
    })?;
    if principal.role() != role {
        return Err(Error::forbidden(format!("{role} access required")));
    }
    Ok(principal)
}

/// Officer identity derived from a verified token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedOfficer(pub OfficerId);

impl FromRequest for AuthenticatedOfficer {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            verify_principal(req, Role::Officer)
                .map(|principal| Self(OfficerId::from_uuid(principal.subject()))),
        )
    }
}

/// Admin identity derived from a verified token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedAdmin(pub Uuid);

impl FromRequest for AuthenticatedAdmin {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(verify_principal(req, Role::Admin).map(|principal| Self(principal.subject())))
    }
}

#[cfg(test)]
mod tests {
    //! Extractor behaviour against a stubbed token verifier.
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, get, test};
    use rstest::rstest;

    use super::*;
    use crate::domain::ports::{
        MockAccessTokens, MockAdminLogin, MockApplicationCommand, MockApplicationQuery,
        MockOfficerDirectory,
    };

    const OFFICER_TOKEN: &str = "officer-token";
    const ADMIN_TOKEN: &str = "admin-token";
    const EXPIRED_TOKEN: &str = "expired-token";

    fn state() -> web::Data<HttpState> {
        let mut tokens = MockAccessTokens::new();
        tokens.expect_verify().returning(|token| match token {
            OFFICER_TOKEN => Ok(Principal::new(Uuid::nil(), Role::Officer)),
            ADMIN_TOKEN => Ok(Principal::new(Uuid::nil(), Role::Admin)),
            EXPIRED_TOKEN => Err(AccessTokenError::expired()),
            _ => Err(AccessTokenError::invalid("bad signature")),
        });
        web::Data::new(HttpState::new(
            Arc::new(MockOfficerDirectory::new()),
            Arc::new(MockAdminLogin::new()),
            Arc::new(MockApplicationCommand::new()),
            Arc::new(MockApplicationQuery::new()),
            Arc::new(tokens),
        ))
    }

    #[get("/officer")]
    async fn officer_only(officer: AuthenticatedOfficer) -> HttpResponse {
        HttpResponse::Ok().body(officer.0.to_string())
    }

    #[get("/admin")]
    async fn admin_only(_admin: AuthenticatedAdmin) -> HttpResponse {
        HttpResponse::Ok().finish()
    }

    #[rstest]
    #[case("/officer", Some(OFFICER_TOKEN), StatusCode::OK)]
    #[case("/officer", Some(ADMIN_TOKEN), StatusCode::FORBIDDEN)]
    #[case("/officer", Some(EXPIRED_TOKEN), StatusCode::UNAUTHORIZED)]
    #[case("/officer", Some("forged"), StatusCode::UNAUTHORIZED)]
    #[case("/officer", None, StatusCode::UNAUTHORIZED)]
    #[case("/admin", Some(ADMIN_TOKEN), StatusCode::OK)]
    #[case("/admin", Some(OFFICER_TOKEN), StatusCode::FORBIDDEN)]
    #[actix_rt::test]
    async fn extractors_enforce_token_and_role(
        #[case] path: &str,
        #[case] token: Option<&str>,
        #[case] expected: StatusCode,
    ) {
        let app = test::init_service(
            App::new()
                .app_data(state())
                .service(officer_only)
                .service(admin_only),
        )
        .await;
        let mut request = test::TestRequest::get().uri(path);
        if let Some(token) = token {
            request = request.insert_header((AUTHORIZATION, format!("Bearer {token}")));
        }

        let response = test::call_service(&app, request.to_request()).await;
        assert_eq!(response.status(), expected);
    }

    #[actix_web::test]
    async fn non_bearer_schemes_are_rejected() {
        let app = test::init_service(App::new().app_data(state()).service(officer_only)).await;
        let request = test::TestRequest::get()
            .uri("/officer")
            .insert_header((AUTHORIZATION, "Basic b2ZmaWNlcjpwdw=="))
            .to_request();

        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}

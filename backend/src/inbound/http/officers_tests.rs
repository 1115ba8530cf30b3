//! Handler tests for officer signup and login.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test};
use chrono::Duration;
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{
    MockAccessTokens, MockAdminLogin, MockApplicationCommand, MockApplicationQuery,
    MockOfficerDirectory, OfficerSession,
};
use crate::domain::test_fixtures::{fixture_timestamp, signup as valid_signup, stored_hash};
use crate::domain::{AccessToken, Officer, OfficerStatus};

fn state(officers: MockOfficerDirectory) -> web::Data<HttpState> {
    web::Data::new(HttpState::new(
        Arc::new(officers),
        Arc::new(MockAdminLogin::new()),
        Arc::new(MockApplicationCommand::new()),
        Arc::new(MockApplicationQuery::new()),
        Arc::new(MockAccessTokens::new()),
    ))
}

fn officer() -> Officer {
    Officer::register(&valid_signup(), stored_hash(), fixture_timestamp())
}

fn signup_body() -> Value {
    json!({
        "idNumber": "12345678",
        "email": "jane.wanjiru@example.org",
        "phoneNumber": "+254700000001",
        "fullName": "Jane Wanjiru",
        "station": "Nairobi Central",
        "password": "correct horse",
    })
}

#[actix_web::test]
async fn signup_returns_created() {
    let mut officers = MockOfficerDirectory::new();
    officers
        .expect_sign_up()
        .withf(|request| request.id_number() == "12345678")
        .return_once(|_| Ok(officer()));
    let app = test::init_service(App::new().app_data(state(officers)).service(signup)).await;

    let request = test::TestRequest::post()
        .uri("/officer/signup")
        .set_json(signup_body())
        .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(response).await;
    assert!(body["message"].as_str().is_some());
}

#[rstest]
#[case("idNumber")]
#[case("station")]
#[case("password")]
#[actix_web::test]
async fn signup_reports_missing_field(#[case] field: &str) {
    let mut officers = MockOfficerDirectory::new();
    officers.expect_sign_up().never();
    let app = test::init_service(App::new().app_data(state(officers)).service(signup)).await;
    let mut body = signup_body();
    body.as_object_mut().expect("object").remove(field);

    let request = test::TestRequest::post()
        .uri("/officer/signup")
        .set_json(body)
        .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload: Value = test::read_body_json(response).await;
    assert_eq!(payload["code"], "invalid_request");
    assert_eq!(payload["details"]["field"], field);
}

#[actix_web::test]
async fn signup_duplicate_is_bad_request() {
    let mut officers = MockOfficerDirectory::new();
    officers
        .expect_sign_up()
        .return_once(|_| Err(Error::conflict("an officer with this email already exists")));
    let app = test::init_service(App::new().app_data(state(officers)).service(signup)).await;

    let request = test::TestRequest::post()
        .uri("/officer/signup")
        .set_json(signup_body())
        .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload: Value = test::read_body_json(response).await;
    assert_eq!(payload["code"], "conflict");
}

#[actix_web::test]
async fn login_returns_token_and_profile() {
    let mut officers = MockOfficerDirectory::new();
    officers
        .expect_login()
        .withf(|credentials| credentials.identifier() == "jane.wanjiru@example.org")
        .return_once(|_| {
            Ok(OfficerSession {
                token: AccessToken::new(
                    "signed".into(),
                    fixture_timestamp() + Duration::hours(24),
                ),
                officer: officer().with_status(OfficerStatus::Approved),
            })
        });
    let app = test::init_service(App::new().app_data(state(officers)).service(login)).await;

    let request = test::TestRequest::post()
        .uri("/officer/login")
        .set_json(json!({"email": "jane.wanjiru@example.org", "password": "correct horse"}))
        .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["token"], "signed");
    assert_eq!(body["officer"]["fullName"], "Jane Wanjiru");
    assert!(body["officer"].get("passwordHash").is_none());
}

#[rstest]
#[case(Error::unauthorized("invalid credentials"), StatusCode::UNAUTHORIZED)]
#[case(Error::forbidden("account not approved"), StatusCode::FORBIDDEN)]
#[actix_web::test]
async fn login_failures_map_to_status(#[case] error: Error, #[case] expected: StatusCode) {
    let mut officers = MockOfficerDirectory::new();
    officers.expect_login().return_once(move |_| Err(error));
    let app = test::init_service(App::new().app_data(state(officers)).service(login)).await;

    let request = test::TestRequest::post()
        .uri("/officer/login")
        .set_json(json!({"email": "jane.wanjiru@example.org", "password": "pw"}))
        .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status(), expected);
}

#[actix_web::test]
async fn login_requires_password() {
    let mut officers = MockOfficerDirectory::new();
    officers.expect_login().never();
    let app = test::init_service(App::new().app_data(state(officers)).service(login)).await;

    let request = test::TestRequest::post()
        .uri("/officer/login")
        .set_json(json!({"email": "jane.wanjiru@example.org"}))
        .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

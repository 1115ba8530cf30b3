//! Shared harness for HTTP scenario tests.
//!
//! Integration tests compile as separate crates, so each test file declares
//! `mod support;` and wires the library the way the server binary does,
//! with the in-memory store standing in for PostgreSQL.

#![allow(dead_code)]

use std::sync::Arc;

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{StatusCode, header};
use actix_web::test::{self, TestRequest};
use chrono::{Datelike, Duration, Utc};
use mockable::{Clock, DefaultClock};
use serde_json::{Value, json};
use tempfile::TempDir;
use zeroize::Zeroizing;

use idtrack::domain::{
    AdminLoginService, AdminSeed, ApplicationService, OfficerDirectoryService, seed_admin,
};
use idtrack::inbound::http::state::HttpState;
use idtrack::outbound::memory::InMemoryStore;
use idtrack::outbound::security::{Argon2PasswordHasher, JwtAccessTokens};
use idtrack::outbound::storage::FsDocumentStore;

pub const ADMIN_USERNAME: &str = "registrar";
pub const ADMIN_PASSWORD: &str = "registrar-pass";
pub const OFFICER_PASSWORD: &str = "correct horse";

/// Wired HTTP state plus the temporary upload directory it writes into.
pub struct Harness {
    pub state: actix_web::web::Data<HttpState>,
    pub uploads: TempDir,
}

/// Build HTTP state over a fresh in-memory store with a seeded admin.
pub async fn harness() -> Harness {
    let uploads = tempfile::tempdir().expect("upload tempdir");
    let store = Arc::new(InMemoryStore::new());
    let hasher = Arc::new(Argon2PasswordHasher::new());
    let tokens =
        Arc::new(JwtAccessTokens::ephemeral(Duration::hours(24)).expect("token adapter"));
    let documents = Arc::new(FsDocumentStore::open(uploads.path()).expect("document store"));
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    seed_admin(
        store.as_ref(),
        hasher.as_ref(),
        &AdminSeed {
            username: ADMIN_USERNAME.to_owned(),
            full_name: "Chief Registrar".to_owned(),
            password: Zeroizing::new(ADMIN_PASSWORD.to_owned()),
        },
    )
    .await
    .expect("admin seeded");

    let applications = Arc::new(ApplicationService::new(
        Arc::clone(&store),
        documents,
        Arc::clone(&clock),
    ));
    let state = HttpState::new(
        Arc::new(OfficerDirectoryService::new(
            Arc::clone(&store),
            Arc::clone(&hasher),
            Arc::clone(&tokens),
            Arc::clone(&clock),
        )),
        Arc::new(AdminLoginService::new(
            store,
            hasher,
            Arc::clone(&tokens),
            clock,
        )),
        applications.clone(),
        applications,
        tokens,
    );
    Harness {
        state: actix_web::web::Data::new(state),
        uploads,
    }
}

/// Build the test app for a harness.
///
/// A macro keeps the opaque service type out of helper signatures.
macro_rules! init_app {
    ($harness:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data($harness.state.clone())
                .wrap(idtrack::Trace)
                .configure(idtrack::inbound::http::configure),
        )
        .await
    };
}

/// Send a request and decode the JSON body, `Value::Null` when empty.
pub async fn send<S, B>(app: &S, req: TestRequest) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let res = test::call_service(app, req.to_request()).await;
    let status = res.status();
    let body = test::read_body(res).await;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("JSON body")
    };
    (status, value)
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {token}"))
}

pub fn current_year() -> i32 {
    Utc::now().year()
}

pub fn signup_body(id_number: &str, email: &str) -> Value {
    json!({
        "idNumber": id_number,
        "email": email,
        "phoneNumber": "+254700000001",
        "fullName": "Jane Wanjiru",
        "station": "Nairobi Central",
        "password": OFFICER_PASSWORD,
    })
}

pub fn applicant_body() -> Value {
    json!({
        "applicationType": "new",
        "firstName": "Amina",
        "lastName": "Odhiambo",
        "dateOfBirth": "1990-05-17",
        "gender": "female",
        "placeOfBirth": "Kisumu",
        "phoneNumber": "+254711000002",
        "address": "12 Lake Road, Kisumu",
        "fatherName": "Peter Odhiambo",
        "motherName": "Grace Achieng",
    })
}

pub fn post_json(uri: &str, body: &Value) -> TestRequest {
    TestRequest::post().uri(uri).set_json(body)
}

pub fn put(uri: &str, token: &str) -> TestRequest {
    TestRequest::put().uri(uri).insert_header(bearer(token))
}

pub fn get(uri: &str, token: &str) -> TestRequest {
    TestRequest::get().uri(uri).insert_header(bearer(token))
}

/// Log the seeded admin in and return the bearer token.
pub async fn admin_token<S, B>(app: &S) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (status, body) = send(
        app,
        post_json(
            "/api/admin/login",
            &json!({ "username": ADMIN_USERNAME, "password": ADMIN_PASSWORD }),
        )
    )
    .await;
    assert_eq!(status, StatusCode::OK, "admin login: {body}");
    body["token"].as_str().expect("admin token").to_owned()
}

/// Sign an officer up, approve them as admin, and return their login body.
pub async fn approved_officer<S, B>(app: &S, admin: &str, id_number: &str, email: &str) -> Value
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (status, body) = send(
        app,
        post_json("/api/officer/signup", &signup_body(id_number, email)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "signup: {body}");

    let (_, pending) = send(app, get("/api/admin/officers/pending", admin)).await;
    let officer_id = pending["officers"]
        .as_array()
        .expect("officer list")
        .iter()
        .find(|officer| officer["email"] == email)
        .and_then(|officer| officer["id"].as_str())
        .expect("pending officer listed")
        .to_owned();
    let (status, body) = send(
        app,
        put(&format!("/api/admin/officers/{officer_id}/approve"), admin),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "approve officer: {body}");

    let (status, body) = send(
        app,
        post_json(
            "/api/officer/login",
            &json!({ "email": email, "password": OFFICER_PASSWORD }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "officer login: {body}");
    body
}

/// Submit the standard applicant as JSON and return the response body.
pub async fn submit_application<S, B>(app: &S, officer_token: &str) -> Value
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (status, body) = send(
        app,
        post_json("/api/applications", &applicant_body()).insert_header(bearer(officer_token)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "submit: {body}");
    body
}

//! Officer signup, approval and login over HTTP, plus route protection.

#[macro_use]
mod support;

use actix_web::http::StatusCode;
use actix_web::test::TestRequest;
use rstest::rstest;
use serde_json::json;

use support::{
    OFFICER_PASSWORD, admin_token, get, harness, post_json, put, send, signup_body,
};

#[actix_web::test]
async fn pending_officer_cannot_log_in_until_approved() {
    let harness = harness().await;
    let app = init_app!(harness);

    let (status, body) = send(
        &app,
        post_json("/api/officer/signup", &signup_body("12345678", "jane@example.org")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Officer registered; awaiting admin approval");

    let login = json!({ "email": "jane@example.org", "password": OFFICER_PASSWORD });
    let (status, body) = send(&app, post_json("/api/officer/login", &login)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "account not approved");

    let wrong = json!({ "email": "jane@example.org", "password": "guess" });
    let (status, body) = send(&app, post_json("/api/officer/login", &wrong)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid credentials");
}

#[actix_web::test]
async fn decisions_apply_once() {
    let harness = harness().await;
    let app = init_app!(harness);
    let admin = admin_token(&app).await;

    send(
        &app,
        post_json("/api/officer/signup", &signup_body("12345678", "jane@example.org")),
    )
    .await;
    let (_, pending) = send(&app, get("/api/admin/officers/pending", &admin)).await;
    let officers = pending["officers"].as_array().expect("officers");
    assert_eq!(officers.len(), 1);
    assert_eq!(officers[0]["status"], "pending");
    let id = officers[0]["id"].as_str().expect("id");

    let (status, body) = send(&app, put(&format!("/api/admin/officers/{id}/reject"), &admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Officer rejected");

    let (status, body) = send(&app, put(&format!("/api/admin/officers/{id}/approve"), &admin)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_eligible");

    let (_, pending) = send(&app, get("/api/admin/officers/pending", &admin)).await;
    assert!(pending["officers"].as_array().expect("officers").is_empty());

    let login = json!({ "email": "jane@example.org", "password": OFFICER_PASSWORD });
    let (status, _) = send(&app, post_json("/api/officer/login", &login)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[rstest]
#[case("12345678", "other@example.org", "idNumber")]
#[case("99999999", "JANE@example.org", "email")]
#[actix_rt::test]
async fn duplicate_identities_are_rejected(
    #[case] id_number: &str,
    #[case] email: &str,
    #[case] field: &str,
) {
    let harness = harness().await;
    let app = init_app!(harness);
    send(
        &app,
        post_json("/api/officer/signup", &signup_body("12345678", "jane@example.org")),
    )
    .await;

    let (status, body) = send(
        &app,
        post_json("/api/officer/signup", &signup_body(id_number, email)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "conflict");
    assert_eq!(body["details"]["field"], field);
}

#[rstest]
#[case("fullName", 129)]
#[case("station", 129)]
#[case("idNumber", 33)]
#[actix_rt::test]
async fn fields_wider_than_their_columns_are_invalid(#[case] field: &str, #[case] length: usize) {
    let harness = harness().await;
    let app = init_app!(harness);
    let mut body = signup_body("12345678", "jane@example.org");
    body[field] = json!("x".repeat(length));

    let (status, body) = send(&app, post_json("/api/officer/signup", &body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["field"], field);
    assert_eq!(body["details"]["code"], "too_long");
}

#[actix_web::test]
async fn unknown_officer_ids_are_not_found() {
    let harness = harness().await;
    let app = init_app!(harness);
    let admin = admin_token(&app).await;

    let (status, body) = send(
        &app,
        put(
            "/api/admin/officers/00000000-0000-0000-0000-000000000000/approve",
            &admin,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");

    let (status, body) = send(&app, put("/api/admin/officers/not-a-uuid/approve", &admin)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
}

#[actix_web::test]
async fn protected_routes_check_token_and_role() {
    let harness = harness().await;
    let app = init_app!(harness);
    let admin = admin_token(&app).await;

    let res = actix_web::test::call_service(
        &app,
        TestRequest::get().uri("/api/admin/applications").to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(res.headers().contains_key(idtrack::domain::TRACE_ID_HEADER));

    let (status, _) = send(&app, get("/api/admin/applications", "garbage")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app, get("/api/officer/applications", &admin)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "forbidden");
}

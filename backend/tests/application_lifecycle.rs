//! End-to-end application lifecycle over HTTP against the in-memory store.

#[macro_use]
mod support;

use actix_web::http::StatusCode;
use actix_web::http::header::CONTENT_TYPE;
use actix_web::test::TestRequest;
use futures_util::future::join_all;
use serde_json::{Value, json};

use support::{
    admin_token, applicant_body, approved_officer, bearer, current_year, get, harness, post_json,
    put, send, submit_application,
};

fn token(login: &Value) -> String {
    login["token"].as_str().expect("token").to_owned()
}

/// Renewal form with one passport photo, as `(content type, body)`.
fn renewal_multipart(photo_name: &str) -> (String, String) {
    let boundary = "idtrack-boundary";
    let mut body = String::new();
    for (name, value) in [
        ("applicationType", "renewal"),
        ("firstName", "Amina"),
        ("lastName", "Odhiambo"),
        ("dateOfBirth", "1990-05-17"),
        ("gender", "female"),
        ("placeOfBirth", "Kisumu"),
        ("phoneNumber", "+254711000002"),
        ("address", "12 Lake Road, Kisumu"),
        ("fatherName", "Peter Odhiambo"),
        ("motherName", "Grace Achieng"),
        ("previousIdNumber", "22334455"),
    ] {
        body.push_str(&format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    body.push_str(&format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"passport_photo\"; filename=\"{photo_name}\"\r\nContent-Type: image/jpeg\r\n\r\nJPEGDATA\r\n--{boundary}--\r\n"
    ));
    (format!("multipart/form-data; boundary={boundary}"), body)
}

#[actix_web::test]
async fn submission_approval_and_collection_follow_the_lifecycle() {
    let harness = harness().await;
    let app = init_app!(harness);
    let admin = admin_token(&app).await;
    let officer = token(&approved_officer(&app, &admin, "12345678", "jane@example.org").await);
    let year = current_year();

    let submitted = submit_application(&app, &officer).await;
    assert_eq!(submitted["applicationNumber"], format!("APP{year}000001"));
    let id = submitted["applicationId"].as_str().expect("application id");

    let (status, tracked) = send(
        &app,
        TestRequest::get().uri(&format!("/api/applications/track/APP{year}000001")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tracked["status"], "submitted");
    assert!(tracked.get("applicant").is_none());

    let (status, body) = send(
        &app,
        put(&format!("/api/admin/applications/{id}/dispatch"), &admin),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_eligible");
    assert_eq!(body["error"], "application not approved");

    let (status, approved) = send(
        &app,
        put(&format!("/api/admin/applications/{id}/approve"), &admin),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{approved}");
    assert_eq!(approved["generatedIdNumber"], format!("ID{year}00000001"));
    assert_eq!(approved["application"]["status"], "approved");

    let (status, body) = send(
        &app,
        put(&format!("/api/officer/applications/{id}/collected"), &officer),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_eligible");
    assert_eq!(body["error"], "card not arrived");

    let (status, arrived) = send(
        &app,
        put(&format!("/api/officer/applications/{id}/card-arrived"), &officer),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{arrived}");
    assert_eq!(arrived["application"]["cardArrived"], true);

    let (status, collected) = send(
        &app,
        put(&format!("/api/officer/applications/{id}/collected"), &officer),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{collected}");
    assert_eq!(collected["application"]["collected"], true);

    let (status, body) = send(
        &app,
        put(&format!("/api/officer/applications/{id}/collected"), &officer),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_eligible");

    let (status, history) = send(
        &app,
        get(&format!("/api/admin/applications/{id}/history"), &admin),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let actions: Vec<&str> = history["events"]
        .as_array()
        .expect("events")
        .iter()
        .filter_map(|event| event["action"].as_str())
        .collect();
    assert_eq!(actions, ["submit", "approve", "card_arrived", "collected"]);
}

#[actix_web::test]
async fn numbers_increase_per_submission_and_approval() {
    let harness = harness().await;
    let app = init_app!(harness);
    let admin = admin_token(&app).await;
    let officer = token(&approved_officer(&app, &admin, "12345678", "jane@example.org").await);
    let year = current_year();

    let first = submit_application(&app, &officer).await;
    let second = submit_application(&app, &officer).await;
    assert_eq!(second["applicationNumber"], format!("APP{year}000002"));

    // Approve out of submission order; ID numbers follow approval order.
    for (submission, expected) in [(&second, 1), (&first, 2)] {
        let id = submission["applicationId"].as_str().expect("id");
        let (status, body) = send(
            &app,
            put(&format!("/api/admin/applications/{id}/approve"), &admin),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["generatedIdNumber"], format!("ID{year}{expected:08}"));
    }

    let (_, approved) = send(&app, get("/api/admin/applications/approved", &admin)).await;
    assert_eq!(approved["applications"].as_array().expect("list").len(), 2);
}

#[actix_web::test]
async fn concurrent_submissions_get_distinct_numbers() {
    let harness = harness().await;
    let app = init_app!(harness);
    let admin = admin_token(&app).await;
    let officer = token(&approved_officer(&app, &admin, "12345678", "jane@example.org").await);
    let year = current_year();

    let submissions = join_all((0..8).map(|_| submit_application(&app, &officer))).await;
    let mut numbers: Vec<String> = submissions
        .iter()
        .map(|body| body["applicationNumber"].as_str().expect("number").to_owned())
        .collect();
    numbers.sort();

    let expected: Vec<String> = (1..=8).map(|n| format!("APP{year}{n:06}")).collect();
    assert_eq!(numbers, expected);
}

#[actix_web::test]
async fn rejected_applications_cannot_be_approved() {
    let harness = harness().await;
    let app = init_app!(harness);
    let admin = admin_token(&app).await;
    let officer = token(&approved_officer(&app, &admin, "12345678", "jane@example.org").await);

    let submitted = submit_application(&app, &officer).await;
    let id = submitted["applicationId"].as_str().expect("id");

    let (status, _) = send(
        &app,
        put(&format!("/api/admin/applications/{id}/reject"), &admin),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        put(&format!("/api/admin/applications/{id}/approve"), &admin),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_eligible");
    assert_eq!(body["error"], "application already rejected");
}

#[actix_web::test]
async fn officers_only_see_their_own_applications() {
    let harness = harness().await;
    let app = init_app!(harness);
    let admin = admin_token(&app).await;
    let jane = approved_officer(&app, &admin, "12345678", "jane@example.org").await;
    let omar = approved_officer(&app, &admin, "87654321", "omar@example.org").await;
    let jane_token = token(&jane);
    let omar_token = token(&omar);

    let submitted = submit_application(&app, &jane_token).await;
    let id = submitted["applicationId"].as_str().expect("id");

    let (_, own) = send(&app, get("/api/officer/applications", &jane_token)).await;
    assert_eq!(own["applications"].as_array().expect("list").len(), 1);
    let (_, other) = send(&app, get("/api/officer/applications", &omar_token)).await;
    assert!(other["applications"].as_array().expect("list").is_empty());

    let jane_id = jane["officer"]["id"].as_str().expect("officer id");
    let (status, body) = send(
        &app,
        get(
            &format!("/api/officer/applications?officer_id={jane_id}"),
            &omar_token,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "forbidden");

    let (status, body) = send(
        &app,
        put(&format!("/api/officer/applications/{id}/card-arrived"), &omar_token),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}

#[actix_web::test]
async fn multipart_submission_stores_documents() {
    let harness = harness().await;
    let app = init_app!(harness);
    let admin = admin_token(&app).await;
    let officer = token(&approved_officer(&app, &admin, "12345678", "jane@example.org").await);
    let year = current_year();

    let (content_type, body) = renewal_multipart("me.jpg");
    let (status, submitted) = send(
        &app,
        TestRequest::post()
            .uri("/api/applications")
            .insert_header(bearer(&officer))
            .insert_header((CONTENT_TYPE, content_type))
            .set_payload(body),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{submitted}");
    let id = submitted["applicationId"].as_str().expect("id");

    let stored = harness
        .uploads
        .path()
        .join(format!("APP{year}000001_passport_photo_me.jpg"));
    assert_eq!(std::fs::read(&stored).expect("stored file"), b"JPEGDATA");

    let (status, detail) = send(&app, get(&format!("/api/admin/applications/{id}"), &admin)).await;
    assert_eq!(status, StatusCode::OK, "{detail}");
    let documents = detail["documents"].as_array().expect("documents");
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0]["documentType"], "passport_photo");
    assert_eq!(documents[0]["originalName"], "me.jpg");

    let (_, renewals) = send(&app, get("/api/admin/applications/renewals", &admin)).await;
    assert_eq!(renewals["applications"].as_array().expect("list").len(), 1);
    let (_, others) = send(&app, get("/api/admin/applications", &admin)).await;
    assert!(others["applications"].as_array().expect("list").is_empty());
}

#[actix_web::test]
async fn unknown_tracking_numbers_are_not_found() {
    let harness = harness().await;
    let app = init_app!(harness);

    for number in ["APP2025999999", "not-a-number"] {
        let (status, body) = send(
            &app,
            TestRequest::get().uri(&format!("/api/applications/track/{number}")),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "not_found");
    }
}

#[actix_web::test]
async fn overlong_upload_names_are_shortened_not_fatal() {
    let harness = harness().await;
    let app = init_app!(harness);
    let admin = admin_token(&app).await;
    let officer = token(&approved_officer(&app, &admin, "12345678", "jane@example.org").await);
    let year = current_year();
    let photo_name = format!("{}.jpg", "p".repeat(300));

    let (content_type, body) = renewal_multipart(&photo_name);
    let (status, submitted) = send(
        &app,
        TestRequest::post()
            .uri("/api/applications")
            .insert_header(bearer(&officer))
            .insert_header((CONTENT_TYPE, content_type))
            .set_payload(body),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{submitted}");
    assert_eq!(submitted["applicationNumber"], format!("APP{year}000001"));

    let stored: Vec<String> = std::fs::read_dir(harness.uploads.path())
        .expect("upload dir")
        .map(|entry| entry.expect("entry").file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(stored.len(), 1);
    assert!(stored[0].len() <= 255, "{}", stored[0]);
    assert!(stored[0].starts_with(&format!("APP{year}000001_passport_photo_")));
    assert!(stored[0].ends_with(".jpg"));

    let id = submitted["applicationId"].as_str().expect("id");
    let (_, detail) = send(&app, get(&format!("/api/admin/applications/{id}"), &admin)).await;
    assert_eq!(detail["documents"][0]["originalName"], photo_name);
}

#[actix_web::test]
async fn overlong_applicant_names_are_rejected_before_numbering() {
    let harness = harness().await;
    let app = init_app!(harness);
    let admin = admin_token(&app).await;
    let officer = token(&approved_officer(&app, &admin, "12345678", "jane@example.org").await);
    let year = current_year();

    let mut applicant = applicant_body();
    applicant["firstName"] = json!("A".repeat(129));
    let (status, body) = send(
        &app,
        post_json("/api/applications", &applicant).insert_header(bearer(&officer)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["field"], "firstName");
    assert_eq!(body["details"]["code"], "too_long");

    let accepted = submit_application(&app, &officer).await;
    assert_eq!(accepted["applicationNumber"], format!("APP{year}000001"));
}

#[actix_web::test]
async fn dispatching_twice_reports_already_dispatched() {
    let harness = harness().await;
    let app = init_app!(harness);
    let admin = admin_token(&app).await;
    let officer = token(&approved_officer(&app, &admin, "12345678", "jane@example.org").await);

    let submitted = submit_application(&app, &officer).await;
    let id = submitted["applicationId"].as_str().expect("id");
    let (status, _) = send(
        &app,
        put(&format!("/api/admin/applications/{id}/approve"), &admin),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, dispatched) = send(
        &app,
        put(&format!("/api/admin/applications/{id}/dispatch"), &admin),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{dispatched}");
    assert_eq!(dispatched["application"]["status"], "dispatched");

    let (status, body) = send(
        &app,
        put(&format!("/api/admin/applications/{id}/dispatch"), &admin),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_eligible");
    assert_eq!(body["error"], "application already dispatched");
}

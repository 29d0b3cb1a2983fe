use super::common::*;
use axum::extract::{DefaultBodyLimit, FromRequest, Multipart, State};
use axum::http::StatusCode;
use chrono::{Datelike, Local};
use serde_json::json;
use tower::ServiceExt;

use crate::intake::multipart::{read_submission, MultipartError};
use crate::intake::repository::SubmissionRepository;
use crate::intake::router::{intake_router, submit_handler};

#[tokio::test]
async fn read_submission_splits_fields_and_documents() {
    let request = multipart_request(multipart_body(&valid_form()));
    let multipart = Multipart::from_request(request, &())
        .await
        .expect("multipart extractor");

    let form = read_submission(multipart).await.expect("body parses");

    assert_eq!(form.field("firstName"), Some("Jane"));
    assert_eq!(form.field("sameAsResidential"), Some("false"));
    assert_eq!(form.files.len(), 2);
    assert_eq!(form.files[1].file_name, "utility-bill.pdf");
    assert_eq!(form.files[1].content_type, "application/pdf");
    assert_eq!(&form.files[1].data[..], b"%PDF-1.7");
}

#[tokio::test]
async fn read_submission_rejects_files_outside_documents_field() {
    let body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"avatar\"; filename=\"me.png\"\r\nContent-Type: image/png\r\n\r\npng\r\n--{BOUNDARY}--\r\n"
    );
    let multipart = Multipart::from_request(multipart_request(body.into_bytes()), &())
        .await
        .expect("multipart extractor");

    match read_submission(multipart).await {
        Err(MultipartError::UnexpectedFile(name)) => assert_eq!(name, "avatar"),
        other => panic!("expected unexpected-file error, got {other:?}"),
    }
}

#[tokio::test]
async fn submit_route_accepts_valid_submission() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (service, repository) = build_service(dir.path()).await;

    let response = intake_router(service)
        .oneshot(multipart_request(multipart_body(&valid_form())))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload, json!({ "message": "Form submitted successfully" }));

    let records = repository.all().expect("reads");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].documents.len(), 2);
}

#[tokio::test]
async fn submit_route_rejects_underage_applicants() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (service, repository) = build_service(dir.path()).await;
    let ten_years_ago = Local::now().date_naive().year() - 10;
    let form = valid_form().with_field("dob", format!("{ten_years_ago}-01-01"));

    let response = intake_router(service)
        .oneshot(multipart_request(multipart_body(&form)))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload["error"], "User must be at least 18 years old.");
    assert!(repository.all().expect("reads").is_empty());
}

#[tokio::test]
async fn submit_route_requires_two_documents() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (service, _) = build_service(dir.path()).await;

    let response = intake_router(service)
        .oneshot(multipart_request(multipart_body(&with_single_document(
            valid_form(),
        ))))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload["error"], "Minimum two documents are required.");
}

#[tokio::test]
async fn submit_route_ignores_permanent_address_when_mirrored() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (service, repository) = build_service(dir.path()).await;
    let form = valid_form()
        .with_field("sameAsResidential", "true")
        .with_field("permanentAddress", r#"{"street1":"","street2":""}"#);

    let response = intake_router(service)
        .oneshot(multipart_request(multipart_body(&form)))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let stored = repository.all().expect("reads");
    assert_eq!(stored[0].permanent_address, stored[0].residential_address);
}

#[tokio::test]
async fn submit_handler_returns_server_error_on_repository_failure() {
    let dir = tempfile::tempdir().expect("tempdir");
    let service = build_failing_service(dir.path()).await;
    let multipart = Multipart::from_request(
        multipart_request(multipart_body(&valid_form())),
        &(),
    )
    .await
    .expect("multipart extractor");

    let response = submit_handler::<UnavailableRepository>(State(service), multipart).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let payload = read_json_body(response).await;
    assert_eq!(payload["error"], "Server error");
    assert!(payload["details"]
        .as_str()
        .unwrap_or_default()
        .contains("connection refused"));
}

#[tokio::test]
async fn read_submission_skips_empty_file_inputs() {
    let form = valid_form().with_file("", "application/octet-stream", &b""[..]);
    let multipart = Multipart::from_request(multipart_request(multipart_body(&form)), &())
        .await
        .expect("multipart extractor");

    let parsed = read_submission(multipart).await.expect("body parses");

    assert_eq!(parsed.files.len(), 2);
    assert!(parsed.files.iter().all(|file| !file.file_name.is_empty()));
}

#[tokio::test]
async fn empty_file_input_does_not_count_towards_minimum() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (service, repository) = build_service(dir.path()).await;
    let form = with_single_document(valid_form()).with_file(
        "",
        "application/octet-stream",
        &b""[..],
    );

    let response = intake_router(service)
        .oneshot(multipart_request(multipart_body(&form)))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload["error"], "Minimum two documents are required.");
    assert!(repository.all().expect("reads").is_empty());
}

#[tokio::test]
async fn oversized_uploads_are_payload_too_large() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (service, repository) = build_service(dir.path()).await;
    let mut form = valid_form();
    form.files[1].data = vec![b'x'; 4096].into();

    let response = intake_router(service)
        .layer(DefaultBodyLimit::max(1024))
        .oneshot(multipart_request(multipart_body(&form)))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let payload = read_json_body(response).await;
    assert!(payload["error"].is_string());
    assert!(repository.all().expect("reads").is_empty());
    assert_eq!(staged_files(dir.path()), 0);
}

#[tokio::test]
async fn unexpected_file_fields_are_bad_requests() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (service, _) = build_service(dir.path()).await;
    let body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"avatar\"; filename=\"me.png\"\r\nContent-Type: image/png\r\n\r\npng\r\n--{BOUNDARY}--\r\n"
    );

    let response = intake_router(service)
        .oneshot(multipart_request(body.into_bytes()))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload["error"], "unexpected file field 'avatar'");
}

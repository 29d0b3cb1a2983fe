use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request};
use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::intake::domain::{SubmissionForm, SubmissionId, SubmissionRecord};
use crate::intake::repository::{
    InMemorySubmissionRepository, RepositoryError, SubmissionRepository,
};
use crate::intake::service::SubmissionService;
use crate::intake::storage::DocumentStore;
use crate::intake::validation::SubmissionPolicy;

pub(super) const BOUNDARY: &str = "onboarding-test-boundary";

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).expect("valid date")
}

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

/// Jane Doe with separate residential and permanent addresses and two documents.
pub(super) fn valid_form() -> SubmissionForm {
    SubmissionForm::default()
        .with_field("firstName", "Jane")
        .with_field("lastName", "Doe")
        .with_field("email", "jane.doe@example.com")
        .with_field("dob", "1990-01-01")
        .with_field(
            "residentialAddress",
            r#"{"street1":"12 Harbour Road","street2":"Flat 3"}"#,
        )
        .with_field("sameAsResidential", "false")
        .with_field(
            "permanentAddress",
            r#"{"street1":"4 Mill Lane","street2":"Greenfield"}"#,
        )
        .with_file("passport.png", "image/png", &b"\x89PNG\r\n"[..])
        .with_file("utility-bill.pdf", "application/pdf", &b"%PDF-1.7"[..])
}

pub(super) fn with_single_document(mut form: SubmissionForm) -> SubmissionForm {
    form.files.truncate(1);
    form
}

pub(super) async fn build_service(
    upload_dir: &std::path::Path,
) -> (
    Arc<SubmissionService<InMemorySubmissionRepository>>,
    Arc<InMemorySubmissionRepository>,
) {
    let repository = Arc::new(InMemorySubmissionRepository::default());
    let documents = Arc::new(DocumentStore::open(upload_dir).await.expect("store opens"));
    let service = Arc::new(SubmissionService::new(
        repository.clone(),
        documents,
        SubmissionPolicy::default(),
    ));
    (service, repository)
}

pub(super) async fn build_failing_service(
    upload_dir: &std::path::Path,
) -> Arc<SubmissionService<UnavailableRepository>> {
    let documents = Arc::new(DocumentStore::open(upload_dir).await.expect("store opens"));
    Arc::new(SubmissionService::new(
        Arc::new(UnavailableRepository),
        documents,
        SubmissionPolicy::default(),
    ))
}

pub(super) struct UnavailableRepository;

impl SubmissionRepository for UnavailableRepository {
    fn insert(&self, _record: SubmissionRecord) -> Result<SubmissionRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("connection refused".to_string()))
    }

    fn fetch(&self, _id: &SubmissionId) -> Result<Option<SubmissionRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("connection refused".to_string()))
    }

    fn all(&self) -> Result<Vec<SubmissionRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("connection refused".to_string()))
    }
}

pub(super) fn multipart_body(form: &SubmissionForm) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in &form.fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    for file in &form.files {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"documents\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                file.file_name, file.content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(&file.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub(super) fn multipart_request(body: Vec<u8>) -> Request<Body> {
    Request::post("/api/form/submit")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .expect("request builds")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("json payload")
}

pub(super) fn staged_files(dir: &std::path::Path) -> usize {
    std::fs::read_dir(dir).expect("upload dir readable").count()
}

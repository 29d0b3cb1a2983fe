use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::json;

use super::multipart::read_submission;
use crate::error::AppError;
use super::repository::SubmissionRepository;
use super::service::{SubmissionService, SubmissionServiceError};

pub const SUBMIT_PATH: &str = "/api/form/submit";

/// Router builder exposing the onboarding form endpoint.
pub fn intake_router<R>(service: Arc<SubmissionService<R>>) -> Router
where
    R: SubmissionRepository + 'static,
{
    Router::new()
        .route(SUBMIT_PATH, post(submit_handler::<R>))
        .with_state(service)
}

pub(crate) async fn submit_handler<R>(
    State(service): State<Arc<SubmissionService<R>>>,
    multipart: Multipart,
) -> Response
where
    R: SubmissionRepository + 'static,
{
    let form = match read_submission(multipart).await {
        Ok(form) => form,
        Err(error) => {
            tracing::warn!(%error, "unreadable onboarding submission");
            return (
                error.status(),
                axum::Json(json!({ "error": error.body_text() })),
            )
                .into_response();
        }
    };

    match service.submit(form).await {
        Ok(_) => (
            StatusCode::OK,
            axum::Json(json!({ "message": "Form submitted successfully" })),
        )
            .into_response(),
        Err(SubmissionServiceError::Rejected(rejection)) => {
            tracing::info!(reason = %rejection, "onboarding submission rejected");
            bad_request(rejection.to_string())
        }
        Err(SubmissionServiceError::Storage(err)) => AppError::from(err).into_response(),
        Err(SubmissionServiceError::Repository(err)) => AppError::from(err).into_response(),
    }
}

fn bad_request(message: String) -> Response {
    (StatusCode::BAD_REQUEST, axum::Json(json!({ "error": message }))).into_response()
}

use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde::Deserialize;

use crate::intake::multipart::DOCUMENTS_FIELD;
use crate::intake::router::SUBMIT_PATH;

use super::attachments::AttachmentList;
use super::state::OnboardingForm;
use super::validation::FieldErrors;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("form has {} invalid field(s)", .0.len())]
    Invalid(FieldErrors),
    #[error("server rejected submission ({status}): {message}")]
    Rejected { status: StatusCode, message: String },
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Deserialize)]
struct ServerReply {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Text parts of the multipart payload, in the order they are sent.
pub fn text_parts(form: &OnboardingForm) -> Result<Vec<(&'static str, String)>, serde_json::Error> {
    Ok(vec![
        ("firstName", form.first_name.clone()),
        ("lastName", form.last_name.clone()),
        ("email", form.email.clone()),
        ("dob", form.dob.clone()),
        (
            "residentialAddress",
            serde_json::to_string(&form.residential_address)?,
        ),
        ("sameAsResidential", form.same_as_residential.to_string()),
        (
            "permanentAddress",
            serde_json::to_string(&form.permanent_address)?,
        ),
    ])
}

/// HTTP client posting the onboarding form to the intake endpoint.
#[derive(Debug, Clone)]
pub struct SubmissionClient {
    http: reqwest::Client,
    base_url: String,
}

impl SubmissionClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, SUBMIT_PATH)
    }

    /// Validate the form and, if it passes, send it. Returns the server's confirmation.
    pub async fn submit(
        &self,
        form: &mut OnboardingForm,
        attachments: &AttachmentList,
    ) -> Result<String, ClientError> {
        if !form.validate() {
            return Err(ClientError::Invalid(form.errors().clone()));
        }

        let payload = multipart_payload(form, attachments)?;
        let response = self
            .http
            .post(self.endpoint())
            .multipart(payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let reply: Option<ServerReply> = serde_json::from_str(&body).ok();

        if status.is_success() {
            Ok(reply
                .and_then(|reply| reply.message)
                .unwrap_or_else(|| "Form submitted successfully".to_string()))
        } else {
            let message = reply
                .and_then(|reply| reply.error)
                .unwrap_or_else(|| "Form submission failed".to_string());
            Err(ClientError::Rejected { status, message })
        }
    }
}

/// Build the multipart body: text parts, JSON-encoded addresses, one `documents` part per file.
pub fn multipart_payload(
    form: &OnboardingForm,
    attachments: &AttachmentList,
) -> Result<Form, ClientError> {
    let parts = text_parts(form).map_err(|err| {
        let mut errors = FieldErrors::new();
        errors.insert("address".to_string(), err.to_string());
        ClientError::Invalid(errors)
    })?;

    let mut payload = Form::new();
    for (name, value) in parts {
        payload = payload.text(name, value);
    }

    for file in attachments.files() {
        let part = Part::bytes(file.data.clone())
            .file_name(file.file_name.clone())
            .mime_str(&file.content_type)?;
        payload = payload.part(DOCUMENTS_FIELD, part);
    }

    Ok(payload)
}

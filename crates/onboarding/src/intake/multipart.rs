use axum::extract::multipart::{Multipart, MultipartError as AxumMultipartError};
use axum::http::StatusCode;

use super::domain::{FilePart, SubmissionForm};

/// Multipart field that carries the uploaded documents.
pub const DOCUMENTS_FIELD: &str = "documents";

#[derive(Debug, thiserror::Error)]
pub enum MultipartError {
    #[error("failed to read multipart body: {0}")]
    Malformed(#[from] AxumMultipartError),
    #[error("unexpected file field '{0}'")]
    UnexpectedFile(String),
}

impl MultipartError {
    /// Status to answer with; body-limit overflows surface as 413.
    pub fn status(&self) -> StatusCode {
        match self {
            MultipartError::Malformed(err) => err.status(),
            MultipartError::UnexpectedFile(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Client-facing message.
    pub fn body_text(&self) -> String {
        match self {
            MultipartError::Malformed(err) => err.body_text(),
            MultipartError::UnexpectedFile(_) => self.to_string(),
        }
    }
}

/// Drain a multipart body into a [`SubmissionForm`].
///
/// A part is a file when it carries a file name; files are only accepted under
/// [`DOCUMENTS_FIELD`]. An empty file input (no file name, no bytes) is skipped.
/// Repeated text fields keep the last value.
pub async fn read_submission(mut multipart: Multipart) -> Result<SubmissionForm, MultipartError> {
    let mut form = SubmissionForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string).unwrap_or_default();

        match field.file_name().map(str::to_string) {
            Some(file_name) => {
                if name != DOCUMENTS_FIELD {
                    return Err(MultipartError::UnexpectedFile(name));
                }
                let content_type = field
                    .content_type()
                    .map(str::to_string)
                    .unwrap_or_else(|| mime::APPLICATION_OCTET_STREAM.to_string());
                let data = field.bytes().await?;
                if file_name.is_empty() && data.is_empty() {
                    continue;
                }
                form.files.push(FilePart {
                    file_name,
                    content_type,
                    data,
                });
            }
            None => {
                let value = field.text().await?;
                form.fields.insert(name, value);
            }
        }
    }

    Ok(form)
}

use std::collections::BTreeMap;
use std::fmt;

use axum::body::Bytes;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for persisted submissions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubmissionId(pub String);

impl SubmissionId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Two-line street address shared by the residential and permanent slots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub street1: String,
    #[serde(default)]
    pub street2: String,
}

impl Address {
    pub fn new(street1: impl Into<String>, street2: impl Into<String>) -> Self {
        Self {
            street1: street1.into(),
            street2: street2.into(),
        }
    }

    /// Both lines carry non-blank text.
    pub fn is_complete(&self) -> bool {
        !self.street1.trim().is_empty() && !self.street2.trim().is_empty()
    }
}

/// Stored classification of an uploaded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Image,
    Pdf,
}

impl DocumentKind {
    pub const fn label(self) -> &'static str {
        match self {
            DocumentKind::Image => "image",
            DocumentKind::Pdf => "pdf",
        }
    }

    /// Substring classification of a MIME type. Anything that is not an image lands in `Pdf`,
    /// including types that are neither.
    pub fn classify(content_type: &str) -> Self {
        if content_type.contains("image") {
            DocumentKind::Image
        } else {
            DocumentKind::Pdf
        }
    }

    /// Like [`DocumentKind::classify`] but yields `None` for types matching neither kind.
    pub fn classify_strict(content_type: &str) -> Option<Self> {
        if content_type.contains("image") {
            Some(DocumentKind::Image)
        } else if content_type.contains("pdf") {
            Some(DocumentKind::Pdf)
        } else {
            None
        }
    }

    /// Whether a browser-reported MIME type is an acceptable upload for this kind.
    pub fn accepts_upload(self, content_type: &str) -> bool {
        let Ok(parsed) = content_type.trim().parse::<mime::Mime>() else {
            return false;
        };

        match self {
            DocumentKind::Image => {
                let subtype = parsed.subtype();
                parsed.type_() == mime::IMAGE
                    && (subtype == mime::JPEG || subtype == mime::PNG || subtype == mime::GIF)
            }
            DocumentKind::Pdf => {
                parsed.type_() == mime::APPLICATION && parsed.subtype() == mime::PDF
            }
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Metadata kept for each stored upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentDescriptor {
    pub file_name: String,
    pub file_type: DocumentKind,
    pub file_path: String,
}

/// Persisted onboarding submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    pub id: SubmissionId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub dob: NaiveDate,
    pub residential_address: Address,
    pub same_as_residential: bool,
    pub permanent_address: Address,
    pub documents: Vec<DocumentDescriptor>,
    pub submitted_at: DateTime<Utc>,
}

/// One uploaded file as received from the client, before anything touches disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub file_name: String,
    pub content_type: String,
    pub data: Bytes,
}

/// Raw multipart payload: textual fields by name plus the `documents` file parts in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionForm {
    pub fields: BTreeMap<String, String>,
    pub files: Vec<FilePart>,
}

impl SubmissionForm {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn with_file(
        mut self,
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        self.files.push(FilePart {
            file_name: file_name.into(),
            content_type: content_type.into(),
            data: data.into(),
        });
        self
    }
}

/// Applicant details that survived validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicantDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub dob: NaiveDate,
    pub residential_address: Address,
    pub same_as_residential: bool,
    pub permanent_address: Address,
}

/// A classified upload waiting to be written to the document store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDocument {
    pub file_name: String,
    pub kind: DocumentKind,
    pub content_type: String,
    pub data: Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSubmission {
    pub applicant: ApplicantDetails,
    pub documents: Vec<PendingDocument>,
}

impl ValidatedSubmission {
    pub fn into_record(
        self,
        id: SubmissionId,
        documents: Vec<DocumentDescriptor>,
        submitted_at: DateTime<Utc>,
    ) -> SubmissionRecord {
        let ApplicantDetails {
            first_name,
            last_name,
            email,
            dob,
            residential_address,
            same_as_residential,
            permanent_address,
        } = self.applicant;

        SubmissionRecord {
            id,
            first_name,
            last_name,
            email,
            dob,
            residential_address,
            same_as_residential,
            permanent_address,
            documents,
            submitted_at,
        }
    }
}

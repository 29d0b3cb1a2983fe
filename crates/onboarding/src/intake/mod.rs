//! Onboarding form intake: multipart parsing, eligibility checks, document staging, and
//! submission persistence behind `POST /api/form/submit`.

pub mod domain;
pub mod multipart;
pub mod repository;
pub mod router;
pub mod service;
pub mod storage;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    Address, ApplicantDetails, DocumentDescriptor, DocumentKind, FilePart, PendingDocument,
    SubmissionForm, SubmissionId, SubmissionRecord, ValidatedSubmission,
};
pub use multipart::{read_submission, MultipartError, DOCUMENTS_FIELD};
pub use repository::{
    InMemorySubmissionRepository, JsonLinesSubmissionRepository, RepositoryError,
    SubmissionRepository,
};
pub use router::{intake_router, SUBMIT_PATH};
pub use service::{SubmissionService, SubmissionServiceError};
pub use storage::{DocumentStore, StorageError};
pub use validation::{age_on, SubmissionGuard, SubmissionPolicy, SubmissionRejection};

use std::sync::Arc;

use chrono::{Local, NaiveDate, Utc};

use super::domain::{SubmissionForm, SubmissionId, SubmissionRecord};
use super::repository::{RepositoryError, SubmissionRepository};
use super::storage::{DocumentStore, StorageError};
use super::validation::{SubmissionGuard, SubmissionPolicy, SubmissionRejection};

/// Service composing the submission guard, document store, and repository.
pub struct SubmissionService<R> {
    guard: Arc<SubmissionGuard>,
    documents: Arc<DocumentStore>,
    repository: Arc<R>,
}

impl<R> SubmissionService<R>
where
    R: SubmissionRepository + 'static,
{
    pub fn new(repository: Arc<R>, documents: Arc<DocumentStore>, policy: SubmissionPolicy) -> Self {
        Self {
            guard: Arc::new(SubmissionGuard::with_policy(policy)),
            documents,
            repository,
        }
    }

    /// Validate and persist a submission, judging age against the local calendar date.
    pub async fn submit(
        &self,
        form: SubmissionForm,
    ) -> Result<SubmissionRecord, SubmissionServiceError> {
        self.submit_on(form, Local::now().date_naive()).await
    }

    /// Validate and persist a submission as of `today`.
    ///
    /// Documents are written before the record. If the insert fails the files stay on disk.
    /// Repository calls block, so the insert runs on the blocking pool.
    pub async fn submit_on(
        &self,
        form: SubmissionForm,
        today: NaiveDate,
    ) -> Result<SubmissionRecord, SubmissionServiceError> {
        let validated = self.guard.validate(form, today)?;
        let descriptors = self.documents.stage_all(&validated.documents).await?;

        let id = SubmissionId::generate();
        let staged_paths: Vec<String> = descriptors
            .iter()
            .map(|descriptor| descriptor.file_path.clone())
            .collect();
        let record = validated.into_record(id, descriptors, Utc::now());

        let repository = Arc::clone(&self.repository);
        let inserted = match tokio::task::spawn_blocking(move || repository.insert(record)).await {
            Ok(result) => result,
            Err(join_error) => Err(RepositoryError::Unavailable(format!(
                "insert task failed: {join_error}"
            ))),
        };

        match inserted {
            Ok(stored) => {
                tracing::info!(
                    submission_id = %stored.id,
                    documents = stored.documents.len(),
                    same_as_residential = stored.same_as_residential,
                    "onboarding submission stored"
                );
                Ok(stored)
            }
            Err(err) => {
                tracing::error!(
                    error = %err,
                    orphaned = ?staged_paths,
                    "submission insert failed; staged documents left on disk"
                );
                Err(err.into())
            }
        }
    }
}

/// Error raised by the submission service.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionServiceError {
    #[error(transparent)]
    Rejected(#[from] SubmissionRejection),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

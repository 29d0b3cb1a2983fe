use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use super::domain::{SubmissionId, SubmissionRecord};

/// Storage abstraction so the service can be exercised in isolation.
///
/// Records are append-only: there is no update or delete.
pub trait SubmissionRepository: Send + Sync {
    fn insert(&self, record: SubmissionRecord) -> Result<SubmissionRecord, RepositoryError>;
    fn fetch(&self, id: &SubmissionId) -> Result<Option<SubmissionRecord>, RepositoryError>;
    fn all(&self) -> Result<Vec<SubmissionRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("repository unavailable: {0}")]
    Unavailable(String),
    #[error("stored record is unreadable: {0}")]
    Corrupt(String),
}

impl From<std::io::Error> for RepositoryError {
    fn from(value: std::io::Error) -> Self {
        Self::Unavailable(value.to_string())
    }
}

impl<T> From<PoisonError<T>> for RepositoryError {
    fn from(_: PoisonError<T>) -> Self {
        Self::Unavailable("repository lock poisoned".to_string())
    }
}

/// Process-local store, used for tests and `SUBMISSIONS_PATH=memory`.
#[derive(Debug, Default, Clone)]
pub struct InMemorySubmissionRepository {
    records: Arc<Mutex<Vec<SubmissionRecord>>>,
}

impl SubmissionRepository for InMemorySubmissionRepository {
    fn insert(&self, record: SubmissionRecord) -> Result<SubmissionRecord, RepositoryError> {
        self.records.lock()?.push(record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &SubmissionId) -> Result<Option<SubmissionRecord>, RepositoryError> {
        let guard = self.records.lock()?;
        Ok(guard.iter().find(|record| &record.id == id).cloned())
    }

    fn all(&self) -> Result<Vec<SubmissionRecord>, RepositoryError> {
        Ok(self.records.lock()?.clone())
    }
}

/// Document store keeping one JSON document per line in a single collection file.
#[derive(Debug)]
pub struct JsonLinesSubmissionRepository {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonLinesSubmissionRepository {
    /// Open (creating parent directories and the file if needed) the collection at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, RepositoryError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        OpenOptions::new().create(true).append(true).open(&path)?;

        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Vec<SubmissionRecord>, RepositoryError> {
        let reader = BufReader::new(File::open(&self.path)?);
        let mut records = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record = serde_json::from_str(&line)
                .map_err(|err| RepositoryError::Corrupt(format!("line {}: {err}", index + 1)))?;
            records.push(record);
        }
        Ok(records)
    }
}

impl SubmissionRepository for JsonLinesSubmissionRepository {
    fn insert(&self, record: SubmissionRecord) -> Result<SubmissionRecord, RepositoryError> {
        let mut line = serde_json::to_string(&record)
            .map_err(|err| RepositoryError::Unavailable(err.to_string()))?;
        line.push('\n');

        let _guard = self.write_lock.lock()?;
        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        file.write_all(line.as_bytes())?;
        file.sync_data()?;
        Ok(record)
    }

    fn fetch(&self, id: &SubmissionId) -> Result<Option<SubmissionRecord>, RepositoryError> {
        Ok(self
            .read_all()?
            .into_iter()
            .find(|record| &record.id == id))
    }

    fn all(&self) -> Result<Vec<SubmissionRecord>, RepositoryError> {
        self.read_all()
    }
}

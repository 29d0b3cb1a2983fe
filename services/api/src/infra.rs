use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use onboarding::config::SubmissionStoreConfig;
use onboarding::intake::{
    InMemorySubmissionRepository, JsonLinesSubmissionRepository, RepositoryError,
    SubmissionId, SubmissionRecord, SubmissionRepository,
};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Submission store selected by `SUBMISSIONS_PATH`.
#[derive(Debug)]
pub(crate) enum ConfiguredRepository {
    Memory(InMemorySubmissionRepository),
    JsonLines(JsonLinesSubmissionRepository),
}

impl ConfiguredRepository {
    pub(crate) fn open(config: &SubmissionStoreConfig) -> Result<Self, RepositoryError> {
        match config {
            SubmissionStoreConfig::Memory => Ok(Self::Memory(InMemorySubmissionRepository::default())),
            SubmissionStoreConfig::JsonLines(path) => {
                JsonLinesSubmissionRepository::open(path).map(Self::JsonLines)
            }
        }
    }

    pub(crate) fn describe(&self) -> String {
        match self {
            ConfiguredRepository::Memory(_) => "memory".to_string(),
            ConfiguredRepository::JsonLines(store) => store.path().display().to_string(),
        }
    }
}

impl SubmissionRepository for ConfiguredRepository {
    fn insert(&self, record: SubmissionRecord) -> Result<SubmissionRecord, RepositoryError> {
        match self {
            ConfiguredRepository::Memory(store) => store.insert(record),
            ConfiguredRepository::JsonLines(store) => store.insert(record),
        }
    }

    fn fetch(&self, id: &SubmissionId) -> Result<Option<SubmissionRecord>, RepositoryError> {
        match self {
            ConfiguredRepository::Memory(store) => store.fetch(id),
            ConfiguredRepository::JsonLines(store) => store.fetch(id),
        }
    }

    fn all(&self) -> Result<Vec<SubmissionRecord>, RepositoryError> {
        match self {
            ConfiguredRepository::Memory(store) => store.all(),
            ConfiguredRepository::JsonLines(store) => store.all(),
        }
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

use crate::cli::ServeArgs;
use crate::infra::{AppState, ConfiguredRepository};
use crate::routes::{with_intake_routes, UPLOADS_PREFIX};
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use onboarding::config::AppConfig;
use onboarding::error::AppError;
use onboarding::intake::{DocumentStore, SubmissionPolicy, SubmissionService};
use onboarding::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(ConfiguredRepository::open(&config.intake.submissions)?);
    let documents = Arc::new(DocumentStore::open(&config.intake.upload_dir).await?);
    let policy = SubmissionPolicy::new(config.intake.strict_document_types);
    info!(
        submissions = %repository.describe(),
        uploads = %documents.upload_dir().display(),
        strict_document_types = policy.strict_document_types(),
        "submission storage ready"
    );
    let submission_service = Arc::new(SubmissionService::new(repository, documents, policy));

    let app = with_intake_routes(submission_service, &config.intake, &config.server)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, uploads_prefix = UPLOADS_PREFIX, "onboarding form service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

use crate::cli::ServeArgs;
use crate::infra::{AppState, LogNotificationSink};
use crate::routes::with_registration_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

use regform::config::AppConfig;
use regform::error::AppError;
use regform::registration::{JsonFileStore, PhotoEncoder, SubmissionPipeline};
use regform::telemetry;

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

    // Load-on-start: the store re-reads the durable slot as it opens.
    let store = Arc::new(JsonFileStore::open(&config.storage.data_dir)?);
    let notifications = Arc::new(LogNotificationSink);
    let encoder = PhotoEncoder::new(config.encode_policy);
    let pipeline = Arc::new(SubmissionPipeline::new(
        store.clone(),
        notifications,
        encoder,
    ));

    let app = with_registration_routes(pipeline)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        store = %store.path().display(),
        encode_policy = config.encode_policy.label(),
        "registration intake service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

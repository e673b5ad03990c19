use crate::cli::ServeArgs;
use crate::dataset::Dataset;
use crate::infra::{AppState, InMemoryEntityStore};
use crate::routes::with_analytics_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use talentflow::analytics::{AnalyticsSession, SessionState};
use talentflow::config::AppConfig;
use talentflow::error::AppError;
use talentflow::telemetry;
use tracing::{info, warn};

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

    let dataset = Dataset::load(args.dataset.as_deref())?;
    let store = Arc::new(InMemoryEntityStore::new(dataset));
    let session = Arc::new(AnalyticsSession::new(
        store,
        config.analytics.session_settings(),
    ));

    // Warm the snapshot so the first dashboard load has data.
    if let SessionState::Failed(message) = session.refresh().await {
        warn!(%message, "initial analytics refresh failed");
    }

    let app = with_analytics_routes(session)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "talentflow analytics service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

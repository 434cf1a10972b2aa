use crate::cli::ServeArgs;
use crate::demo;
use crate::infra::{default_scoring_config, AppState, InMemoryDirectory, InMemoryHistory};
use crate::routes::with_intelligence_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use freight_intel::config::AppConfig;
use freight_intel::error::AppError;
use freight_intel::intelligence::service::ServiceLimits;
use freight_intel::intelligence::{IntelligenceService, LoadBookImporter};
use freight_intel::telemetry;
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

    // The registry is seeded; the load book comes from a CSV export when one
    // is supplied, else from the same seed the demo uses.
    let (carriers, shippers, csrs) = demo::sample_directory();
    let (seed_loads, quotes) = demo::sample_history();
    let loads = match args.loads_csv.take() {
        Some(path) => LoadBookImporter::from_path(path)?,
        None => seed_loads,
    };

    let history = Arc::new(InMemoryHistory::with_rows(loads, quotes));
    let directory = Arc::new(InMemoryDirectory::with_entities(carriers, shippers, csrs));
    let service = Arc::new(IntelligenceService::with_limits(
        history,
        directory,
        default_scoring_config(),
        ServiceLimits::from(&config.search),
    ));

    let app = with_intelligence_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "freight intelligence service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

use crate::cli::ServeArgs;
use crate::infra::{in_memory_pipeline, AppState};
use crate::routes::with_pipeline_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use internship_pipeline::config::AppConfig;
use internship_pipeline::error::AppError;
use internship_pipeline::telemetry;
use internship_pipeline::workflows::roster::RosterImporter;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(roster) = args.roster.take() {
        config.pipeline.staff_roster = Some(roster);
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let pipeline = in_memory_pipeline(&config.pipeline);
    if let Some(path) = &config.pipeline.staff_roster {
        let roster = RosterImporter::from_path(path)?;
        roster.seed(&*pipeline.staff)?;
    }

    let strategy = pipeline.candidates.assignment().strategy();
    let app = with_pipeline_routes(pipeline.candidates, pipeline.staff)
        .layer(Extension(app_state))
        .layer(prometheus_layer)
        .layer(TraceLayer::new_for_http());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        %strategy,
        concurrency = %config.pipeline.write_concurrency,
        "internship pipeline ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

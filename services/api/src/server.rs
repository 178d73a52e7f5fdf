use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryClimateRepository};
use crate::routes::with_advisor_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use climate_sense::advisor::{ClimateAdvisorService, GeminiClient};
use climate_sense::config::AppConfig;
use climate_sense::error::AppError;
use climate_sense::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
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

    let generator = Arc::new(GeminiClient::from_config(&config.generation)?);
    if !generator.is_configured() {
        warn!("GEMINI_API_KEY is not set; guidance endpoints will answer 503");
    }
    let repository = Arc::new(InMemoryClimateRepository::default());
    let advisor_service = Arc::new(ClimateAdvisorService::new(generator, repository));

    let app = with_advisor_routes(advisor_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, model = %config.generation.model, "climate advisor ready");

    axum::serve(listener, app).await?;
    Ok(())
}

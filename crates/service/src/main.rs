//! Weather Service - Dubai average temperature prediction endpoint
//!
//! Loads one regression artifact at startup, then serves `/health` and
//! `/predict` over HTTP. A missing or corrupt artifact aborts startup.

use anyhow::{Context, Result};
use service_lib::{artifact, PredictionService, StructuredLogger};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use weather_service::{api, config};

const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    let config = config::ServiceConfig::load()?;
    let logger = StructuredLogger::new("weather-service");
    logger.log_startup(SERVICE_VERSION, &config.model_path);

    // The listener is not bound until the model is in memory
    let service = PredictionService::new(config.predict_options()).with_logger(logger.clone());
    let model = artifact::load_verified(&config.model_path, config.model_sha256.as_deref())
        .with_context(|| format!("Failed to load model artifact {}", config.model_path))?;
    if service.install_model(model).is_err() {
        anyhow::bail!("model installed twice during startup");
    }

    let state = Arc::new(
        api::AppState::new(Arc::new(service)).with_legacy_error_status(config.legacy_error_status),
    );

    let shutdown_logger = logger.clone();
    api::serve(&config.bind_addr(), state, async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => shutdown_logger.log_shutdown("SIGINT received"),
            Err(e) => {
                tracing::warn!(error = %e, "Unable to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
        }
    })
    .await?;

    info!("Shutdown complete");
    Ok(())
}

//! Skin Lesion Classification Service
//!
//! Serves a pre-trained skin lesion classifier through a small upload page
//! and a JSON prediction endpoint. Runs in degraded mode (fixed fallback
//! predictions) when the model cannot be loaded.

use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use skin_classifier::api::rest::{create_rest_router, AppState};
use skin_classifier::config::Config;
use skin_classifier::engine::load_classifier;
use skin_classifier::service::Predictor;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration before logging so the level can come from it
    let loaded = Config::load(Config::default_path());
    let config = loaded.as_ref().cloned().unwrap_or_default();

    let level = Level::from_str(&config.logging.level).unwrap_or(Level::INFO);
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .init();

    info!("Starting Skin Lesion Classification Service v{}", env!("CARGO_PKG_VERSION"));
    if let Err(e) = &loaded {
        info!("Using default config ({})", e);
    }

    info!("Configuration loaded:");
    info!("  Listen: {}:{}", config.server.host, config.server.port);
    info!("  Model: {}", config.model.path.display());
    info!("  Device: {}", config.model.device);
    info!("  UI dir: {}", config.server.ui_dir.display());

    // Load the model once; a failure leaves the service in degraded mode
    let model = load_classifier(&config.model);
    if model.is_none() {
        warn!("No model available, serving fallback predictions");
    }
    let predictor = Arc::new(Predictor::new(model));

    let app_state = Arc::new(AppState::new(predictor));
    let rest_router = create_rest_router(app_state, &config.server);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Skin Lesion Classification Service is ready!");
    info!("UI: http://localhost:{}/", config.server.port);
    info!("Predict: POST http://localhost:{}/api/predict", config.server.port);

    axum::serve(listener, rest_router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Goodbye!");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, cleaning up...");
}

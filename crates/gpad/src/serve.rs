//! `gpad serve` — load artifacts, then serve the HTTP API.

use anyhow::Context;
use tracing::{info, warn};

use gpa_api::{ApiState, build_router};
use gpa_core::GpaConfig;
use gpa_model::{ModelReport, Predictor};

pub async fn run(config: GpaConfig) -> anyhow::Result<()> {
    info!("GPA prediction service starting");

    // ── Artifacts ──────────────────────────────────────────────
    // Loaded before the listener exists: without both, nothing is served.
    let predictor = Predictor::load(&config.artifacts)
        .context("model artifacts unavailable, refusing to start")?;
    let summary = predictor.summary();
    info!(scaler = summary.scaler, model = summary.model, "predictor ready");

    let report = ModelReport::load(&config.artifacts);
    if let Some(metrics) = &report.metrics {
        let verdict = metrics.evaluate(&config.thresholds);
        if !verdict.passed {
            warn!(?metrics, ?verdict, "model metrics below configured thresholds");
        }
    }

    // ── API server ─────────────────────────────────────────────
    let router = build_router(ApiState::new(predictor, report, config.thresholds));
    let listener = tokio::net::TcpListener::bind((config.server.host.as_str(), config.server.port))
        .await
        .with_context(|| format!("failed to bind {}:{}", config.server.host, config.server.port))?;
    info!(addr = %listener.local_addr()?, "API server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("GPA prediction service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to install Ctrl-C handler, running until killed");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

//! gpa-api — HTTP API for the GPA predictor.
//!
//! # API Routes
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | POST | `/predict` | Predict GPA for one feature record |
//! | GET | `/healthz` | Readiness and loaded artifact kinds |
//! | GET | `/api/v1/schema` | Feature names, types, bounds, descriptions |
//! | GET | `/api/v1/model` | Training metrics, threshold verdicts, feature importance |
//!
//! The router is only ever built from a loaded [`Predictor`], so a running
//! server is always ready.

pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use gpa_core::config::MetricThresholds;
use gpa_model::{ModelReport, Predictor};

pub use error::ApiError;

/// Shared, read-only state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub predictor: Predictor,
    pub report: Arc<ModelReport>,
    pub thresholds: MetricThresholds,
}

impl ApiState {
    pub fn new(predictor: Predictor, report: ModelReport, thresholds: MetricThresholds) -> Self {
        Self {
            predictor,
            report: Arc::new(report),
            thresholds,
        }
    }
}

/// Build the complete API router.
pub fn build_router(state: ApiState) -> Router {
    let api_routes = Router::new()
        .route("/schema", get(handlers::schema))
        .route("/model", get(handlers::model_report));

    Router::new()
        .route("/predict", post(handlers::predict))
        .route("/healthz", get(handlers::healthz))
        .nest("/api/v1", api_routes)
        .with_state(state)
}

//! The prediction pipeline: parse → validate → scale → predict.
//!
//! `Predictor` is the service context. It is built once from loaded
//! artifacts and handed to request handlers; nothing in it changes after
//! construction. Each call emits exactly one log event describing the
//! outcome.

use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, warn};

use gpa_core::config::ArtifactsConfig;
use gpa_core::{FeatureRecord, PredictError, PredictResult, validate};

use crate::artifacts::Artifacts;
use crate::error::{ArtifactError, ModelError};
use crate::regressor::Regressor;
use crate::scaler::FeatureTransform;

/// Successful pipeline output: the estimate plus the echoed input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionResult {
    pub prediction: f64,
    pub input: FeatureRecord,
}

/// What the predictor is running, for health reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PredictorSummary {
    pub scaler: &'static str,
    pub model: &'static str,
    pub n_features: usize,
}

#[derive(Clone)]
pub struct Predictor {
    scaler: Arc<dyn FeatureTransform>,
    model: Arc<dyn Regressor>,
}

impl Predictor {
    pub fn new(artifacts: Artifacts) -> Self {
        Self::from_parts(Arc::new(artifacts.scaler), Arc::new(artifacts.model))
    }

    pub fn from_parts(scaler: Arc<dyn FeatureTransform>, model: Arc<dyn Regressor>) -> Self {
        Self { scaler, model }
    }

    /// Load artifacts from disk and build a predictor.
    pub fn load(config: &ArtifactsConfig) -> Result<Self, ArtifactError> {
        Artifacts::load(config).map(Self::new)
    }

    pub fn summary(&self) -> PredictorSummary {
        PredictorSummary {
            scaler: self.scaler.kind(),
            model: self.model.kind(),
            n_features: self.model.n_features(),
        }
    }

    /// Run the pipeline on a raw JSON body.
    pub fn predict_json(&self, body: &[u8]) -> PredictResult<PredictionResult> {
        match FeatureRecord::from_json_slice(body) {
            Ok(record) => self.predict(&record),
            Err(e) => {
                warn!(kind = e.kind(), error = %e, "prediction request rejected");
                Err(e)
            }
        }
    }

    /// Run the pipeline on a parsed record.
    pub fn predict(&self, record: &FeatureRecord) -> PredictResult<PredictionResult> {
        let result = self.run(record);
        match &result {
            Ok(r) => info!(input = ?record, prediction = r.prediction, "prediction made"),
            Err(e) if e.is_client_error() => {
                warn!(input = ?record, kind = e.kind(), error = %e, "prediction request rejected")
            }
            Err(e) => error!(input = ?record, kind = e.kind(), error = %e, "error making prediction"),
        }
        result
    }

    fn run(&self, record: &FeatureRecord) -> PredictResult<PredictionResult> {
        let valid = validate(record)?;
        let scaled = self.scaler.transform(valid.vector()).map_err(internal)?;
        let prediction = self.model.predict(&scaled).map_err(internal)?;
        if !prediction.is_finite() {
            return Err(internal(ModelError::NonFinite(prediction)));
        }
        Ok(PredictionResult {
            prediction,
            input: *record,
        })
    }
}

fn internal(e: ModelError) -> PredictError {
    PredictError::TransformOrPredictFailure(e.to_string())
}

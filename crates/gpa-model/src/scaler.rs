//! Fitted feature scaling.

use serde::{Deserialize, Serialize};

use gpa_core::NUM_FEATURES;

use crate::error::ModelError;

/// A fitted transform from raw feature vector to model input.
pub trait FeatureTransform: Send + Sync {
    /// Short name for logs and the health endpoint.
    fn kind(&self) -> &'static str;

    fn transform(&self, input: &[f64]) -> Result<Vec<f64>, ModelError>;
}

/// Serialized scaler parameters, one entry per feature in column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Scaler {
    /// `(x - mean) / scale`
    Standard {
        mean: Vec<f64>,
        scale: Vec<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        feature_names: Option<Vec<String>>,
    },
    /// `x * scale + min`
    MinMax {
        min: Vec<f64>,
        scale: Vec<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        feature_names: Option<Vec<String>>,
    },
}

impl Scaler {
    /// Identity standard scaler, handy for fixtures.
    pub fn identity() -> Self {
        Scaler::Standard {
            mean: vec![0.0; NUM_FEATURES],
            scale: vec![1.0; NUM_FEATURES],
            feature_names: None,
        }
    }

    fn params(&self) -> (&[f64], &[f64]) {
        match self {
            Scaler::Standard { mean, scale, .. } => (mean, scale),
            Scaler::MinMax { min, scale, .. } => (min, scale),
        }
    }

    pub fn feature_names(&self) -> Option<&[String]> {
        match self {
            Scaler::Standard { feature_names, .. } | Scaler::MinMax { feature_names, .. } => {
                feature_names.as_deref()
            }
        }
    }

    /// Check the parameters describe an `NUM_FEATURES`-wide finite transform.
    pub fn check(&self) -> Result<(), String> {
        let (offset, scale) = self.params();
        if offset.len() != NUM_FEATURES || scale.len() != NUM_FEATURES {
            return Err(format!(
                "expected {NUM_FEATURES} parameters per feature, got {} and {}",
                offset.len(),
                scale.len()
            ));
        }
        if offset.iter().chain(scale).any(|v| !v.is_finite()) {
            return Err("non-finite scaling parameter".to_string());
        }
        Ok(())
    }
}

impl FeatureTransform for Scaler {
    fn kind(&self) -> &'static str {
        match self {
            Scaler::Standard { .. } => "standard",
            Scaler::MinMax { .. } => "min_max",
        }
    }

    fn transform(&self, input: &[f64]) -> Result<Vec<f64>, ModelError> {
        let (offset, scale) = self.params();
        if input.len() != offset.len() || input.len() != scale.len() {
            return Err(ModelError::ShapeMismatch {
                expected: offset.len(),
                got: input.len(),
            });
        }
        let out: Vec<f64> = match self {
            Scaler::Standard { .. } => input
                .iter()
                .zip(offset.iter().zip(scale))
                .map(|(x, (mean, scale))| {
                    // Constant columns are stored with a zero scale.
                    let scale = if *scale == 0.0 { 1.0 } else { *scale };
                    (x - mean) / scale
                })
                .collect(),
            Scaler::MinMax { .. } => input
                .iter()
                .zip(offset.iter().zip(scale))
                .map(|(x, (min, scale))| x * scale + min)
                .collect(),
        };
        Ok(out)
    }
}

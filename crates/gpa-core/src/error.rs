//! Request-time error taxonomy for the prediction path.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::schema::Feature;

/// Result type alias for prediction operations.
pub type PredictResult<T> = Result<T, PredictError>;

/// A single field that failed its range check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldViolation {
    pub field: Feature,
    pub value: f64,
    pub min: f64,
    pub max: f64,
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid value for {}: {} (expected {}..={})",
            self.field, self.value, self.min, self.max
        )
    }
}

/// Errors that can occur while handling one prediction request.
#[derive(Debug, Error)]
pub enum PredictError {
    /// A required field is absent or not convertible to its declared type.
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    /// Well-typed fields outside their bounds. `first` is the earliest in
    /// column order; `all` lists every offender, `first` included.
    #[error("{first}")]
    OutOfRangeField {
        first: FieldViolation,
        all: Vec<FieldViolation>,
    },

    /// Scaling or inference failed on a validated record.
    #[error("prediction failed: {0}")]
    TransformOrPredictFailure(String),
}

impl PredictError {
    /// Stable machine-readable kind, used in logs and response bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            PredictError::MalformedRequest(_) => "malformed_request",
            PredictError::OutOfRangeField { .. } => "out_of_range_field",
            PredictError::TransformOrPredictFailure(_) => "internal_error",
        }
    }

    /// True if the caller sent bad input (as opposed to a server fault).
    pub fn is_client_error(&self) -> bool {
        !matches!(self, PredictError::TransformOrPredictFailure(_))
    }
}

//! Mapping of pipeline errors onto HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use gpa_core::{FieldViolation, PredictError};
use serde::Serialize;

/// Error body shared by all endpoints.
#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    kind: &'static str,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    violations: Vec<FieldViolation>,
}

/// A request failure ready to be rendered.
#[derive(Debug)]
pub struct ApiError {
    error: PredictError,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.error {
            PredictError::MalformedRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
            PredictError::OutOfRangeField { .. } => StatusCode::BAD_REQUEST,
            PredictError::TransformOrPredictFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<PredictError> for ApiError {
    fn from(error: PredictError) -> Self {
        Self { error }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut body = ErrorBody {
            success: false,
            kind: self.error.kind(),
            error: self.error.to_string(),
            field: None,
            value: None,
            violations: Vec::new(),
        };
        match self.error {
            PredictError::OutOfRangeField { first, all } => {
                body.field = Some(first.field.name());
                body.value = Some(first.value);
                body.violations = all;
            }
            // Internal detail is logged by the pipeline and never returned.
            PredictError::TransformOrPredictFailure(_) => {
                body.error = "prediction failed".to_string();
            }
            PredictError::MalformedRequest(_) => {}
        }
        (status, Json(body)).into_response()
    }
}

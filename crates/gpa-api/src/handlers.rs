//! HTTP handlers.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use gpa_core::config::MetricThresholds;
use gpa_core::{FEATURE_SCHEMA, FeatureRecord, FeatureSpec};
use gpa_model::{FeatureImportance, ModelMetrics, PredictorSummary, ThresholdVerdict};

use crate::{ApiError, ApiState};

/// Response wrapper for the informational endpoints.
#[derive(Serialize)]
struct ApiResponse<T: Serialize> {
    success: bool,
    data: T,
}

impl<T: Serialize> ApiResponse<T> {
    fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data,
        })
    }
}

/// Body of a successful prediction.
#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub prediction: f64,
}

// ── Prediction ─────────────────────────────────────────────────

/// POST /predict
pub async fn predict(State(state): State<ApiState>, body: Bytes) -> Response {
    match state.predictor.predict_json(&body) {
        Ok(result) => Json(PredictionResponse {
            prediction: result.prediction,
        })
        .into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

// ── Health ─────────────────────────────────────────────────────

#[derive(Serialize)]
struct Health {
    status: &'static str,
    model: PredictorSummary,
}

/// GET /healthz
pub async fn healthz(State(state): State<ApiState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        ApiResponse::ok(Health {
            status: "ready",
            model: state.predictor.summary(),
        }),
    )
}

// ── Schema ─────────────────────────────────────────────────────

#[derive(Serialize)]
struct SchemaView {
    features: &'static [FeatureSpec],
    example: FeatureRecord,
}

/// GET /api/v1/schema
pub async fn schema() -> impl IntoResponse {
    ApiResponse::ok(SchemaView {
        features: &FEATURE_SCHEMA,
        example: FeatureRecord::example(),
    })
}

// ── Model report ───────────────────────────────────────────────

#[derive(Serialize)]
struct ModelView {
    model: PredictorSummary,
    metrics: Option<ModelMetrics>,
    thresholds: MetricThresholds,
    verdict: Option<ThresholdVerdict>,
    feature_importance: Option<Vec<FeatureImportance>>,
}

/// GET /api/v1/model
pub async fn model_report(State(state): State<ApiState>) -> impl IntoResponse {
    let report = &state.report;
    ApiResponse::ok(ModelView {
        model: state.predictor.summary(),
        metrics: report.metrics,
        thresholds: state.thresholds,
        verdict: report.metrics.map(|m| m.evaluate(&state.thresholds)),
        feature_importance: report.feature_importance.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpa_model::{Artifacts, LinearModel, Model, ModelReport, Predictor, Scaler};
    use serde_json::{Value, json};

    fn test_state(report: ModelReport) -> ApiState {
        let model = Model::Linear(LinearModel {
            coef: vec![-0.05, 0.1, 0.2, 0.05, 0.1, 0.05, 0.05, 0.0],
            intercept: 2.5,
            feature_names: None,
        });
        let artifacts = Artifacts::from_parts(Scaler::identity(), model).unwrap();
        ApiState::new(Predictor::new(artifacts), report, MetricThresholds::default())
    }

    fn example_body() -> Value {
        json!({
            "Absences": 5,
            "ParentalSupport": 3,
            "Tutoring": 0,
            "StudyTimeWeekly": 15.0,
            "Extracurricular": 1,
            "Music": 1,
            "Sports": 0,
            "Ethnicity": 2
        })
    }

    async fn body_json(resp: Response) -> Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn bytes(value: &Value) -> Bytes {
        Bytes::from(serde_json::to_vec(value).unwrap())
    }

    #[tokio::test]
    async fn predict_example() {
        let resp = predict(State(test_state(ModelReport::default())), bytes(&example_body())).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        // 2.5 - 0.25 + 0.3 + 0.75 + 0.1 + 0.05
        let prediction = body["prediction"].as_f64().unwrap();
        assert!((prediction - 3.45).abs() < 1e-9);
    }

    #[tokio::test]
    async fn predict_out_of_range_is_bad_request() {
        let mut req = example_body();
        req["Absences"] = json!(31);
        req["Ethnicity"] = json!(4);
        let resp = predict(State(test_state(ModelReport::default())), bytes(&req)).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body = body_json(resp).await;
        assert_eq!(body["kind"], "out_of_range_field");
        assert_eq!(body["field"], "Absences");
        assert_eq!(body["value"], 31.0);
        assert_eq!(body["violations"].as_array().unwrap().len(), 2);
        assert!(body.get("prediction").is_none());
    }

    #[tokio::test]
    async fn whole_valued_float_is_accepted() {
        let mut req = example_body();
        req["Absences"] = json!(5.0);
        let resp = predict(State(test_state(ModelReport::default())), bytes(&req)).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn predict_missing_field_is_unprocessable() {
        let mut req = example_body();
        req.as_object_mut().unwrap().remove("Sports");
        let resp = predict(State(test_state(ModelReport::default())), bytes(&req)).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(resp).await;
        assert_eq!(body["kind"], "malformed_request");
        assert!(body["error"].as_str().unwrap().contains("Sports"));
    }

    #[tokio::test]
    async fn predict_empty_body_is_unprocessable() {
        let resp = predict(State(test_state(ModelReport::default())), Bytes::new()).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn healthz_reports_ready() {
        let resp = healthz(State(test_state(ModelReport::default()))).await.into_response();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["data"]["status"], "ready");
        assert_eq!(body["data"]["model"]["model"], "linear");
    }

    #[tokio::test]
    async fn schema_lists_eight_features_in_order() {
        let body = body_json(schema().await.into_response()).await;
        let features = body["data"]["features"].as_array().unwrap();
        assert_eq!(features.len(), 8);
        assert_eq!(features[0]["feature"], "Absences");
        assert_eq!(features[3]["kind"], "float");
        assert_eq!(features[7]["max"], 3.0);
        assert_eq!(body["data"]["example"], example_body());
    }

    #[tokio::test]
    async fn model_report_without_files() {
        let resp = model_report(State(test_state(ModelReport::default()))).await.into_response();
        let body = body_json(resp).await;
        assert!(body["data"]["metrics"].is_null());
        assert!(body["data"]["verdict"].is_null());
        assert_eq!(body["data"]["thresholds"]["r2_score"], 0.8);
    }

    #[tokio::test]
    async fn model_report_with_metrics() {
        let report = ModelReport {
            metrics: Some(ModelMetrics {
                r2_score: 0.75,
                mae: 0.2,
                rmse: 0.3,
                mse: None,
            }),
            feature_importance: None,
        };
        let state = test_state(report);
        let body = body_json(model_report(State(state)).await.into_response()).await;
        assert_eq!(body["data"]["verdict"]["passed"], false);
        assert_eq!(body["data"]["verdict"]["mae"], true);
    }
}

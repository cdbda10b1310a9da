//! Training-time model report: evaluation metrics and feature importance.
//!
//! Both files are optional outputs of the training job. A missing or
//! unreadable file is logged and leaves that part of the report empty; it
//! never affects readiness.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use gpa_core::Feature;
use gpa_core::config::{ArtifactsConfig, MetricThresholds};

/// Held-out evaluation metrics recorded by the training job.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelMetrics {
    pub r2_score: f64,
    pub mae: f64,
    pub rmse: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mse: Option<f64>,
}

/// Pass/fail of each metric against its configured threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThresholdVerdict {
    pub r2_score: bool,
    pub mae: bool,
    pub rmse: bool,
    pub passed: bool,
}

impl ModelMetrics {
    pub fn evaluate(&self, thresholds: &MetricThresholds) -> ThresholdVerdict {
        let r2_score = self.r2_score >= thresholds.r2_score;
        let mae = self.mae <= thresholds.mae;
        let rmse = self.rmse <= thresholds.rmse;
        ThresholdVerdict {
            r2_score,
            mae,
            rmse,
            passed: r2_score && mae && rmse,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureImportance {
    pub feature: Feature,
    pub importance: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ModelReport {
    pub metrics: Option<ModelMetrics>,
    /// Sorted by descending importance.
    pub feature_importance: Option<Vec<FeatureImportance>>,
}

impl ModelReport {
    /// Read `metrics.json` and `feature_importance.json`, if present.
    pub fn load(config: &ArtifactsConfig) -> Self {
        let metrics = read_optional::<ModelMetrics>(&config.metrics_path(), "metrics");
        let feature_importance = read_optional::<BTreeMap<String, f64>>(
            &config.feature_importance_path(),
            "feature importance",
        )
        .map(importance_from_map);
        Self {
            metrics,
            feature_importance,
        }
    }
}

fn read_optional<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> Option<T> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "{what} file not found, report will omit it");
            return None;
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read {what} file");
            return None;
        }
    };
    match serde_json::from_str(&content) {
        Ok(v) => {
            debug!(path = %path.display(), "{what} loaded");
            Some(v)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to parse {what} file");
            None
        }
    }
}

fn importance_from_map(raw: BTreeMap<String, f64>) -> Vec<FeatureImportance> {
    let mut out: Vec<FeatureImportance> = raw
        .into_iter()
        .filter_map(|(name, importance)| match name.parse::<Feature>() {
            Ok(feature) => Some(FeatureImportance { feature, importance }),
            Err(e) => {
                warn!(error = %e, "ignoring feature importance entry");
                None
            }
        })
        .collect();
    out.sort_by(|a, b| {
        b.importance
            .total_cmp(&a.importance)
            .then(a.feature.cmp(&b.feature))
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluate_against_thresholds() {
        let thresholds = MetricThresholds::default();
        let good = ModelMetrics {
            r2_score: 0.91,
            mae: 0.19,
            rmse: 0.24,
            mse: None,
        };
        assert!(good.evaluate(&thresholds).passed);

        let weak = ModelMetrics { r2_score: 0.6, ..good };
        let verdict = weak.evaluate(&thresholds);
        assert!(!verdict.passed);
        assert!(!verdict.r2_score);
        assert!(verdict.mae && verdict.rmse);
    }

    #[test]
    fn missing_files_yield_empty_report() {
        let dir = tempfile::tempdir().unwrap();
        let report = ModelReport::load(&ArtifactsConfig::in_dir(dir.path()));
        assert_eq!(report, ModelReport::default());
    }

    #[test]
    fn loads_and_sorts_importance() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("metrics.json"),
            r#"{"r2_score": 0.9, "mae": 0.2, "rmse": 0.25, "mse": 0.0625}"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("feature_importance.json"),
            r#"{"Music": 0.01, "Absences": 0.8, "StudyTimeWeekly": 0.1, "Age": 0.5}"#,
        )
        .unwrap();

        let report = ModelReport::load(&ArtifactsConfig::in_dir(dir.path()));
        assert_eq!(report.metrics.unwrap().mse, Some(0.0625));
        let order: Vec<_> = report
            .feature_importance
            .unwrap()
            .into_iter()
            .map(|f| f.feature)
            .collect();
        assert_eq!(
            order,
            vec![Feature::Absences, Feature::StudyTimeWeekly, Feature::Music]
        );
    }

    #[test]
    fn unparsable_metrics_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("metrics.json"), "not json").unwrap();
        let report = ModelReport::load(&ArtifactsConfig::in_dir(dir.path()));
        assert!(report.metrics.is_none());
    }
}

//! Offline subcommands: `predict`, `check`, `schema`.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, bail};

use gpa_core::{FEATURE_SCHEMA, FeatureKind, GpaConfig};
use gpa_model::{ModelReport, PredictionResult, Predictor};

/// Run one prediction against the configured artifacts. `-` reads stdin.
pub fn predict(config: &GpaConfig, input: &Path) -> anyhow::Result<()> {
    let body = if input == Path::new("-") {
        let mut buf = Vec::new();
        std::io::stdin().read_to_end(&mut buf)?;
        buf
    } else {
        std::fs::read(input).with_context(|| format!("failed to read {}", input.display()))?
    };

    let predictor = Predictor::load(&config.artifacts).context("model artifacts unavailable")?;
    let result = predictor.predict_json(&body)?;
    println!("{}", render_prediction(&result)?);
    Ok(())
}

/// Same body the HTTP endpoint returns on success.
fn render_prediction(result: &PredictionResult) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&serde_json::json!({
        "prediction": result.prediction,
    }))?)
}

/// Load artifacts and the model report and print a summary.
pub fn check(config: &GpaConfig, strict: bool) -> anyhow::Result<()> {
    let predictor = Predictor::load(&config.artifacts).context("model artifacts unavailable")?;
    let summary = predictor.summary();
    println!("model:  {} ({} features)", summary.model, summary.n_features);
    println!("scaler: {}", summary.scaler);

    let report = ModelReport::load(&config.artifacts);
    let Some(metrics) = report.metrics else {
        println!("metrics: not available");
        if strict {
            bail!("no metrics file at {}", config.artifacts.metrics_path().display());
        }
        return Ok(());
    };

    let t = &config.thresholds;
    let verdict = metrics.evaluate(t);
    println!("metrics:");
    println!("  r2_score {:.4} (>= {}) {}", metrics.r2_score, t.r2_score, mark(verdict.r2_score));
    println!("  mae      {:.4} (<= {}) {}", metrics.mae, t.mae, mark(verdict.mae));
    println!("  rmse     {:.4} (<= {}) {}", metrics.rmse, t.rmse, mark(verdict.rmse));

    if let Some(importance) = &report.feature_importance {
        println!("feature importance:");
        for entry in importance {
            println!("  {:<16} {:.4}", entry.feature.name(), entry.importance);
        }
    }

    if strict && !verdict.passed {
        bail!("model metrics below configured thresholds");
    }
    Ok(())
}

fn mark(ok: bool) -> &'static str {
    if ok { "ok" } else { "FAIL" }
}

/// Print the input schema.
pub fn schema() {
    println!("{:<3} {:<16} {:<8} {:>5} {:>5}  description", "#", "feature", "type", "min", "max");
    for (i, spec) in FEATURE_SCHEMA.iter().enumerate() {
        let kind = match spec.kind {
            FeatureKind::Integer => "int",
            FeatureKind::Float => "float",
        };
        println!(
            "{:<3} {:<16} {:<8} {:>5} {:>5}  {}",
            i,
            spec.feature.name(),
            kind,
            spec.min,
            spec.max,
            spec.description
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpa_core::FeatureRecord;
    use serde_json::{Value, json};

    #[test]
    fn prediction_output_has_only_the_estimate() {
        let result = PredictionResult {
            prediction: 3.25,
            input: FeatureRecord::example(),
        };
        let rendered: Value = serde_json::from_str(&render_prediction(&result).unwrap()).unwrap();
        assert_eq!(rendered, json!({"prediction": 3.25}));
    }
}

//! Artifact loading.
//!
//! The scaler and model are read once at startup. Both must load and agree
//! with the feature schema, or no `Artifacts` value is produced.

use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::info;

use gpa_core::config::ArtifactsConfig;
use gpa_core::{FEATURE_SCHEMA, NUM_FEATURES};

use crate::error::ArtifactError;
use crate::regressor::{Model, Regressor};
use crate::scaler::{FeatureTransform, Scaler};

/// The fitted scaler and model, both validated against the schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifacts {
    pub scaler: Scaler,
    pub model: Model,
}

impl Artifacts {
    /// Load both artifacts from the configured paths.
    pub fn load(config: &ArtifactsConfig) -> Result<Self, ArtifactError> {
        let scaler_path = config.scaler_path();
        let model_path = config.model_path();

        let scaler: Scaler = read_json(&scaler_path)?;
        let model: Model = read_json(&model_path)?;
        let artifacts = Self::from_parts(scaler, model).map_err(|e| match e {
            ArtifactError::Inconsistent { what, reason } => {
                let path = if what == "scaler" { scaler_path.clone() } else { model_path.clone() };
                ArtifactError::Invalid { what, path, reason }
            }
            other => other,
        })?;

        info!(
            scaler = artifacts.scaler.kind(),
            model = artifacts.model.kind(),
            scaler_path = %scaler_path.display(),
            model_path = %model_path.display(),
            "model and scaler loaded"
        );
        Ok(artifacts)
    }

    /// Validate in-memory artifacts. The error names which artifact is bad.
    pub fn from_parts(scaler: Scaler, model: Model) -> Result<Self, ArtifactError> {
        scaler.check().map_err(inconsistent("scaler"))?;
        check_feature_names(scaler.feature_names()).map_err(inconsistent("scaler"))?;

        model.check().map_err(inconsistent("model"))?;
        if model.n_features() != NUM_FEATURES {
            return Err(inconsistent("model")(format!(
                "fitted on {} features, expected {NUM_FEATURES}",
                model.n_features()
            )));
        }
        check_feature_names(model.feature_names()).map_err(inconsistent("model"))?;

        Ok(Self { scaler, model })
    }
}

fn inconsistent(what: &'static str) -> impl Fn(String) -> ArtifactError {
    move |reason| ArtifactError::Inconsistent { what, reason }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let content = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ArtifactError::Missing {
                path: path.to_path_buf(),
            }
        } else {
            ArtifactError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    serde_json::from_str(&content).map_err(|source| ArtifactError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Recorded column names, when present, must match the schema order exactly.
fn check_feature_names(names: Option<&[String]>) -> Result<(), String> {
    let Some(names) = names else {
        return Ok(());
    };
    let expected = FEATURE_SCHEMA.iter().map(|s| s.feature.name());
    if names.len() != NUM_FEATURES || !names.iter().map(String::as_str).eq(expected) {
        return Err(format!("feature columns {names:?} do not match the input schema order"));
    }
    Ok(())
}

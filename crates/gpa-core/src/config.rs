//! gpa.toml configuration parser.
//!
//! Every key has a default, so an empty file (or no file at all) yields a
//! working configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GpaConfig {
    pub server: ServerConfig,
    pub artifacts: ArtifactsConfig,
    pub thresholds: MetricThresholds,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

/// Locations of the persisted training outputs.
///
/// File entries are resolved against `dir` unless absolute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactsConfig {
    pub dir: PathBuf,
    pub model: PathBuf,
    pub scaler: PathBuf,
    pub metrics: PathBuf,
    pub feature_importance: PathBuf,
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("artifacts"),
            model: PathBuf::from("best_model.json"),
            scaler: PathBuf::from("scaler.json"),
            metrics: PathBuf::from("metrics.json"),
            feature_importance: PathBuf::from("feature_importance.json"),
        }
    }
}

impl ArtifactsConfig {
    /// Artifacts rooted at `dir` with default file names.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ..Self::default()
        }
    }

    fn resolve(&self, file: &Path) -> PathBuf {
        if file.is_absolute() {
            file.to_path_buf()
        } else {
            self.dir.join(file)
        }
    }

    pub fn model_path(&self) -> PathBuf {
        self.resolve(&self.model)
    }

    pub fn scaler_path(&self) -> PathBuf {
        self.resolve(&self.scaler)
    }

    pub fn metrics_path(&self) -> PathBuf {
        self.resolve(&self.metrics)
    }

    pub fn feature_importance_path(&self) -> PathBuf {
        self.resolve(&self.feature_importance)
    }
}

/// Acceptance bounds for the training metrics: `r2_score` is a floor,
/// `mae` and `rmse` are ceilings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricThresholds {
    pub r2_score: f64,
    pub mae: f64,
    pub rmse: f64,
}

impl Default for MetricThresholds {
    fn default() -> Self {
        Self {
            r2_score: 0.8,
            mae: 3.0,
            rmse: 4.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive string. `RUST_LOG` takes precedence.
    pub filter: String,
    pub format: LogFormat,
    /// Also append log records to this file.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            format: LogFormat::Text,
            file: None,
        }
    }
}

impl GpaConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: GpaConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load `path` if given, otherwise use defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }
}

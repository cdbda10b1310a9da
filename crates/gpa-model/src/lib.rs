//! gpa-model — inference for the GPA predictor.
//!
//! Loads the fitted scaler and regression model produced by the offline
//! training job and runs the request pipeline over them.
//!
//! # Pipeline
//!
//! ```text
//! JSON body ──parse──▶ FeatureRecord ──validate──▶ ValidRecord
//!     ──FeatureTransform──▶ scaled vector ──Regressor──▶ prediction
//! ```
//!
//! Artifacts are loaded once into a [`Predictor`], which is immutable and
//! cheap to clone (`Arc` inside), so concurrent requests share it without
//! locking.

pub mod artifacts;
pub mod error;
pub mod predictor;
pub mod regressor;
pub mod report;
pub mod scaler;

pub use artifacts::Artifacts;
pub use error::{ArtifactError, ModelError};
pub use predictor::{PredictionResult, Predictor, PredictorSummary};
pub use regressor::{LinearModel, Model, Node, Regressor, Tree, TreeEnsemble};
pub use report::{FeatureImportance, ModelMetrics, ModelReport, ThresholdVerdict};
pub use scaler::{FeatureTransform, Scaler};

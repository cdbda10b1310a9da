pub mod config;
pub mod error;
pub mod record;
pub mod schema;
pub mod validate;

pub use config::GpaConfig;
pub use error::{FieldViolation, PredictError, PredictResult};
pub use record::FeatureRecord;
pub use schema::{FEATURE_SCHEMA, Feature, FeatureKind, FeatureSpec, NUM_FEATURES};
pub use validate::{ValidRecord, validate, violations};

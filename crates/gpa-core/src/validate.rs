//! Range validation against `FEATURE_SCHEMA`.
//!
//! A `ValidRecord` can only be obtained through [`validate`], so anything
//! that takes one is guaranteed every field passed its bounds.

use crate::error::{FieldViolation, PredictError, PredictResult};
use crate::record::FeatureRecord;
use crate::schema::{FEATURE_SCHEMA, FeatureSpec, NUM_FEATURES};

/// A record whose every field is within its schema bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidRecord {
    vector: [f64; NUM_FEATURES],
}

impl ValidRecord {
    /// Raw feature vector in model column order.
    pub fn vector(&self) -> &[f64; NUM_FEATURES] {
        &self.vector
    }
}

fn check(spec: &FeatureSpec, value: f64) -> Option<FieldViolation> {
    (!spec.contains(value)).then_some(FieldViolation {
        field: spec.feature,
        value,
        min: spec.min,
        max: spec.max,
    })
}

/// Validate a record. The error names the first out-of-range field in
/// column order and carries the full list of offenders.
pub fn validate(record: &FeatureRecord) -> PredictResult<ValidRecord> {
    let all = violations(record);
    if let Some(&first) = all.first() {
        return Err(PredictError::OutOfRangeField { first, all });
    }
    Ok(ValidRecord {
        vector: record.to_vector(),
    })
}

/// Every out-of-range field, in column order. Empty when the record is valid.
pub fn violations(record: &FeatureRecord) -> Vec<FieldViolation> {
    FEATURE_SCHEMA
        .iter()
        .zip(record.to_vector())
        .filter_map(|(spec, value)| check(spec, value))
        .collect()
}

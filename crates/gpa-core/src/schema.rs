//! The fixed eight-feature input schema.
//!
//! `FEATURE_SCHEMA` is ordered: the position of each entry is the column
//! index the fitted scaler and regressor were trained on.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of model input features.
pub const NUM_FEATURES: usize = 8;

/// One model input column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Feature {
    Absences,
    ParentalSupport,
    Tutoring,
    StudyTimeWeekly,
    Extracurricular,
    Music,
    Sports,
    Ethnicity,
}

impl Feature {
    /// All features in model column order.
    pub const ALL: [Feature; NUM_FEATURES] = [
        Feature::Absences,
        Feature::ParentalSupport,
        Feature::Tutoring,
        Feature::StudyTimeWeekly,
        Feature::Extracurricular,
        Feature::Music,
        Feature::Sports,
        Feature::Ethnicity,
    ];

    /// Column name as it appears on the wire and in artifacts.
    pub fn name(self) -> &'static str {
        match self {
            Feature::Absences => "Absences",
            Feature::ParentalSupport => "ParentalSupport",
            Feature::Tutoring => "Tutoring",
            Feature::StudyTimeWeekly => "StudyTimeWeekly",
            Feature::Extracurricular => "Extracurricular",
            Feature::Music => "Music",
            Feature::Sports => "Sports",
            Feature::Ethnicity => "Ethnicity",
        }
    }

    /// Column index in the model input vector.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error)]
#[error("unknown feature: {0}")]
pub struct UnknownFeature(pub String);

impl FromStr for Feature {
    type Err = UnknownFeature;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Feature::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| UnknownFeature(s.to_string()))
    }
}

/// Declared wire type of a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    Integer,
    Float,
}

/// Name, type, inclusive bounds, and description of one feature.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FeatureSpec {
    pub feature: Feature,
    pub kind: FeatureKind,
    pub min: f64,
    pub max: f64,
    pub description: &'static str,
}

impl FeatureSpec {
    /// Inclusive range check. NaN is never in range.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// The validation table, in model column order.
pub static FEATURE_SCHEMA: [FeatureSpec; NUM_FEATURES] = [
    FeatureSpec {
        feature: Feature::Absences,
        kind: FeatureKind::Integer,
        min: 0.0,
        max: 30.0,
        description: "Number of absences during the school year, ranging from 0 to 30",
    },
    FeatureSpec {
        feature: Feature::ParentalSupport,
        kind: FeatureKind::Integer,
        min: 0.0,
        max: 4.0,
        description: "Level of parental support: 0 (None), 1 (Low), 2 (Moderate), 3 (High), 4 (Very High)",
    },
    FeatureSpec {
        feature: Feature::Tutoring,
        kind: FeatureKind::Integer,
        min: 0.0,
        max: 1.0,
        description: "Tutoring status: 0 (No), 1 (Yes)",
    },
    FeatureSpec {
        feature: Feature::StudyTimeWeekly,
        kind: FeatureKind::Float,
        min: 0.0,
        max: 20.0,
        description: "Weekly study time in hours, ranging from 0 to 20",
    },
    FeatureSpec {
        feature: Feature::Extracurricular,
        kind: FeatureKind::Integer,
        min: 0.0,
        max: 1.0,
        description: "Participation in extracurricular activities: 0 (No), 1 (Yes)",
    },
    FeatureSpec {
        feature: Feature::Music,
        kind: FeatureKind::Integer,
        min: 0.0,
        max: 1.0,
        description: "Participation in music activities: 0 (No), 1 (Yes)",
    },
    FeatureSpec {
        feature: Feature::Sports,
        kind: FeatureKind::Integer,
        min: 0.0,
        max: 1.0,
        description: "Participation in sports: 0 (No), 1 (Yes)",
    },
    FeatureSpec {
        feature: Feature::Ethnicity,
        kind: FeatureKind::Integer,
        min: 0.0,
        max: 3.0,
        description: "Ethnicity: 0 (Caucasian), 1 (African American), 2 (Asian), 3 (Other)",
    },
];

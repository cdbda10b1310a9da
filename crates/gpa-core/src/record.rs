//! The prediction request record.

use std::fmt;

use serde::de::{self, Deserializer, Unexpected, Visitor};
use serde::{Deserialize, Serialize};

use crate::error::{PredictError, PredictResult};
use crate::schema::{Feature, NUM_FEATURES};

/// One prediction request's input.
///
/// Field names are PascalCase on the wire. Integer fields accept any JSON
/// number without a fractional part (`5` and `5.0` alike) and are signed,
/// so a negative or huge value parses and is then rejected by range
/// validation rather than by the parser. Unknown extra fields are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FeatureRecord {
    #[serde(deserialize_with = "whole_number")]
    pub absences: i64,
    #[serde(deserialize_with = "whole_number")]
    pub parental_support: i64,
    #[serde(deserialize_with = "whole_number")]
    pub tutoring: i64,
    pub study_time_weekly: f64,
    #[serde(deserialize_with = "whole_number")]
    pub extracurricular: i64,
    #[serde(deserialize_with = "whole_number")]
    pub music: i64,
    #[serde(deserialize_with = "whole_number")]
    pub sports: i64,
    #[serde(deserialize_with = "whole_number")]
    pub ethnicity: i64,
}

/// Accept an integer or a float with no fractional part. Magnitudes beyond
/// `i64` saturate, which keeps them out of range for every feature.
fn whole_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    deserializer.deserialize_any(WholeNumber)
}

struct WholeNumber;

impl Visitor<'_> for WholeNumber {
    type Value = i64;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a whole number")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
        Ok(v)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
        Ok(i64::try_from(v).unwrap_or(i64::MAX))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<i64, E> {
        if v.is_finite() && v.fract() == 0.0 {
            // `as` saturates at the i64 bounds.
            Ok(v as i64)
        } else {
            Err(E::invalid_value(Unexpected::Float(v), &self))
        }
    }
}

impl FeatureRecord {
    /// Parse a JSON body. Any missing or wrongly typed field is a
    /// `MalformedRequest`.
    pub fn from_json_slice(body: &[u8]) -> PredictResult<Self> {
        serde_json::from_slice(body).map_err(|e| PredictError::MalformedRequest(e.to_string()))
    }

    /// Parse an already-decoded JSON value.
    pub fn from_json_value(value: serde_json::Value) -> PredictResult<Self> {
        serde_json::from_value(value).map_err(|e| PredictError::MalformedRequest(e.to_string()))
    }

    /// Numeric value of one feature.
    pub fn value(&self, feature: Feature) -> f64 {
        match feature {
            Feature::Absences => self.absences as f64,
            Feature::ParentalSupport => self.parental_support as f64,
            Feature::Tutoring => self.tutoring as f64,
            Feature::StudyTimeWeekly => self.study_time_weekly,
            Feature::Extracurricular => self.extracurricular as f64,
            Feature::Music => self.music as f64,
            Feature::Sports => self.sports as f64,
            Feature::Ethnicity => self.ethnicity as f64,
        }
    }

    /// Raw feature vector in model column order.
    pub fn to_vector(&self) -> [f64; NUM_FEATURES] {
        Feature::ALL.map(|f| self.value(f))
    }

    /// A well-formed, in-range record, used as the documented request example.
    pub fn example() -> Self {
        Self {
            absences: 5,
            parental_support: 3,
            tutoring: 0,
            study_time_weekly: 15.0,
            extracurricular: 1,
            music: 1,
            sports: 0,
            ethnicity: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn example_json() -> serde_json::Value {
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

    #[test]
    fn parses_example() {
        let record = FeatureRecord::from_json_value(example_json()).unwrap();
        assert_eq!(record, FeatureRecord::example());
    }

    #[test]
    fn serializes_with_wire_names() {
        let value = serde_json::to_value(FeatureRecord::example()).unwrap();
        assert_eq!(value, example_json());
    }

    #[test]
    fn missing_any_field_is_malformed() {
        for feature in Feature::ALL {
            let mut value = example_json();
            value.as_object_mut().unwrap().remove(feature.name());
            let err = FeatureRecord::from_json_value(value).unwrap_err();
            assert!(
                matches!(err, PredictError::MalformedRequest(ref msg) if msg.contains(feature.name())),
                "{feature}: {err}"
            );
        }
    }

    #[test]
    fn wrong_type_is_malformed() {
        let mut value = example_json();
        value["Tutoring"] = json!("yes");
        let err = FeatureRecord::from_json_value(value).unwrap_err();
        assert_eq!(err.kind(), "malformed_request");

        let mut value = example_json();
        value["Absences"] = json!(5.5);
        let err = FeatureRecord::from_json_value(value).unwrap_err();
        assert_eq!(err.kind(), "malformed_request");

        let mut value = example_json();
        value["Music"] = json!(true);
        assert!(FeatureRecord::from_json_value(value).is_err());
    }

    #[test]
    fn whole_valued_float_is_an_integer() {
        let mut value = example_json();
        value["Absences"] = json!(5.0);
        value["Ethnicity"] = json!(2.0);
        let record = FeatureRecord::from_json_value(value).unwrap();
        assert_eq!(record, FeatureRecord::example());
    }

    #[test]
    fn huge_integers_saturate_instead_of_failing() {
        let mut value = example_json();
        value["Absences"] = json!(1e20);
        let record = FeatureRecord::from_json_value(value).unwrap();
        assert_eq!(record.absences, i64::MAX);

        let body = br#"{"Absences": 99999999999999999999, "ParentalSupport": -1e20,
            "Tutoring": 0, "StudyTimeWeekly": 15.0, "Extracurricular": 1,
            "Music": 1, "Sports": 0, "Ethnicity": 2}"#;
        let record = FeatureRecord::from_json_slice(body).unwrap();
        assert_eq!(record.absences, i64::MAX);
        assert_eq!(record.parental_support, i64::MIN);
    }

    #[test]
    fn negative_integer_is_well_typed() {
        let mut value = example_json();
        value["ParentalSupport"] = json!(-1);
        let record = FeatureRecord::from_json_value(value).unwrap();
        assert_eq!(record.parental_support, -1);
    }

    #[test]
    fn integer_study_time_is_accepted() {
        let mut value = example_json();
        value["StudyTimeWeekly"] = json!(12);
        let record = FeatureRecord::from_json_value(value).unwrap();
        assert_eq!(record.study_time_weekly, 12.0);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let mut value = example_json();
        value["GPA"] = json!(3.1);
        assert!(FeatureRecord::from_json_value(value).is_ok());
    }

    #[test]
    fn invalid_json_is_malformed() {
        let err = FeatureRecord::from_json_slice(b"{not json").unwrap_err();
        assert!(matches!(err, PredictError::MalformedRequest(_)));
    }

    #[test]
    fn vector_is_in_column_order() {
        let v = FeatureRecord::example().to_vector();
        assert_eq!(v, [5.0, 3.0, 0.0, 15.0, 1.0, 1.0, 0.0, 2.0]);
    }
}

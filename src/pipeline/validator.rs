//! Feature validation against the artifact's schema contract.
//!
//! The incoming mapping stays untyped until validation succeeds; only then
//! does it become a `ValidatedFeatures` record the rest of the pipeline can
//! trust. Extra keys are silently ignored by policy.

use crate::artifact::ModelArtifact;
use crate::error::ValidationFailure;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// Name-to-value mapping guaranteed to hold one finite number per required
/// feature. Only the validator constructs this.
#[derive(Debug, Clone)]
pub struct ValidatedFeatures(HashMap<String, f64>);

impl ValidatedFeatures {
    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Checks an incoming mapping against the artifact's required feature set.
pub struct FeatureValidator {
    artifact: Arc<ModelArtifact>,
}

impl FeatureValidator {
    pub fn new(artifact: Arc<ModelArtifact>) -> Self {
        Self { artifact }
    }

    /// Validate an untyped input mapping.
    ///
    /// Collects every missing name and every non-finite value before
    /// failing, so the caller can self-correct in one round trip. Must be
    /// called before any preprocessing, inference or persistence side
    /// effect.
    pub fn validate(&self, input: &Map<String, Value>) -> Result<ValidatedFeatures, ValidationFailure> {
        let mut failure = ValidationFailure::default();
        let mut validated = HashMap::with_capacity(self.artifact.features_order.len());

        for name in &self.artifact.features_order {
            match input.get(name) {
                None => failure.missing_features.push(name.clone()),
                Some(value) => match finite_number(value) {
                    Some(v) => {
                        validated.insert(name.clone(), v);
                    }
                    None => failure.invalid_features.push(name.clone()),
                },
            }
        }

        if failure.is_empty() {
            Ok(ValidatedFeatures(validated))
        } else {
            Err(failure)
        }
    }
}

/// A value is usable only if it is a JSON number representable as a finite
/// real. Null, strings, booleans, containers and non-finite numbers would
/// silently corrupt the numeric pipeline downstream.
fn finite_number(value: &Value) -> Option<f64> {
    value.as_f64().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::{Classifier, StandardScaler};
    use anyhow::Result;
    use serde_json::json;

    struct NeverClassifier;

    impl Classifier for NeverClassifier {
        fn predict_probability(&self, _features: &[f32]) -> Result<f64> {
            unreachable!("validator tests never reach inference")
        }
    }

    fn validator() -> FeatureValidator {
        FeatureValidator::new(Arc::new(ModelArtifact {
            classifier: Box::new(NeverClassifier),
            scaler: StandardScaler {
                mean: vec![],
                scale: vec![],
            },
            threshold: 0.5,
            features_order: vec!["age".to_string(), "tenure".to_string()],
            cols_to_scale: vec![],
        }))
    }

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_complete_input_passes() {
        let input = object(json!({"age": 30, "tenure": 3.5}));
        let validated = validator().validate(&input).unwrap();

        assert_eq!(validated.get("age"), Some(30.0));
        assert_eq!(validated.get("tenure"), Some(3.5));
        assert_eq!(validated.len(), 2);
    }

    #[test]
    fn test_missing_features_named_in_order() {
        let input = object(json!({"tenure": 3}));
        let failure = validator().validate(&input).unwrap_err();

        assert_eq!(failure.missing_features, vec!["age"]);
        assert!(failure.invalid_features.is_empty());
    }

    #[test]
    fn test_all_missing_named() {
        let input = object(json!({}));
        let failure = validator().validate(&input).unwrap_err();

        assert_eq!(failure.missing_features, vec!["age", "tenure"]);
    }

    #[test]
    fn test_non_numeric_value_invalid() {
        let input = object(json!({"age": "x", "tenure": 3}));
        let failure = validator().validate(&input).unwrap_err();

        assert!(failure.missing_features.is_empty());
        assert_eq!(failure.invalid_features, vec!["age"]);
    }

    #[test]
    fn test_null_and_bool_invalid() {
        let input = object(json!({"age": null, "tenure": true}));
        let failure = validator().validate(&input).unwrap_err();

        assert_eq!(failure.invalid_features, vec!["age", "tenure"]);
    }

    #[test]
    fn test_missing_and_invalid_reported_together() {
        let input = object(json!({"tenure": []}));
        let failure = validator().validate(&input).unwrap_err();

        assert_eq!(failure.missing_features, vec!["age"]);
        assert_eq!(failure.invalid_features, vec!["tenure"]);
    }

    #[test]
    fn test_extra_keys_ignored() {
        let input = object(json!({"age": 30, "tenure": 3, "department": "sales"}));
        let validated = validator().validate(&input).unwrap();

        assert_eq!(validated.len(), 2);
        assert_eq!(validated.get("department"), None);
    }

    #[test]
    fn test_extreme_magnitude_passes_through() {
        // Out-of-range magnitudes are a model concern, not a validation one
        let input = object(json!({"age": 1e6, "tenure": -1e6}));
        let validated = validator().validate(&input).unwrap();

        assert_eq!(validated.get("age"), Some(1e6));
    }
}

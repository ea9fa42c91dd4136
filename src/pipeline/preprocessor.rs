//! Deterministic preprocessing: canonical ordering plus selective scaling.

use crate::artifact::ModelArtifact;
use crate::pipeline::validator::ValidatedFeatures;
use anyhow::{anyhow, Result};
use std::sync::Arc;

/// Aligns validated features into the artifact's canonical vector order and
/// applies the frozen scaler to the designated column subset.
pub struct Preprocessor {
    artifact: Arc<ModelArtifact>,
}

impl Preprocessor {
    pub fn new(artifact: Arc<ModelArtifact>) -> Self {
        Self { artifact }
    }

    /// Build the model input vector.
    ///
    /// Slot `i` always holds the value named by `features_order[i]` - the
    /// vector is built by explicit name lookup, never by mapping iteration
    /// order. Columns outside `cols_to_scale` pass through as the raw
    /// validated values.
    pub fn vectorize(&self, features: &ValidatedFeatures) -> Result<Vec<f32>> {
        let order = &self.artifact.features_order;

        let mut vector = Vec::with_capacity(order.len());
        for name in order {
            let value = features
                .get(name)
                .ok_or_else(|| anyhow!("validated features missing '{}'", name))?;
            vector.push(value);
        }

        for (i, col) in self.artifact.cols_to_scale.iter().enumerate() {
            // Membership is guaranteed by the artifact loader
            if let Some(slot) = order.iter().position(|name| name == col) {
                vector[slot] = self.artifact.scaler.transform(i, vector[slot]);
            }
        }

        Ok(vector.into_iter().map(|v| v as f32).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::{Classifier, StandardScaler};
    use crate::pipeline::validator::FeatureValidator;
    use serde_json::json;

    struct NeverClassifier;

    impl Classifier for NeverClassifier {
        fn predict_probability(&self, _features: &[f32]) -> Result<f64> {
            unreachable!("preprocessor tests never reach inference")
        }
    }

    fn artifact() -> Arc<ModelArtifact> {
        Arc::new(ModelArtifact {
            classifier: Box::new(NeverClassifier),
            scaler: StandardScaler {
                mean: vec![35.0],
                scale: vec![10.0],
            },
            threshold: 0.5,
            features_order: vec!["age".to_string(), "tenure".to_string()],
            cols_to_scale: vec!["age".to_string()],
        })
    }

    fn validated(artifact: &Arc<ModelArtifact>, value: serde_json::Value) -> ValidatedFeatures {
        let map = match value {
            serde_json::Value::Object(map) => map,
            _ => panic!("expected object"),
        };
        FeatureValidator::new(artifact.clone()).validate(&map).unwrap()
    }

    #[test]
    fn test_scales_designated_column_only() {
        let artifact = artifact();
        let features = validated(&artifact, json!({"age": 30, "tenure": 3}));

        let vector = Preprocessor::new(artifact).vectorize(&features).unwrap();

        // age scaled: (30 - 35) / 10 = -0.5; tenure raw
        assert_eq!(vector, vec![-0.5, 3.0]);
    }

    #[test]
    fn test_order_follows_features_order_not_input() {
        let artifact = artifact();
        // Input keys deliberately in the reverse order
        let features = validated(&artifact, json!({"tenure": 7, "age": 45}));

        let vector = Preprocessor::new(artifact).vectorize(&features).unwrap();

        assert_eq!(vector, vec![1.0, 7.0]);
    }

    #[test]
    fn test_no_scaled_columns_passes_raw() {
        let artifact = Arc::new(ModelArtifact {
            classifier: Box::new(NeverClassifier),
            scaler: StandardScaler {
                mean: vec![],
                scale: vec![],
            },
            threshold: 0.5,
            features_order: vec!["age".to_string(), "tenure".to_string()],
            cols_to_scale: vec![],
        });
        let features = validated(&artifact, json!({"age": 30, "tenure": 3}));

        let vector = Preprocessor::new(artifact).vectorize(&features).unwrap();

        assert_eq!(vector, vec![30.0, 3.0]);
    }
}

//! Threshold-based scoring over the frozen classifier.

use crate::artifact::ModelArtifact;
use anyhow::Result;
use std::sync::Arc;

/// Outcome of one inference call. Captures the threshold used at decision
/// time so the audit record stays valid if the live configuration changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scored {
    /// Calibrated positive-class probability in [0, 1]
    pub probability: f64,
    /// 1 iff probability >= threshold
    pub prediction: u8,
    /// Threshold value applied to this request
    pub threshold: f64,
}

/// Wraps the artifact's classifier and applies the decision threshold.
///
/// Inference is a pure in-process computation; there are no retries. A
/// classifier failure here means a broken invariant upstream, not bad input.
pub struct InferenceEngine {
    artifact: Arc<ModelArtifact>,
}

impl InferenceEngine {
    pub fn new(artifact: Arc<ModelArtifact>) -> Self {
        Self { artifact }
    }

    pub fn score(&self, features: &[f32]) -> Result<Scored> {
        let raw = self.artifact.classifier.predict_probability(features)?;
        let probability = raw.clamp(0.0, 1.0);
        let threshold = self.artifact.threshold;

        Ok(Scored {
            probability,
            prediction: u8::from(probability >= threshold),
            threshold,
        })
    }
}

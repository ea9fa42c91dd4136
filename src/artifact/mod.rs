//! Frozen model bundle shared read-only by all request handlers

pub mod classifier;
pub mod loader;

pub use classifier::{Classifier, OnnxClassifier};
pub use loader::load_artifact;

use serde::Deserialize;

/// Per-column standard scaler parameters frozen at training time.
///
/// `mean` and `scale` are aligned with the artifact's `cols_to_scale` order.
#[derive(Debug, Clone, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    /// Transform one value using the parameters of the `column_index`-th
    /// scaled column.
    pub fn transform(&self, column_index: usize, value: f64) -> f64 {
        (value - self.mean[column_index]) / self.scale[column_index]
    }

    pub fn len(&self) -> usize {
        self.mean.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mean.is_empty()
    }
}

/// The immutable model bundle: classifier, scaler, decision threshold and
/// feature schema. Loaded exactly once at startup and never mutated, so it is
/// safe to share across concurrent requests without locking.
pub struct ModelArtifact {
    /// Opaque scoring function over the preprocessed vector
    pub classifier: Box<dyn Classifier>,
    /// Scaler applied to the `cols_to_scale` subset only
    pub scaler: StandardScaler,
    /// Probability cutoff for the positive (attrition) decision
    pub threshold: f64,
    /// Required input names; also defines the vector slot order
    pub features_order: Vec<String>,
    /// Subset of `features_order` the scaler applies to
    pub cols_to_scale: Vec<String>,
}

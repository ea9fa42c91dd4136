//! Error taxonomy for the prediction service.

use serde::Serialize;
use thiserror::Error;

/// Names every offending feature key in an unprocessable input.
///
/// Both lists preserve `features_order` order so callers get stable,
/// self-correctable output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationFailure {
    /// Required feature names absent from the input mapping.
    pub missing_features: Vec<String>,
    /// Feature names whose values are not finite real numbers.
    pub invalid_features: Vec<String>,
}

impl ValidationFailure {
    pub fn is_empty(&self) -> bool {
        self.missing_features.is_empty() && self.invalid_features.is_empty()
    }
}

/// Failure of a single prediction request.
#[derive(Debug, Error)]
pub enum PredictionError {
    /// Input rejected before any side effect took place. Surfaced to the
    /// caller as an unprocessable-input response.
    #[error("unprocessable input: {} missing, {} invalid", .0.missing_features.len(), .0.invalid_features.len())]
    Validation(ValidationFailure),

    /// The audit unit of work could not commit. Nothing partial is left
    /// visible; surfaced as an opaque internal failure.
    #[error("audit unit of work failed")]
    Infrastructure(#[source] anyhow::Error),

    /// Classifier or preprocessing invariant violation. The validator and
    /// preprocessor guarantee shape and finiteness, so this is never the
    /// caller's fault.
    #[error("inference failed")]
    Internal(#[source] anyhow::Error),
}

/// Fatal model bundle problems detected at startup. The service refuses to
/// accept requests in any of these states.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("artifact manifest {path} is unreadable")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("artifact manifest {path} is malformed")]
    Malformed {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("features_order is empty")]
    EmptyFeatureOrder,

    #[error("duplicate feature name in features_order: {0}")]
    DuplicateFeature(String),

    #[error("cols_to_scale entry '{0}' is not in features_order")]
    UnknownScaledColumn(String),

    #[error("scaler carries {scaler} parameter pairs but cols_to_scale lists {columns} columns")]
    ScalerShapeMismatch { scaler: usize, columns: usize },

    #[error("scaler scale for '{0}' is zero")]
    ZeroScale(String),

    #[error("threshold {0} is outside [0, 1]")]
    ThresholdOutOfRange(f64),

    #[error("classifier model could not be loaded")]
    Model(#[source] anyhow::Error),
}

//! Artifact manifest loading and integrity checks

use crate::artifact::{ModelArtifact, OnnxClassifier, StandardScaler};
use crate::error::ArtifactError;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::info;

/// On-disk form of the frozen bundle: a JSON manifest next to the ONNX
/// classifier file it references.
#[derive(Debug, Deserialize)]
struct ArtifactManifest {
    /// Classifier file path, relative to the manifest
    model: String,
    /// Scaler parameters aligned with `cols_to_scale` order
    scaler: StandardScaler,
    /// Decision threshold; the original training bundle called this "seuil"
    #[serde(alias = "seuil")]
    threshold: f64,
    features_order: Vec<String>,
    cols_to_scale: Vec<String>,
}

impl ArtifactManifest {
    /// Validate the shape contract before touching the model file.
    fn check(&self) -> Result<(), ArtifactError> {
        if self.features_order.is_empty() {
            return Err(ArtifactError::EmptyFeatureOrder);
        }

        let mut seen = HashSet::new();
        for name in &self.features_order {
            if !seen.insert(name.as_str()) {
                return Err(ArtifactError::DuplicateFeature(name.clone()));
            }
        }

        for col in &self.cols_to_scale {
            if !seen.contains(col.as_str()) {
                return Err(ArtifactError::UnknownScaledColumn(col.clone()));
            }
        }

        if self.scaler.len() != self.cols_to_scale.len()
            || self.scaler.scale.len() != self.cols_to_scale.len()
        {
            return Err(ArtifactError::ScalerShapeMismatch {
                scaler: self.scaler.len().max(self.scaler.scale.len()),
                columns: self.cols_to_scale.len(),
            });
        }

        for (col, scale) in self.cols_to_scale.iter().zip(&self.scaler.scale) {
            if *scale == 0.0 {
                return Err(ArtifactError::ZeroScale(col.clone()));
            }
        }

        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(ArtifactError::ThresholdOutOfRange(self.threshold));
        }

        Ok(())
    }
}

/// Load and verify the model artifact. Any failure here is fatal: the
/// service must not accept requests without a well-formed bundle.
pub fn load_artifact<P: AsRef<Path>>(
    manifest_path: P,
    onnx_threads: usize,
) -> Result<ModelArtifact, ArtifactError> {
    let manifest_path = manifest_path.as_ref();

    let raw = fs::read_to_string(manifest_path).map_err(|source| ArtifactError::Unreadable {
        path: manifest_path.display().to_string(),
        source,
    })?;

    let manifest: ArtifactManifest =
        serde_json::from_str(&raw).map_err(|source| ArtifactError::Malformed {
            path: manifest_path.display().to_string(),
            source,
        })?;

    manifest.check()?;

    let model_path = manifest_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(&manifest.model);

    let classifier = OnnxClassifier::load(&model_path, onnx_threads).map_err(ArtifactError::Model)?;

    info!(
        manifest = %manifest_path.display(),
        features = manifest.features_order.len(),
        scaled = manifest.cols_to_scale.len(),
        threshold = manifest.threshold,
        "Model artifact loaded"
    );

    Ok(ModelArtifact {
        classifier: Box::new(classifier),
        scaler: manifest.scaler,
        threshold: manifest.threshold,
        features_order: manifest.features_order,
        cols_to_scale: manifest.cols_to_scale,
    })
}

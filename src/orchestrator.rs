//! Per-request orchestration: validate, preprocess, score, audit, respond.

use crate::artifact::ModelArtifact;
use crate::audit::{AuditStore, PredictionRequestRecord, PredictionResultRecord};
use crate::error::PredictionError;
use crate::metrics::ServiceMetrics;
use crate::pipeline::{FeatureValidator, InferenceEngine, Preprocessor};
use crate::types::{MetadataResponse, PredictResponse};
use chrono::Utc;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};
use uuid::Uuid;

/// Composes the prediction pipeline for each incoming request.
///
/// Each call is a single synchronous pass; requests share only the
/// read-only artifact, so no locking is involved. A request terminates on
/// its first failure: validation failures reject with zero side effects,
/// everything downstream of a started audit write commits or rolls back as
/// one unit.
pub struct PredictionService {
    artifact: Arc<ModelArtifact>,
    validator: FeatureValidator,
    preprocessor: Preprocessor,
    engine: InferenceEngine,
    audit: Arc<dyn AuditStore>,
    metrics: Arc<ServiceMetrics>,
}

impl PredictionService {
    pub fn new(
        artifact: Arc<ModelArtifact>,
        audit: Arc<dyn AuditStore>,
        metrics: Arc<ServiceMetrics>,
    ) -> Self {
        Self {
            validator: FeatureValidator::new(artifact.clone()),
            preprocessor: Preprocessor::new(artifact.clone()),
            engine: InferenceEngine::new(artifact.clone()),
            artifact,
            audit,
            metrics,
        }
    }

    /// Handle one prediction request end to end.
    ///
    /// A success response is the durability receipt: both audit records are
    /// committed before the caller sees a result.
    pub async fn predict(
        &self,
        input: &Map<String, Value>,
    ) -> Result<PredictResponse, PredictionError> {
        let started = Instant::now();
        let request_id = Uuid::new_v4();
        let requested_at = Utc::now();

        let validated = self.validator.validate(input).map_err(|failure| {
            self.metrics.record_rejected();
            debug!(
                request_id = %request_id,
                missing = ?failure.missing_features,
                invalid = ?failure.invalid_features,
                "Request rejected by validation"
            );
            PredictionError::Validation(failure)
        })?;

        let vector = self.preprocessor.vectorize(&validated).map_err(|e| {
            self.metrics.record_failed();
            error!(request_id = %request_id, error = %e, "Preprocessing invariant violated");
            PredictionError::Internal(e)
        })?;

        let scored = self.engine.score(&vector).map_err(|e| {
            self.metrics.record_failed();
            error!(request_id = %request_id, error = %e, "Inference failed");
            PredictionError::Internal(e)
        })?;

        let request_record = PredictionRequestRecord {
            request_id,
            features: Value::Object(input.clone()),
            requested_at,
        };
        let result_record = PredictionResultRecord {
            request_id,
            probability: scored.probability,
            prediction: scored.prediction as i16,
            threshold: scored.threshold,
            predicted_at: Utc::now(),
        };

        self.audit
            .record(&request_record, &result_record)
            .await
            .map_err(|e| {
                self.metrics.record_failed();
                error!(request_id = %request_id, error = %e, "Audit unit of work failed");
                PredictionError::Infrastructure(e)
            })?;

        let latency = started.elapsed();
        self.metrics
            .record_prediction(latency, scored.probability, scored.prediction);
        info!(
            request_id = %request_id,
            probability = scored.probability,
            prediction = scored.prediction,
            latency_us = latency.as_micros(),
            "Prediction served"
        );

        Ok(PredictResponse {
            request_id: request_id.to_string(),
            probability: scored.probability,
            prediction: scored.prediction,
            threshold: scored.threshold,
        })
    }

    /// Read-only snapshot of the loaded artifact's shape contract, so
    /// callers can discover required input keys without hardcoding them.
    pub fn metadata(&self) -> MetadataResponse {
        MetadataResponse {
            features_order: self.artifact.features_order.clone(),
            cols_to_scale: self.artifact.cols_to_scale.clone(),
            threshold: self.artifact.threshold,
        }
    }
}

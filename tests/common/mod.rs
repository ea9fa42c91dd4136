//! Shared test doubles: stub classifiers and an in-memory audit store.
//!
//! Mirrors how the service is exercised in CI without a database: the
//! `AuditStore` seam gets an in-memory implementation and the classifier
//! seam gets fixed-probability stubs.

#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use hrpredict::artifact::{Classifier, ModelArtifact, StandardScaler};
use hrpredict::audit::{AuditStore, PredictionRequestRecord, PredictionResultRecord};
use hrpredict::metrics::ServiceMetrics;
use hrpredict::orchestrator::PredictionService;
use std::sync::{Arc, Mutex};

/// Always returns the same probability.
pub struct FixedClassifier(pub f64);

impl Classifier for FixedClassifier {
    fn predict_probability(&self, _features: &[f32]) -> Result<f64> {
        Ok(self.0)
    }
}

/// Returns a fixed probability and captures every input vector it sees.
pub struct SpyClassifier {
    pub probability: f64,
    pub captured: Arc<Mutex<Vec<Vec<f32>>>>,
}

impl Classifier for SpyClassifier {
    fn predict_probability(&self, features: &[f32]) -> Result<f64> {
        self.captured.lock().unwrap().push(features.to_vec());
        Ok(self.probability)
    }
}

/// Fails every call, simulating a classifier invariant violation.
pub struct FaultyClassifier;

impl Classifier for FaultyClassifier {
    fn predict_probability(&self, _features: &[f32]) -> Result<f64> {
        Err(anyhow::anyhow!("shape mismatch"))
    }
}

/// In-memory audit store recording both halves of the unit of work.
#[derive(Default)]
pub struct MemoryAuditStore {
    pub requests: Mutex<Vec<PredictionRequestRecord>>,
    pub results: Mutex<Vec<PredictionResultRecord>>,
}

impl MemoryAuditStore {
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn result_count(&self) -> usize {
        self.results.lock().unwrap().len()
    }

    /// Every result must reference an existing request.
    pub fn has_orphan_results(&self) -> bool {
        let requests = self.requests.lock().unwrap();
        let results = self.results.lock().unwrap();
        results
            .iter()
            .any(|r| !requests.iter().any(|q| q.request_id == r.request_id))
    }
}

#[async_trait]
impl AuditStore for MemoryAuditStore {
    async fn record(
        &self,
        request: &PredictionRequestRecord,
        result: &PredictionResultRecord,
    ) -> Result<()> {
        self.requests.lock().unwrap().push(request.clone());
        self.results.lock().unwrap().push(result.clone());
        Ok(())
    }
}

/// Audit store whose unit of work always fails to commit.
pub struct FailingAuditStore;

#[async_trait]
impl AuditStore for FailingAuditStore {
    async fn record(
        &self,
        _request: &PredictionRequestRecord,
        _result: &PredictionResultRecord,
    ) -> Result<()> {
        Err(anyhow::anyhow!("storage offline"))
    }
}

/// Two-feature artifact matching the reference scenario: order
/// [age, tenure], age scaled with mean 35 / scale 10, threshold 0.5.
pub fn test_artifact(classifier: Box<dyn Classifier>) -> Arc<ModelArtifact> {
    Arc::new(ModelArtifact {
        classifier,
        scaler: StandardScaler {
            mean: vec![35.0],
            scale: vec![10.0],
        },
        threshold: 0.5,
        features_order: vec!["age".to_string(), "tenure".to_string()],
        cols_to_scale: vec!["age".to_string()],
    })
}

pub fn test_service(
    classifier: Box<dyn Classifier>,
    audit: Arc<dyn AuditStore>,
) -> PredictionService {
    PredictionService::new(test_artifact(classifier), audit, Arc::new(ServiceMetrics::new()))
}

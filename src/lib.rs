//! HRPredict Service Library
//!
//! Serves a frozen attrition classifier over HTTP and records every
//! prediction request together with its outcome as an atomic
//! request/result record pair.

pub mod api;
pub mod artifact;
pub mod audit;
pub mod config;
pub mod error;
pub mod metrics;
pub mod orchestrator;
pub mod pipeline;
pub mod types;

pub use artifact::ModelArtifact;
pub use audit::{AuditStore, PgAuditStore};
pub use config::AppConfig;
pub use error::{ArtifactError, PredictionError};
pub use metrics::ServiceMetrics;
pub use orchestrator::PredictionService;

//! Durable audit trail: every prediction request and its outcome as one
//! atomic request/result record pair.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

/// Raw input as received, keyed by the generated request identifier.
#[derive(Debug, Clone)]
pub struct PredictionRequestRecord {
    pub request_id: Uuid,
    /// The untouched feature mapping, stored as a JSON document
    pub features: serde_json::Value,
    pub requested_at: DateTime<Utc>,
}

/// Computed outcome, 1:1 with its request record.
#[derive(Debug, Clone)]
pub struct PredictionResultRecord {
    pub request_id: Uuid,
    pub probability: f64,
    pub prediction: i16,
    /// Threshold captured at decision time, not re-read later
    pub threshold: f64,
    pub predicted_at: DateTime<Utc>,
}

/// Persists the record pair as a single unit of work.
///
/// Both writes commit together or neither is left visible - on every exit
/// path, including cancellation mid-flight. A failed unit of work is
/// reported upward, never silently dropped; traceability is the whole point
/// of this component.
#[async_trait]
pub trait AuditStore: Send + Sync {
    async fn record(
        &self,
        request: &PredictionRequestRecord,
        result: &PredictionResultRecord,
    ) -> Result<()>;
}

/// Postgres-backed audit store. The schema is owned by the external
/// bootstrap script (`db/schema.sql`); this store only inserts.
pub struct PgAuditStore {
    pool: PgPool,
}

impl PgAuditStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect to the audit database.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
            .context("Failed to connect to audit database")?;

        Ok(Self::new(pool))
    }
}

#[async_trait]
impl AuditStore for PgAuditStore {
    async fn record(
        &self,
        request: &PredictionRequestRecord,
        result: &PredictionResultRecord,
    ) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to open audit transaction")?;

        sqlx::query(
            "INSERT INTO prediction_requests (request_id, features, requested_at) \
             VALUES ($1, $2, $3)",
        )
        .bind(request.request_id)
        .bind(&request.features)
        .bind(request.requested_at)
        .execute(&mut *tx)
        .await
        .context("Failed to insert prediction request")?;

        sqlx::query(
            "INSERT INTO prediction_results (request_id, probability, prediction, threshold, predicted_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(result.request_id)
        .bind(result.probability)
        .bind(result.prediction)
        .bind(result.threshold)
        .bind(result.predicted_at)
        .execute(&mut *tx)
        .await
        .context("Failed to insert prediction result")?;

        tx.commit()
            .await
            .context("Failed to commit audit transaction")?;

        debug!(request_id = %request.request_id, "Audit record pair committed");

        Ok(())
    }
}

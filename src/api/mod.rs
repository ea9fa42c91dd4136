//! HTTP API surface

pub mod handlers;

pub use handlers::configure_routes;

use crate::orchestrator::PredictionService;
use std::sync::Arc;

/// Shared state for HTTP handlers. The orchestrator holds only read-only
/// shared pieces, so cloning the `Arc` per worker is all the setup needed.
pub struct AppState {
    pub service: Arc<PredictionService>,
}

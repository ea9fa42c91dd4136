//! Inbound request payloads

use serde::Deserialize;
use serde_json::{Map, Value};

/// Body of `POST /predict`.
///
/// Values stay untyped here on purpose: a null, string or otherwise
/// non-numeric entry must reach the validator and be named in the
/// rejection, not fail opaquely during deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct PredictRequest {
    /// Feature name to value mapping
    pub features: Map<String, Value>,
}

//! Outbound response payloads

use serde::{Deserialize, Serialize};

/// Successful prediction response.
///
/// The threshold is echoed back so the decision stays explainable even if
/// the live configuration changes later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    pub request_id: String,
    pub probability: f64,
    pub prediction: u8,
    pub threshold: f64,
}

/// Artifact shape contract served by `GET /metadata`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataResponse {
    pub features_order: Vec<String>,
    pub cols_to_scale: Vec<String>,
    pub threshold: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predict_response_round_trip() {
        let response = PredictResponse {
            request_id: "a-request-id".to_string(),
            probability: 0.7,
            prediction: 1,
            threshold: 0.5,
        };

        let json = serde_json::to_string(&response).unwrap();
        let back: PredictResponse = serde_json::from_str(&json).unwrap();

        assert_eq!(back.request_id, response.request_id);
        assert_eq!(back.probability, response.probability);
        assert_eq!(back.prediction, 1);
    }
}

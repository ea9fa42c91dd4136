//! HTTP request handlers

use crate::api::AppState;
use crate::error::PredictionError;
use crate::types::PredictRequest;
use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::error;

/// Configure all API routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/predict", web::post().to(predict))
        .route("/metadata", web::get().to(metadata))
        .route("/health", web::get().to(health));
}

/// Prediction handler.
///
/// 200 carries the durability receipt (both audit records committed);
/// 422 names every missing and invalid feature key; 500 is deliberately
/// opaque and never implies a partial result.
async fn predict(state: web::Data<AppState>, body: web::Json<PredictRequest>) -> HttpResponse {
    match state.service.predict(&body.features).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(PredictionError::Validation(failure)) => {
            HttpResponse::UnprocessableEntity().json(json!({ "detail": failure }))
        }
        Err(err) => {
            error!(error = %err, "Prediction request failed");
            HttpResponse::InternalServerError().json(json!({ "error": "internal server error" }))
        }
    }
}

/// Artifact shape contract, for form-building callers
async fn metadata(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.service.metadata())
}

/// Health check handler
async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

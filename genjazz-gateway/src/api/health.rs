//! Health check endpoint

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

/// Health check response, including the configured backend URLs
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub services: ServiceUrls,
}

#[derive(Debug, Serialize)]
pub struct ServiceUrls {
    pub chords: String,
    pub solo: String,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        services: ServiceUrls {
            chords: state.config.chords_service_url.clone(),
            solo: state.config.impro_service_url.clone(),
        },
    })
}

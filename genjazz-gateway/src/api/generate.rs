//! Orchestration endpoint

use std::sync::Arc;

use axum::{body::Bytes, extract::State, Json};
use serde_json::Value;
use tracing::{info, warn};

use crate::error::GatewayError;
use crate::pipeline::GenerateRequest;
use crate::AppState;

/// POST /api/generate-midi-random
///
/// Runs the chord → solo pipeline and returns the merged payload. A
/// metrics record is appended for every pipeline outcome; the append
/// runs as a detached task so a failing sink can never alter the client
/// response.
pub async fn generate_midi_random(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Value>, GatewayError> {
    let request = parse_request(&body)?;

    let (result, record) = state.orchestrator.run(request).await;

    let metrics = Arc::clone(&state.metrics);
    tokio::spawn(async move {
        if let Err(e) = metrics.append(&record).await {
            warn!("metrics append failed: {}", e);
        }
    });

    let response = result?;
    info!(
        time_ms_chords = response["time_ms_chords"].as_u64(),
        time_ms_improvisor = response["time_ms_improvisor"].as_u64(),
        "generated random MIDI"
    );

    Ok(Json(response))
}

/// Parse the request body explicitly rather than through an extractor:
/// an absent body falls back to the stage defaults, but a body that is
/// present and does not deserialize is rejected, never silently
/// replaced with defaults.
fn parse_request(body: &[u8]) -> Result<GenerateRequest, GatewayError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(GenerateRequest::default());
    }

    serde_json::from_slice(body).map_err(|e| GatewayError::InvalidRequest {
        reason: e.to_string(),
    })
}

//! Solo improvisation stage
//!
//! Sends the flattened progression to the solo service and extracts the
//! base64 MIDI payload from its response. The MIDI field name has varied
//! across service versions, so extraction tries a fixed priority list of
//! candidate names and only fails when none carries a value.

use serde::Serialize;
use serde_json::Value;

use crate::client::{join_url, BackendClient, CallOutcome};
use crate::error::GatewayError;
use crate::stages::StageFailure;

const SOLO_PATH: &str = "/api/generate-solo";

/// Defaults applied when the client supplies no style/tempo
const DEFAULT_STYLE: &str = "John Coltrane";
const DEFAULT_TEMPO: u32 = 160;

/// Accepted MIDI payload field names, tried in order; first non-empty wins
const MIDI_FIELDS: [&str; 3] = ["midiBase64", "midi_base64", "data"];

/// Request body for the solo service
#[derive(Debug, Clone, Serialize)]
pub struct SoloRequest {
    pub chords: String,
    pub style: String,
    pub tempo: u32,
}

impl SoloRequest {
    /// Build a request, applying the style/tempo defaults at this boundary.
    pub fn new(chords: &str, style: Option<String>, tempo: Option<u32>) -> Self {
        Self {
            chords: chords.to_string(),
            style: style.unwrap_or_else(|| DEFAULT_STYLE.to_string()),
            tempo: tempo.unwrap_or(DEFAULT_TEMPO),
        }
    }
}

/// Solo-stage output: the extracted MIDI payload plus call metrics
#[derive(Debug)]
pub struct SoloStageOutput {
    pub midi_base64: String,
    pub info: String,
    pub elapsed_ms: u64,
    pub size_bytes: usize,
}

/// Second pipeline stage: generate a solo over the flattened progression
pub struct SoloStage<'a> {
    client: &'a BackendClient,
    base_url: &'a str,
}

impl<'a> SoloStage<'a> {
    pub fn new(client: &'a BackendClient, base_url: &'a str) -> Self {
        Self { client, base_url }
    }

    /// Call the solo service and extract the MIDI payload.
    ///
    /// Musical validity of the chord string is the service's concern;
    /// only non-emptiness is checked here.
    pub async fn run(
        &self,
        chords: &str,
        style: Option<String>,
        tempo: Option<u32>,
    ) -> Result<SoloStageOutput, StageFailure> {
        if chords.is_empty() {
            return Err(StageFailure::before_call(GatewayError::Validation {
                reason: "empty chord progression".to_string(),
            }));
        }

        let request = SoloRequest::new(chords, style, tempo);
        let body = serde_json::to_value(&request).map_err(|e| {
            StageFailure::before_call(GatewayError::Validation {
                reason: format!("solo request could not be serialized: {}", e),
            })
        })?;

        let url = join_url(self.base_url, SOLO_PATH);
        let CallOutcome {
            payload,
            elapsed_ms,
            size_bytes,
        } = self.client.post_json("improvisor", &url, &body).await?;

        let midi_base64 = extract_midi(&payload).ok_or_else(|| {
            StageFailure::after_call(
                GatewayError::Validation {
                    reason: "no midi payload".to_string(),
                },
                elapsed_ms,
                size_bytes,
            )
        })?;

        let info = format!("{}|{}|{}", request.style, request.tempo, midi_base64.len());

        Ok(SoloStageOutput {
            midi_base64,
            info,
            elapsed_ms,
            size_bytes,
        })
    }
}

/// Try the candidate field names in priority order; the first present,
/// non-empty string value wins.
fn extract_midi(payload: &Value) -> Option<String> {
    MIDI_FIELDS.iter().find_map(|name| {
        payload
            .get(*name)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}

//! Chord progression stage
//!
//! Fetches a random progression from the chord service, validates that it
//! contains at least one section, and flattens the sections into the
//! single delimited string the solo service expects.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::client::{join_url, BackendClient, CallOutcome};
use crate::error::GatewayError;
use crate::stages::StageFailure;

/// Delimiter between sections in the flattened progression.
/// Structurally significant to the solo service's interpretation.
const SECTION_DELIMITER: &str = "|";

/// Fixed selectors: random key / random structure / random modulation.
/// Opaque to the gateway; the chord service interprets them.
const RANDOM_PROGRESSION_PATH: &str = "/api/generate/Random/Random/Random";

/// One section of a generated progression.
///
/// Unknown fields are preserved so backend schema additions pass through
/// the gateway untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub chords: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Chord service response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChordResult {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub structure: String,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChordResult {
    /// Flatten the sections' chord strings, preserving original order.
    pub fn flatten_chords(&self) -> String {
        self.sections
            .iter()
            .map(|s| s.chords.as_str())
            .collect::<Vec<_>>()
            .join(SECTION_DELIMITER)
    }

    /// Lossy diagnostic summary for the metrics log: `key|structure|sectionCount`.
    /// Full chord content is deliberately not logged.
    pub fn summary(&self) -> String {
        format!("{}|{}|{}", self.key, self.structure, self.sections.len())
    }
}

/// Validated chord-stage output consumed by the solo stage
#[derive(Debug)]
pub struct ChordStageOutput {
    pub result: ChordResult,
    pub flattened: String,
    pub info: String,
    pub elapsed_ms: u64,
    pub size_bytes: usize,
}

/// First pipeline stage: fetch and validate a random progression
pub struct ChordStage<'a> {
    client: &'a BackendClient,
    base_url: &'a str,
}

impl<'a> ChordStage<'a> {
    pub fn new(client: &'a BackendClient, base_url: &'a str) -> Self {
        Self { client, base_url }
    }

    /// Call the chord service and validate/flatten its response.
    ///
    /// Fails before the solo stage ever runs if the progression has no
    /// sections.
    pub async fn run(&self) -> Result<ChordStageOutput, StageFailure> {
        let url = join_url(self.base_url, RANDOM_PROGRESSION_PATH);
        let CallOutcome {
            payload,
            elapsed_ms,
            size_bytes,
        } = self.client.get_json("chords", &url).await?;

        let result = Self::parse(payload)
            .map_err(|cause| StageFailure::after_call(cause, elapsed_ms, size_bytes))?;

        let flattened = result.flatten_chords();
        let info = result.summary();

        Ok(ChordStageOutput {
            result,
            flattened,
            info,
            elapsed_ms,
            size_bytes,
        })
    }

    /// Parse the chord service payload and enforce the non-empty
    /// sections invariant.
    fn parse(payload: Value) -> Result<ChordResult, GatewayError> {
        let result: ChordResult =
            serde_json::from_value(payload).map_err(|e| GatewayError::Validation {
                reason: format!("chords response did not match expected shape: {}", e),
            })?;

        if result.sections.is_empty() {
            return Err(GatewayError::Validation {
                reason: "no sections".to_string(),
            });
        }

        Ok(result)
    }
}

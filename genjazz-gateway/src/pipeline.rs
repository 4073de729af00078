//! Request orchestration
//!
//! Drives the two-stage chord → solo sequence for one request:
//!
//! ```text
//! Start → ChordsInFlight → ChordsDone → SoloInFlight → SoloDone → Responded
//!                    \______________ Failed{stage, cause} ______________/
//! ```
//!
//! The solo stage consumes the chord stage's validated output, so the
//! ordering above is enforced structurally by the types rather than by
//! convention. A metrics record is produced for every outcome; on
//! failure it carries whatever timings and sizes were gathered before
//! the failing stage.

use std::fmt;

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::error;

use crate::client::BackendClient;
use crate::config::Config;
use crate::error::{GatewayError, Result};
use crate::metrics::MetricsRecord;
use crate::stages::{ChordStage, ChordStageOutput, SoloStage, SoloStageOutput, StageFailure};

/// Canonical MIDI field name in the merged client payload
const MIDI_RESPONSE_FIELD: &str = "midiBase64";

/// Client-supplied generation parameters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateRequest {
    pub style: Option<String>,
    pub tempo: Option<u32>,
}

/// Stage attribution for failure reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Chords,
    Improvisor,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Chords => write!(f, "chords"),
            Stage::Improvisor => write!(f, "improvisor"),
        }
    }
}

/// Sequences the two backend stages and assembles the client payload
pub struct Orchestrator {
    client: BackendClient,
    chords_base: String,
    impro_base: String,
}

impl Orchestrator {
    pub fn new(client: BackendClient, config: &Config) -> Self {
        Self {
            client,
            chords_base: config.chords_service_url.clone(),
            impro_base: config.impro_service_url.clone(),
        }
    }

    /// Run the pipeline for one request.
    ///
    /// Always returns a metrics record alongside the result, so the
    /// caller can append it regardless of outcome.
    pub async fn run(&self, request: GenerateRequest) -> (Result<Value>, MetricsRecord) {
        let mut record = MetricsRecord::now();

        let chords = match ChordStage::new(&self.client, &self.chords_base).run().await {
            Ok(output) => output,
            Err(failure) => return (Err(fail(Stage::Chords, failure, &mut record)), record),
        };
        record.time_ms_chords = chords.elapsed_ms;
        record.info_chords = chords.info.clone();
        record.size_bytes_chords = chords.size_bytes;

        let solo = match SoloStage::new(&self.client, &self.impro_base)
            .run(&chords.flattened, request.style, request.tempo)
            .await
        {
            Ok(output) => output,
            Err(failure) => return (Err(fail(Stage::Improvisor, failure, &mut record)), record),
        };
        record.time_ms_solo = solo.elapsed_ms;
        record.info_solo = solo.info.clone();
        record.size_bytes_solo = solo.size_bytes;

        let response = merge_response(chords, &solo);
        record.size_bytes_response = serde_json::to_vec(&response).map(|b| b.len()).unwrap_or(0);

        (Ok(response), record)
    }
}

/// Record a stage failure, keeping whatever timing/sizing the stage
/// gathered before it failed.
fn fail(stage: Stage, failure: StageFailure, record: &mut MetricsRecord) -> GatewayError {
    let StageFailure {
        cause,
        elapsed_ms,
        size_bytes,
    } = failure;

    error!(stage = %stage, "pipeline stage failed: {}", cause);

    let note = format!("failed: {}", cause);
    match stage {
        Stage::Chords => {
            record.time_ms_chords = elapsed_ms;
            record.size_bytes_chords = size_bytes;
            record.info_chords = note;
        }
        Stage::Improvisor => {
            record.time_ms_solo = elapsed_ms;
            record.size_bytes_solo = size_bytes;
            record.info_solo = note;
        }
    }

    cause
}

/// Merge the chord result, the canonical MIDI field and both stage
/// timings into the client payload. Every field the chord service
/// returned passes through, known or not.
fn merge_response(chords: ChordStageOutput, solo: &SoloStageOutput) -> Value {
    let mut merged = match serde_json::to_value(&chords.result) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    };

    merged.insert(
        MIDI_RESPONSE_FIELD.to_string(),
        Value::String(solo.midi_base64.clone()),
    );
    merged.insert("time_ms_chords".to_string(), Value::from(chords.elapsed_ms));
    merged.insert(
        "time_ms_improvisor".to_string(),
        Value::from(solo.elapsed_ms),
    );

    Value::Object(merged)
}

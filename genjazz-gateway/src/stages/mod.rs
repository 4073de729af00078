//! Pipeline stages
//!
//! Each stage wraps one backend call together with its validation and
//! transform logic. The solo stage's input is the chord stage's validated
//! output, so the call ordering is a data dependency enforced by the
//! types rather than a convention.

pub mod chords;
pub mod solo;

pub use chords::{ChordResult, ChordStage, ChordStageOutput, Section};
pub use solo::{SoloStage, SoloStageOutput};

use crate::client::CallFailure;
use crate::error::GatewayError;

/// A failed stage, keeping whatever call metrics were gathered before
/// the failure so the partial metrics record can carry them
#[derive(Debug)]
pub struct StageFailure {
    pub cause: GatewayError,
    pub elapsed_ms: u64,
    pub size_bytes: usize,
}

impl StageFailure {
    /// Failure before any backend call was issued.
    pub fn before_call(cause: GatewayError) -> Self {
        Self {
            cause,
            elapsed_ms: 0,
            size_bytes: 0,
        }
    }

    /// Failure after a settled call, keeping its timing and sizing.
    pub fn after_call(cause: GatewayError, elapsed_ms: u64, size_bytes: usize) -> Self {
        Self {
            cause,
            elapsed_ms,
            size_bytes,
        }
    }
}

impl From<CallFailure> for StageFailure {
    fn from(failure: CallFailure) -> Self {
        Self {
            cause: failure.error,
            elapsed_ms: failure.elapsed_ms,
            size_bytes: 0,
        }
    }
}

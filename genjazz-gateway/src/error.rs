//! Error types for the gateway
//!
//! Every failure a request can hit — unreachable backend, call timeout,
//! upstream error status, structurally invalid payload — is normalized
//! into [`GatewayError`] at the stage that detects it. The client always
//! sees the same shape: HTTP 500 with a stable `error` label and a
//! best-effort `details` string.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Stable top-level label carried by every failure response.
pub const ERROR_LABEL: &str = "Failed to generate random MIDI";

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Uniform failure shape for the orchestration pipeline
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Network/connection failure reaching a backend; never retried
    #[error("{service} service unreachable: {message}")]
    Unreachable {
        service: &'static str,
        message: String,
    },

    /// Backend exceeded the fixed per-call budget
    #[error("{service} service timed out")]
    Timeout { service: &'static str },

    /// Backend answered with a non-success HTTP status
    #[error("{service} service returned HTTP {status}")]
    UpstreamStatus {
        service: &'static str,
        status: u16,
        body: String,
    },

    /// Backend responded successfully but with a structurally invalid payload
    #[error("invalid upstream payload: {reason}")]
    Validation { reason: String },

    /// Client sent a body that does not deserialize as a generation request
    #[error("invalid request body: {reason}")]
    InvalidRequest { reason: String },
}

impl GatewayError {
    /// Best-effort diagnostic string for the `details` field.
    ///
    /// When the backend sent an error body, that body is surfaced verbatim;
    /// otherwise the error's own message is used.
    pub fn details(&self) -> String {
        match self {
            GatewayError::UpstreamStatus { body, .. } if !body.is_empty() => body.clone(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": ERROR_LABEL,
            "details": self.details(),
        }));

        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_body_wins_over_message() {
        let err = GatewayError::UpstreamStatus {
            service: "improvisor",
            status: 500,
            body: r#"{"error":"jar crashed"}"#.to_string(),
        };
        assert!(err.details().contains("jar crashed"));
    }

    #[test]
    fn test_empty_upstream_body_falls_back_to_message() {
        let err = GatewayError::UpstreamStatus {
            service: "improvisor",
            status: 502,
            body: String::new(),
        };
        assert!(err.details().contains("improvisor service returned HTTP 502"));
    }

    #[test]
    fn test_timeout_details_mention_timeout() {
        let err = GatewayError::Timeout { service: "chords" };
        assert!(err.details().contains("timed out"));
    }
}

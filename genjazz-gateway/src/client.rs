//! Backend HTTP client
//!
//! One `reqwest` client shared by both pipeline stages. Every call is
//! timed from issuance to settlement and sized from the serialized JSON
//! body actually handed downstream, so the orchestrator's metrics come
//! straight from the call boundary. Transport failures are normalized
//! into [`GatewayError`] here; this component itself never logs or
//! persists anything.

use std::time::{Duration, Instant};

use serde_json::Value;

use crate::error::{GatewayError, Result};

/// Fixed per-call budget for both backends
pub const CALL_TIMEOUT: Duration = Duration::from_secs(10);

/// Outcome of one successful backend call
#[derive(Debug)]
pub struct CallOutcome {
    /// Parsed JSON response body
    pub payload: Value,
    /// Wall-clock time from call issuance to settlement
    pub elapsed_ms: u64,
    /// Size of the serialized JSON body used downstream (not wire size)
    pub size_bytes: usize,
}

/// A failed backend call, keeping the wall-clock time it consumed so
/// partial metrics records can still carry it
#[derive(Debug)]
pub struct CallFailure {
    pub error: GatewayError,
    pub elapsed_ms: u64,
}

/// HTTP client for the generation backends
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
}

impl BackendClient {
    /// Create a client with the standard 10 second call budget.
    pub fn new() -> anyhow::Result<Self> {
        Self::with_timeout(CALL_TIMEOUT)
    }

    /// Create a client with an explicit call budget.
    pub fn with_timeout(timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }

    /// GET `url` and parse the JSON body.
    ///
    /// `service` is a logical backend name used only for error attribution.
    pub async fn get_json(
        &self,
        service: &'static str,
        url: &str,
    ) -> std::result::Result<CallOutcome, CallFailure> {
        self.request(service, self.http.get(url)).await
    }

    /// POST a JSON `body` to `url` and parse the JSON response.
    pub async fn post_json(
        &self,
        service: &'static str,
        url: &str,
        body: &Value,
    ) -> std::result::Result<CallOutcome, CallFailure> {
        self.request(service, self.http.post(url).json(body)).await
    }

    /// Issue the request and settle it, timing the full round trip.
    ///
    /// The clock starts immediately before the request is issued and stops
    /// immediately after settlement (full body received or failure), so
    /// callers can rely on the boundary being exact on both paths.
    async fn request(
        &self,
        service: &'static str,
        request: reqwest::RequestBuilder,
    ) -> std::result::Result<CallOutcome, CallFailure> {
        let started = Instant::now();
        let settled = Self::execute(service, request).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        let payload = settled.map_err(|error| CallFailure { error, elapsed_ms })?;
        let size_bytes = serde_json::to_vec(&payload).map(|b| b.len()).unwrap_or(0);

        Ok(CallOutcome {
            payload,
            elapsed_ms,
            size_bytes,
        })
    }

    async fn execute(service: &'static str, request: reqwest::RequestBuilder) -> Result<Value> {
        let response = request
            .send()
            .await
            .map_err(|e| classify_transport_error(service, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| classify_transport_error(service, e))?;

        if !status.is_success() {
            return Err(GatewayError::UpstreamStatus {
                service,
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| GatewayError::Validation {
            reason: format!("{} service returned non-JSON body: {}", service, e),
        })
    }
}

/// Map a reqwest transport failure onto the gateway taxonomy.
fn classify_transport_error(service: &'static str, err: reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        GatewayError::Timeout { service }
    } else {
        GatewayError::Unreachable {
            service,
            message: err.to_string(),
        }
    }
}

/// Join a backend base URL with an API path, tolerating trailing slashes.
pub fn join_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url_trims_trailing_slash() {
        assert_eq!(
            join_url("http://localhost:3002/", "/api/generate"),
            "http://localhost:3002/api/generate"
        );
    }

    #[test]
    fn test_join_url_plain_base() {
        assert_eq!(
            join_url("http://localhost:4000", "/api/generate-solo"),
            "http://localhost:4000/api/generate-solo"
        );
    }
}

//! genjazz-gateway library
//!
//! Request-orchestration gateway fronting the GenJazz chord-progression
//! and solo-improvisation services. One client request drives the
//! sequential chords → solo pipeline and returns the merged result.

use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod metrics;
pub mod pipeline;
pub mod stages;

use crate::config::Config;
use crate::metrics::MetricsLog;
use crate::pipeline::Orchestrator;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub orchestrator: Arc<Orchestrator>,
    pub metrics: Arc<MetricsLog>,
}

impl AppState {
    /// Create new application state
    pub fn new(config: Config, orchestrator: Orchestrator, metrics: MetricsLog) -> Self {
        Self {
            config: Arc::new(config),
            orchestrator: Arc::new(orchestrator),
            metrics: Arc::new(metrics),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    Router::new()
        .route("/api/generate-midi-random", post(api::generate_midi_random))
        .route("/health", get(api::health_check))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

//! genjazz-gateway - API gateway for random MIDI generation
//!
//! Fronts the chord-progression and solo-improvisation services: one
//! client request drives the sequential chords → solo pipeline, the
//! merged result goes back to the client, and a per-request metrics
//! record lands in the CSV log.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use genjazz_gateway::client::BackendClient;
use genjazz_gateway::config::Config;
use genjazz_gateway::metrics::MetricsLog;
use genjazz_gateway::pipeline::Orchestrator;
use genjazz_gateway::{build_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting GenJazz gateway v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::parse();
    info!("Chord service: {}", config.chords_service_url);
    info!("Improvisor service: {}", config.impro_service_url);

    let metrics = MetricsLog::open(&config.log_file)
        .await
        .with_context(|| format!("Failed to open metrics log {}", config.log_file.display()))?;
    info!("Metrics log: {}", metrics.path().display());

    let client = BackendClient::new().context("Failed to build HTTP client")?;
    let orchestrator = Orchestrator::new(client, &config);

    let port = config.port;
    let state = AppState::new(config, orchestrator, metrics);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("API gateway listening on port {}", port);

    axum::serve(listener, app).await?;

    Ok(())
}

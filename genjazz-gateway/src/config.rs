//! Gateway configuration
//!
//! All settings come from the environment (or matching command-line
//! flags). The configuration is resolved once at startup and passed
//! explicitly into the application state; request handlers never read
//! ambient environment variables.

use clap::Parser;
use std::path::PathBuf;

/// Environment-sourced gateway configuration
#[derive(Debug, Clone, Parser)]
#[command(name = "genjazz-gateway", about = "API gateway for GenJazz MIDI generation")]
pub struct Config {
    /// Listen port
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Base URL of the chord progression service
    #[arg(long, env = "CHORDS_SERVICE_URL")]
    pub chords_service_url: String,

    /// Base URL of the solo improvisation service
    #[arg(long, env = "IMPRO_SERVICE_URL")]
    pub impro_service_url: String,

    /// Path of the per-request metrics log
    #[arg(long, env = "GATEWAY_LOG_FILE", default_value = "gateway_requests_log.csv")]
    pub log_file: PathBuf,
}

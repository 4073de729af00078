//! HTTP API handlers for the gateway

pub mod generate;
pub mod health;

pub use generate::generate_midi_random;
pub use health::health_check;

// Engine
pub mod leveling;
pub mod tags;
pub mod template;

// Application layer
pub mod api;
pub mod server;

// Supporting modules
pub mod config;
pub mod error;
pub mod metrics;
pub mod telemetry;

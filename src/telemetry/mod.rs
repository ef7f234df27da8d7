//! Tracing subscriber setup.
//!
//! Log verbosity follows `RUST_LOG` (default `info`). With `logging.json`
//! enabled, each event is written as one JSON object per line.
//!
//! # Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `RUST_LOG` | Filter directives | `info` |
//! | `LOGGING__JSON` | JSON log output | `false` |

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Result type for telemetry operations
pub type TelemetryResult<T> = Result<T, TelemetryError>;

/// Telemetry-specific error type
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("Failed to install tracing subscriber: {0}")]
    SubscriberInit(String),
}

/// Install the global tracing subscriber.
///
/// Fails if a global subscriber was already installed.
pub fn init_telemetry(config: &LoggingConfig) -> TelemetryResult<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (plain_layer, json_layer) = if config.json {
        (None, Some(fmt::layer().json()))
    } else {
        (Some(fmt::layer()), None)
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(plain_layer)
        .with(json_layer)
        .try_init()
        .map_err(|e| TelemetryError::SubscriberInit(e.to_string()))?;

    tracing::info!(json = config.json, "Tracing initialized");
    Ok(())
}

//! Tracing setup for binaries and integration tests

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Telemetry setup errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The fallback filter directive did not parse
    #[error("invalid log filter '{value}': {source}")]
    Filter {
        /// The offending directive
        value: String,
        /// Parse failure from tracing-subscriber
        source: tracing_subscriber::filter::ParseError,
    },

    /// A global subscriber was already installed
    #[error("telemetry error: {0}")]
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins when set; `default_filter` is the fallback directive.
pub fn init(default_filter: &str) -> Result<(), TelemetryError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => {
            EnvFilter::try_new(default_filter).map_err(|source| TelemetryError::Filter {
                value: default_filter.to_string(),
                source,
            })?
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(TelemetryError::Subscriber)
}

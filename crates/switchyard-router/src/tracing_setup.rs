//! Subscriber initialisation for the binary.

use tracing_subscriber::EnvFilter;

use switchyard_core::config::ObservabilityConfig;
use switchyard_core::errors::{SwitchyardError, SwitchyardResult};

/// Environment variable that overrides the configured filter.
pub const LOG_ENV: &str = "SWITCHYARD_LOG";

/// Install the global subscriber. `SWITCHYARD_LOG` wins over
/// `observability.log_level`. Fails if a subscriber is already set.
pub fn init_tracing(config: &ObservabilityConfig) -> SwitchyardResult<()> {
    let filter = match EnvFilter::try_from_env(LOG_ENV) {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_level).map_err(|e| {
            SwitchyardError::ConfigError(format!("invalid log level '{}': {e}", config.log_level))
        })?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    let installed = if config.json_logs {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| SwitchyardError::ConfigError(format!("tracing already initialised: {e}")))
}

//! Tracing initialization and configuration.

pub mod spans;

use std::sync::Once;

use capguard_core::config::ObservabilityConfig;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding the filter directives.
pub const LOG_ENV_VAR: &str = "CAPGUARD_LOG";

static INIT: Once = Once::new();

/// Initialize human-readable logging.
///
/// Reads `CAPGUARD_LOG` for per-crate levels, e.g.
/// `CAPGUARD_LOG=capguard_compression=debug,capguard_registry=info`.
/// Falls back to `info` when unset or invalid. Idempotent.
pub fn init_tracing() {
    init_with_config(&ObservabilityConfig::default());
}

/// Initialize logging from configuration. `CAPGUARD_LOG` still wins over
/// `log_level` when set. Only the first call in a process has any effect.
pub fn init_with_config(config: &ObservabilityConfig) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
            .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
        install(filter, config.json);
    });
}

/// Whether a subscriber has been installed through this module.
pub fn is_initialized() -> bool {
    INIT.is_completed()
}

fn install(filter: EnvFilter, json: bool) {
    let registry = tracing_subscriber::registry().with(filter);
    let result = if json {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(true))
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .try_init()
    };
    // Another global subscriber (a test harness, an embedding host) keeps priority.
    if result.is_err() {
        tracing::debug!("global subscriber already set, keeping it");
    }
}

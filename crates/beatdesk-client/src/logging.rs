//! Structured logging initialization.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the logging system for an embedding application.
///
/// `RUST_LOG` wins over `level` when set. Returns false if a global
/// subscriber was already installed.
///
/// # Arguments
///
/// * `level` - Log level (trace, debug, info, warn, error)
/// * `json_format` - If true, output logs in JSON format
///
/// # Example
///
/// ```rust,no_run
/// use beatdesk_client::init_logging;
///
/// init_logging("info", false);
/// ```
pub fn init_logging(level: &str, json_format: bool) -> bool {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("beatdesk={level},reqwest=warn", level = level).into());

    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = if json_format {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false)
                    .with_target(true),
            )
            .try_init()
            .is_ok()
    } else {
        registry.with(fmt::layer().pretty()).try_init().is_ok()
    };

    if installed {
        tracing::info!(
            level = %level,
            format = if json_format { "json" } else { "pretty" },
            "Logging initialized"
        );
    }
    installed
}

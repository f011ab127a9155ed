//! Structured logging configuration.

use crate::config::Config;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Initializes logging from the configuration. `RUST_LOG` wins over `log_level`.
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init_logging(cfg: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));

    let installed = if cfg.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_span_events(FmtSpan::CLOSE))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_names(true)
                    .with_file(false)
                    .with_line_number(false),
            )
            .try_init()
    };

    if installed.is_ok() {
        tracing::info!(
            service = env!("CARGO_PKG_NAME"),
            level = %cfg.log_level,
            json = cfg.json_logs,
            "Logging initialized"
        );
    }
}

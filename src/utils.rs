//! Logging setup for the `vether-swap` binary.

use tracing_subscriber::{EnvFilter, fmt};

/// Filter used when `RUST_LOG` is unset: swap events at `info`, provider
/// transport chatter only from `warn`.
pub const DEFAULT_LOG_FILTER: &str = "info,ethers_providers=warn";

/// Install the `tracing` subscriber. `RUST_LOG` overrides [`DEFAULT_LOG_FILTER`].
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

// src/utils/logging.rs
use tracing_subscriber::{fmt, EnvFilter};

// HTTP internals are noisy at info during `fetch`.
const DEFAULT_FILTER: &str = "info,hyper=warn,reqwest=warn";

/// Installs the global tracing subscriber. `RUST_LOG` overrides the default
/// filter. Output goes to stderr so `process` can print event JSON on stdout.
pub fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Logging setup complete.");
}

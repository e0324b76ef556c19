//! Diagnostic tracing for the tee binary.
//!
//! Standard output carries the copied data, so every log line goes to
//! stderr.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
///
/// Reads `RUST_LOG` env var. Defaults to `warn` if unset, which still shows
/// transient read/write failures that were retried.
/// Output: stderr, compact format.
///
/// # Example
/// ```bash
/// RUST_LOG=tee=trace tee out.log < input.txt
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}

//! Diagnostics for roster loads, saves, and mutations.
//!
//! `io::roster_store` and `commands` emit `tracing` events (file paths,
//! student counts, consistency findings under the lenient policy). They go to
//! stderr so stdout stays reserved for command output.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the stderr subscriber, filtered by `RUST_LOG` (default `warn`).
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}

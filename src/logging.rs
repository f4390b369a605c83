//! Diagnostic logging for the layer build.
//!
//! Same stderr/compact subscriber as a plain `RUST_LOG` setup, with one
//! addition: when `RUST_LOG` is unset, `--verbose` raises the default level
//! from `warn` to `info` so step progress and installer output are shown.
//! Everything goes to stderr so `--json` stdout stays clean.
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter directive used when `RUST_LOG` is unset.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "info"
    } else {
        "warn"
    }
}

/// Install the global tracing subscriber.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}

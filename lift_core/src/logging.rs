//! Diagnostics for liftmap.
//!
//! Events go to stderr so `liftmap export` and `parse --json` can be piped.
//! Catalog problems surface at `warn`, load/save summaries at `info`, and the
//! rule and match chosen for every line at `debug`.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Quiet default: only catalog warnings and errors
pub fn init() {
    init_with_level("warn")
}

/// Install the stderr subscriber; `RUST_LOG` still wins over `default_level`.
///
/// `liftmap --verbose` passes `"debug"` to trace how each line was classified
/// and resolved.
pub fn init_with_level(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new("debug"))
        .try_init();
}

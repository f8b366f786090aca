//! Diagnostic logging for the CLI.
//!
//! Logs go to stderr so command output on stdout stays machine-readable.
//! `RUST_LOG` takes precedence over `--verbose`.

use std::io;

use tracing_subscriber::{filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn default_directive(verbose: bool) -> &'static str {
    if verbose { "glot_sync=debug" } else { "warn" }
}

/// Install the global subscriber. Calling it twice is a no-op.
pub fn init_tracing(verbose: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_target(false)
        .with_ansi(std::env::var_os("NO_COLOR").is_none())
        .with_writer(io::stderr);

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init();
}

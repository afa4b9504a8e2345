//! Diagnostic logging
//!
//! User-facing progress is printed directly; this only covers `tracing`
//! diagnostics, which go to stderr so stdout stays clean.

use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `--debug` forces debug output for this
/// crate; otherwise `RUST_LOG` is honoured, falling back to warnings only.
pub(crate) fn init(debug: bool) {
    let filter = if debug {
        EnvFilter::new("keyswitch=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

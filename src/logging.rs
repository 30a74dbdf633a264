// src/logging.rs
// =============================================================================
// Sets up logging for the CLI.
//
// Logs go to stderr so they never mix with the pages we print on stdout.
// RUST_LOG works as usual (e.g. RUST_LOG=sitefetch=debug); without it we
// show info and above from this crate. --silent turns everything off.
// =============================================================================

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "sitefetch=info";

pub fn init(silent: bool) {
    let filter = if silent {
        EnvFilter::new("off")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

//! Log output setup shared by the binaries
//!
//! Logs go to stderr so stdout stays free for rewritten files.

use std::io::IsTerminal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Filter used when RUST_LOG is unset
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "info,gomodtools=debug,modclean=debug,modup=debug,sortimports=debug"
    } else {
        "info"
    }
}

/// Install the global subscriber; RUST_LOG overrides the verbosity flag
pub fn init(verbose: bool) {
    let filter = EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| default_directive(verbose).into()),
    );

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal())
                .with_target(false)
                .without_time(),
        )
        .try_init();
}

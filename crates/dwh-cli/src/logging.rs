//! Log output for the binaries

use tracing_subscriber::EnvFilter;

/// Install the global subscriber; library `log` records are bridged into it.
///
/// `RUST_LOG` wins over `--verbose` when set.
pub fn init(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // A second init (tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

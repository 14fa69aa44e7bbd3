//! Logging initialization.
//!
//! Progress goes to stderr through `tracing`; command reports go to stdout
//! through [`crate::output::Output`].

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter for a verbosity count: our crates at the chosen level,
/// everything else at `warn`.
pub fn default_directives(verbose: u8) -> String {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    format!("warn,bridgeadm={level},bridgeadm_match={level}")
}

/// Install the global subscriber. `RUST_LOG` overrides the verbosity flags.
pub fn init(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

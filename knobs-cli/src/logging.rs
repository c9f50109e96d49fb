use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

/// Install the stderr subscriber
///
/// Prompts share stderr with the log, so the default level is `warn`.
pub fn configure_logging(verbose: bool, debug: bool, quiet: bool) {
    let log_level = if quiet {
        Level::ERROR
    } else if debug {
        Level::DEBUG
    } else if verbose {
        Level::TRACE
    } else {
        Level::WARN
    };

    registry()
        .with(EnvFilter::new(log_level.to_string()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

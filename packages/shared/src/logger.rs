//! Logging setup utilities for the Kaiwa chat client.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// This function sets up logging for both the client library crate and the binary.
/// The log level can be overridden using the `RUST_LOG` environment variable.
///
/// Log lines go to stderr so that they do not interleave with chat output on stdout.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "kaiwa")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use kaiwa_shared::logger::setup_logger;
///
/// setup_logger("kaiwa", "info");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Build the default `EnvFilter` directive for the client library and the binary.
fn default_filter(binary_name: &str, default_log_level: &str) -> String {
    format!(
        "kaiwa_client={},kaiwa_shared={},{}={}",
        default_log_level,
        default_log_level,
        binary_name.replace('-', "_"),
        default_log_level
    )
}

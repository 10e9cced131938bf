//! Logging utilities
//!
//! The engine logs through the `log` facade. Binaries pick the backend; these
//! helpers install `env_logger` with an `info` default that `RUST_LOG`
//! overrides.

pub use log::{debug, info, warn, error, trace};

/// Filter used when neither `RUST_LOG` nor an explicit filter is given
pub const DEFAULT_FILTER: &str = "info";

/// Initialize logging from `RUST_LOG`, falling back to [`DEFAULT_FILTER`]
///
/// Calling this more than once keeps the first logger.
pub fn init() {
    install(env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(DEFAULT_FILTER),
    ));
}

/// Initialize logging with an explicit filter such as `"debug"` or
/// `"zee_engine=trace"`, ignoring `RUST_LOG`
pub fn init_with_filter(filter: &str) {
    let mut builder = env_logger::Builder::new();
    builder.parse_filters(filter);
    install(builder);
}

fn install(mut builder: env_logger::Builder) {
    builder.format_timestamp_millis();

    if builder.try_init().is_err() {
        log::debug!("Logger already initialized");
    }
}

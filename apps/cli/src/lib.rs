//! ProjectHub command-line front end
//!
//! Drives the aggregate store against a file-backed key-value store. The
//! session is the one stored by `login`/`signup`; the selected project is
//! passed per invocation with `--project`.

pub mod cli;
pub mod commands;
pub mod config;

/// Initialize tracing with the given log level.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

//! Logging setup
//!
//! Events go to stderr so they never interleave with result tables on
//! stdout. Filter priority: explicit filter > `MAXIM_LOG` > `RUST_LOG` >
//! build-dependent default.

use tracing_subscriber::EnvFilter;

/// Initialize the global subscriber. Call once, before connecting.
pub fn init_logging(filter: Option<&str>) {
    tracing_subscriber::fmt()
        .with_env_filter(build_env_filter(filter))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Build the environment filter from an explicit directive or the environment.
fn build_env_filter(custom_filter: Option<&str>) -> EnvFilter {
    if let Some(filter) = custom_filter {
        return EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(default_log_filter()));
    }

    EnvFilter::try_from_env("MAXIM_LOG")
        .or_else(|_| EnvFilter::try_from_env("RUST_LOG"))
        .unwrap_or_else(|_| EnvFilter::new(default_log_filter()))
}

/// Get the default log filter based on build type.
pub fn default_log_filter() -> &'static str {
    #[cfg(debug_assertions)]
    {
        "maxim=debug,tokio_postgres=warn"
    }
    #[cfg(not(debug_assertions))]
    {
        "maxim=info,tokio_postgres=warn"
    }
}

//! Logging setup and configuration
//!
//! Log output goes to stderr. Stdout is reserved for the single status line
//! the resetter prints, so scripts can capture it without filtering.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Accepted log level names, most to least verbose
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Setup tracing subscriber for the application
///
/// `RUST_LOG` takes precedence over `default_level` when set.
pub fn setup_logging(default_level: &str) -> crate::Result<()> {
    let filter = build_filter(default_level)?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .map_err(|e| crate::Error::Logging(e.to_string()))?;

    Ok(())
}

fn build_filter(default_level: &str) -> crate::Result<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| crate::Error::Config(format!("Invalid log filter: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_accepts_known_levels() {
        for level in LOG_LEVELS {
            assert!(build_filter(level).is_ok(), "level {} rejected", level);
        }
    }

    #[test]
    fn test_build_filter_accepts_directives() {
        assert!(build_filter("resetter=debug,warn").is_ok());
    }
}

//! Logging setup
//!
//! Installs a `tracing` subscriber from [`LoggingConfig`]: an `EnvFilter` taken from
//! `RUST_LOG` when set (otherwise the configured level), pretty or JSON output, to
//! stderr or an append-only log file.

use crate::config::LoggingConfig;
use crate::error::{TabulaError, TabulaResult};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Install the global subscriber
///
/// Fails if a subscriber is already installed or the configuration is invalid.
pub fn init(config: &LoggingConfig) -> TabulaResult<()> {
    let filter = build_filter(config)?;
    let layer = build_layer(config)?;

    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .try_init()
        .map_err(|e| TabulaError::Logging(e.to_string()))
}

fn build_filter(config: &LoggingConfig) -> TabulaResult<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.level)
            .map_err(|e| TabulaError::Logging(format!("invalid level '{}': {}", config.level, e))),
    }
}

fn build_layer(config: &LoggingConfig) -> TabulaResult<BoxedLayer> {
    let json = match config.format.to_lowercase().as_str() {
        "json" => true,
        "pretty" => false,
        other => {
            return Err(TabulaError::Logging(format!(
                "unknown log format '{}'",
                other
            )))
        }
    };

    let layer = match &config.file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let writer = Mutex::new(file);
            if json {
                fmt::layer().json().with_writer(writer).boxed()
            } else {
                fmt::layer().with_ansi(false).with_writer(writer).boxed()
            }
        }
        None if json => fmt::layer().json().with_writer(std::io::stderr).boxed(),
        None => fmt::layer().with_writer(std::io::stderr).boxed(),
    };

    Ok(layer)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(level: &str, format: &str) -> LoggingConfig {
        LoggingConfig {
            level: level.to_string(),
            format: format.to_string(),
            file: None,
        }
    }

    #[test]
    fn test_formats() {
        assert!(build_layer(&config("info", "pretty")).is_ok());
        assert!(build_layer(&config("info", "JSON")).is_ok());
        assert!(matches!(
            build_layer(&config("info", "xml")),
            Err(TabulaError::Logging(_))
        ));
    }

    #[test]
    fn test_file_output_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tabula.log");

        let mut cfg = config("debug", "json");
        cfg.file = Some(path.to_string_lossy().to_string());

        assert!(build_layer(&cfg).is_ok());
        assert!(path.exists());
    }

    #[test]
    fn test_unwritable_file_is_io_error() {
        let mut cfg = config("info", "pretty");
        cfg.file = Some("/nonexistent/dir/tabula.log".to_string());

        assert!(matches!(build_layer(&cfg), Err(TabulaError::Io(_))));
    }

    #[test]
    fn test_level_directives() {
        assert!(EnvFilter::try_new("tabula=debug,warn").is_ok());
        assert!(EnvFilter::try_new(&config("info", "pretty").level).is_ok());
    }
}

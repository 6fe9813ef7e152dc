//! Structured logging infrastructure for Birdcount

use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Configuration for the logging system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "birdcount_pipeline=trace")
    pub level: String,
    /// Whether to emit one JSON object per event
    pub json_format: bool,
    /// Whether to enable pretty formatting with colors
    pub pretty_format: bool,
    /// Optional file path for log output
    pub file_path: Option<String>,
    /// Whether to include span open/close events in the output
    pub include_spans: bool,
    /// Whether to include target module information
    pub include_targets: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            pretty_format: false,
            file_path: None,
            include_spans: false,
            include_targets: true,
        }
    }
}

impl LoggingConfig {
    /// Builds the filter, letting `RUST_LOG` win over the configured level
    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.level))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    }

    fn span_events(&self) -> FmtSpan {
        if self.include_spans {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }
}

/// Initialize the tracing subscriber with the given configuration
pub fn init_logging(config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let registry = tracing_subscriber::registry().with(config.env_filter());

    // Log output goes to stderr so that `--json` output on stdout stays clean.
    match (&config.file_path, config.json_format) {
        (Some(path), json) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            let layer = fmt::layer()
                .with_ansi(false)
                .with_span_events(config.span_events())
                .with_target(config.include_targets)
                .with_writer(Mutex::new(file));
            if json {
                registry.with(layer.json()).try_init()?;
            } else {
                registry.with(layer).try_init()?;
            }
        }
        (None, true) => {
            let layer = fmt::layer()
                .json()
                .with_span_events(config.span_events())
                .with_target(config.include_targets)
                .with_writer(std::io::stderr);
            registry.with(layer).try_init()?;
        }
        (None, false) if config.pretty_format => {
            let layer = fmt::layer()
                .pretty()
                .with_span_events(config.span_events())
                .with_target(config.include_targets)
                .with_writer(std::io::stderr);
            registry.with(layer).try_init()?;
        }
        (None, false) => {
            let layer = fmt::layer()
                .with_span_events(config.span_events())
                .with_target(config.include_targets)
                .with_writer(std::io::stderr);
            registry.with(layer).try_init()?;
        }
    }

    tracing::debug!(level = %config.level, "Logging initialized");
    Ok(())
}

/// Scoped stderr subscriber for the work done before [`init_logging`] can
/// run, such as loading the configuration that holds the logging settings.
///
/// `RUST_LOG` wins over `level`, as it does for the global subscriber.
pub fn bootstrap_subscriber(level: &str) -> impl tracing::Subscriber + Send + Sync {
    let config = LoggingConfig {
        level: level.to_string(),
        ..LoggingConfig::default()
    };
    tracing_subscriber::fmt()
        .with_env_filter(config.env_filter())
        .with_target(config.include_targets)
        .with_writer(std::io::stderr)
        .finish()
}

/// Initialize logging with default configuration
pub fn init_default_logging() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    init_logging(&LoggingConfig::default())
}

/// Initialize logging for development (pretty, debug level, spans)
pub fn init_dev_logging() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    init_logging(&LoggingConfig {
        level: "debug".to_string(),
        pretty_format: true,
        include_spans: true,
        ..LoggingConfig::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert!(!config.json_format);
        assert!(!config.pretty_format);
        assert!(config.file_path.is_none());
        assert!(!config.include_spans);
        assert!(config.include_targets);
    }

    #[test]
    fn test_span_events_follow_flag() {
        let mut config = LoggingConfig::default();
        assert_eq!(config.span_events(), FmtSpan::NONE);
        config.include_spans = true;
        assert_eq!(config.span_events(), FmtSpan::NEW | FmtSpan::CLOSE);
    }

    #[test]
    fn test_bootstrap_subscriber_honours_level() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let debug_enabled = tracing::subscriber::with_default(bootstrap_subscriber("debug"), || {
            tracing::enabled!(tracing::Level::DEBUG)
        });
        let info_enabled = tracing::subscriber::with_default(bootstrap_subscriber("warn"), || {
            tracing::enabled!(tracing::Level::INFO)
        });
        assert!(debug_enabled);
        assert!(!info_enabled);
    }

    #[test]
    fn test_partial_config_deserializes_with_defaults() {
        let config: LoggingConfig = serde_json::from_str(r#"{"level": "debug"}"#).unwrap();
        assert_eq!(config.level, "debug");
        assert!(config.include_targets);
    }
}

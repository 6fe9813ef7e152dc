//! Configuration loading utilities

use crate::schema::Config;
use birdcount_common::{BirdcountError, Result as BirdcountResult};
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Environment variable naming an explicit configuration file
pub const CONFIG_PATH_ENV: &str = "BIRDCOUNT_CONFIG_PATH";

/// Configuration file picked up from the working directory
pub const DEFAULT_CONFIG_FILE: &str = "birdcount.toml";

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML parsing error
    #[error("Failed to parse TOML configuration: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration validation failed: {0}")]
    ValidationError(#[source] BirdcountError),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {source}")]
    EnvParseError {
        var: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl From<ConfigError> for BirdcountError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::ValidationError(inner) => inner,
            other => Self::config_with_source(other.to_string(), other),
        }
    }
}

/// Configuration loader for the application
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a TOML file with environment variable overrides
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::IoError {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::parse(&content)?;
        debug!(path = %path.display(), "Parsed configuration file");

        Self::apply_env_overrides(&mut config)?;
        config.validate().map_err(ConfigError::ValidationError)?;

        Ok(config)
    }

    /// Parse configuration text without overrides or validation
    pub fn parse(content: &str) -> Result<Config, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from the first source that exists
    ///
    /// Lookup order: `explicit`, then `BIRDCOUNT_CONFIG_PATH`, then
    /// `birdcount.toml` in the working directory, then built-in defaults.
    pub fn load(explicit: Option<&Path>) -> BirdcountResult<Config> {
        let config = if let Some(path) = explicit {
            Self::load_config(path)?
        } else if let Ok(config_path) = env::var(CONFIG_PATH_ENV) {
            Self::load_config(&config_path)?
        } else if Path::new(DEFAULT_CONFIG_FILE).exists() {
            Self::load_config(DEFAULT_CONFIG_FILE)?
        } else {
            info!("No configuration file found, using defaults");
            let mut config = Config::default();
            Self::apply_env_overrides(&mut config)?;
            config.validate()?;
            config
        };

        Ok(config)
    }

    /// Apply process environment overrides to configuration
    pub fn apply_env_overrides(config: &mut Config) -> Result<(), ConfigError> {
        Self::apply_overrides_from(config, |key| env::var(key).ok())
    }

    /// Apply overrides read through `lookup`, one `BIRDCOUNT_*` key per setting
    pub fn apply_overrides_from<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("BIRDCOUNT_DATA_PATH") {
            config.input.data_path = PathBuf::from(path);
        }

        if let Some(tz) = lookup("BIRDCOUNT_TZ") {
            config.input.tz_local = tz;
        }

        if let Some(minutes) = lookup("BIRDCOUNT_MAX_GAP_MINUTES") {
            config.correction.max_gap_minutes = parse_var("BIRDCOUNT_MAX_GAP_MINUTES", &minutes)?;
        }

        if let Some(step) = lookup("BIRDCOUNT_MAX_STEP") {
            config.correction.max_step = parse_var("BIRDCOUNT_MAX_STEP", &step)?;
        }

        if let Some(variant) = lookup("BIRDCOUNT_VARIANT") {
            config.correction.variant = parse_var("BIRDCOUNT_VARIANT", &variant)?;
        }

        if let Some(granularity) = lookup("BIRDCOUNT_GRANULARITY") {
            config.view.granularity = parse_var("BIRDCOUNT_GRANULARITY", &granularity)?;
        }

        if let Some(days) = lookup("BIRDCOUNT_DAY_SPAN") {
            config.view.day_span = parse_var("BIRDCOUNT_DAY_SPAN", &days)?;
        }

        if let Some(output) = lookup("BIRDCOUNT_OUTPUT") {
            config.chart.output_path = PathBuf::from(output);
        }

        if let Some(level) = lookup("BIRDCOUNT_LOG_LEVEL") {
            config.logging.level = level;
        }

        Ok(())
    }
}

fn parse_var<T>(var: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value.trim().parse().map_err(|e| ConfigError::EnvParseError {
        var: var.to_string(),
        source: Box::new(e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PipelineVariant;
    use birdcount_common::Granularity;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_overrides_replace_values() {
        let mut config = Config::default();
        let lookup = lookup_from(&[
            ("BIRDCOUNT_TZ", "UTC"),
            ("BIRDCOUNT_MAX_STEP", "12"),
            ("BIRDCOUNT_MAX_GAP_MINUTES", "5.5"),
            ("BIRDCOUNT_VARIANT", "full"),
            ("BIRDCOUNT_GRANULARITY", "w"),
            ("BIRDCOUNT_DAY_SPAN", "21"),
        ]);

        ConfigLoader::apply_overrides_from(&mut config, lookup).unwrap();

        assert_eq!(config.input.tz_local, "UTC");
        assert_eq!(config.correction.max_step, 12);
        assert!((config.correction.max_gap_minutes - 5.5).abs() < f64::EPSILON);
        assert_eq!(config.correction.variant, PipelineVariant::Full);
        assert_eq!(config.view.granularity, Granularity::Week);
        assert_eq!(config.view.day_span, 21);
    }

    #[test]
    fn test_unparsable_override_names_variable() {
        let mut config = Config::default();
        let err = ConfigLoader::apply_overrides_from(
            &mut config,
            lookup_from(&[("BIRDCOUNT_MAX_STEP", "eight")]),
        )
        .unwrap_err();

        assert!(matches!(err, ConfigError::EnvParseError { ref var, .. } if var == "BIRDCOUNT_MAX_STEP"));
    }

    #[test]
    fn test_no_overrides_keeps_defaults() {
        let mut config = Config::default();
        ConfigLoader::apply_overrides_from(&mut config, |_| None).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_validation_error_converts_unwrapped() {
        let inner = BirdcountError::validation_field("bad", "day_span");
        let converted: BirdcountError = ConfigError::ValidationError(inner).into();
        assert_eq!(converted.field(), Some("day_span"));
    }
}

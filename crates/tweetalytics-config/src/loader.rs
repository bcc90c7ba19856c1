//! Configuration loading from YAML or TOML files with environment overrides.

use crate::schema::Config;
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use tweetalytics_common::{LogFormat, Result as TweetalyticsResult, TweetalyticsError};

/// Environment variable naming an explicit configuration file.
pub const CONFIG_PATH_ENV: &str = "TWEETALYTICS_CONFIG_PATH";

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file {path}: {source}")]
    Io {
        /// File that could not be read
        path: PathBuf,
        /// Underlying cause
        #[source]
        source: std::io::Error,
    },

    /// YAML parsing error
    #[error("Failed to parse YAML configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("Failed to parse TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// Unrecognized file extension
    #[error("Unsupported configuration format: {0}")]
    UnsupportedFormat(String),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {message}")]
    EnvParse {
        /// Variable name
        var: String,
        /// Parse failure description
        message: String,
    },
}

impl From<ConfigError> for TweetalyticsError {
    fn from(err: ConfigError) -> Self {
        TweetalyticsError::config_with_source("Configuration loading failed", err)
    }
}

/// Configuration loader for the application
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads a configuration file, applies process environment overrides and
    /// validates the result.
    pub fn load_from_file(path: impl AsRef<Path>) -> TweetalyticsResult<Config> {
        let mut config = Self::parse_file(path.as_ref())?;
        Self::apply_env_overrides(&mut config, |var| env::var(var).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Loads from an explicit path, then `TWEETALYTICS_CONFIG_PATH`, then
    /// `tweetalytics.yaml`/`.yml`/`.toml` in the working directory, falling
    /// back to defaults. Environment overrides apply in every case.
    pub fn load(explicit: Option<&Path>) -> TweetalyticsResult<Config> {
        let candidate = explicit
            .map(Path::to_path_buf)
            .or_else(|| env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from))
            .or_else(|| {
                ["tweetalytics.yaml", "tweetalytics.yml", "tweetalytics.toml"]
                    .into_iter()
                    .map(PathBuf::from)
                    .find(|p| p.exists())
            });

        match candidate {
            Some(path) => {
                info!(path = %path.display(), "Loading configuration");
                Self::load_from_file(path)
            }
            None => {
                info!("No configuration file found, using defaults");
                let mut config = Config::default();
                Self::apply_env_overrides(&mut config, |var| env::var(var).ok())?;
                config.validate()?;
                Ok(config)
            }
        }
    }

    /// Parses a file without applying overrides or validation.
    pub fn parse_file(path: &Path) -> Result<Config, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Ok(serde_yaml::from_str(&content)?),
            Some("toml") => Ok(toml::from_str(&content)?),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }

    /// Applies `TWEETALYTICS_*` overrides using the given variable lookup.
    pub fn apply_env_overrides<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        fn parsed<T: std::str::FromStr>(var: &str, raw: &str) -> Result<T, ConfigError>
        where
            T::Err: std::fmt::Display,
        {
            raw.trim().parse().map_err(|e: T::Err| ConfigError::EnvParse {
                var: var.to_string(),
                message: e.to_string(),
            })
        }

        if let Some(url) = lookup("TWEETALYTICS_PROVIDER_URL") {
            config.provider.base_url = url;
        }
        if let Some(raw) = lookup("TWEETALYTICS_PROVIDER_TIMEOUT") {
            config.provider.timeout_secs = parsed("TWEETALYTICS_PROVIDER_TIMEOUT", &raw)?;
        }
        if let Some(raw) = lookup("TWEETALYTICS_PROVIDER_RATE_LIMIT") {
            config.provider.rate_limit_per_sec = parsed("TWEETALYTICS_PROVIDER_RATE_LIMIT", &raw)?;
        }
        if let Some(raw) = lookup("TWEETALYTICS_MAX_LIMIT") {
            config.ranking.max_limit = parsed("TWEETALYTICS_MAX_LIMIT", &raw)?;
        }
        if let Some(raw) = lookup("TWEETALYTICS_MAX_PIXELS") {
            config.charts.max_pixels = parsed("TWEETALYTICS_MAX_PIXELS", &raw)?;
        }
        if let Some(url) = lookup("TWEETALYTICS_CHART_URL") {
            config.charts.service_url = url;
        }
        if let Some(raw) = lookup("TWEETALYTICS_SHORTENER_ENABLED") {
            config.shortener.enabled = parsed("TWEETALYTICS_SHORTENER_ENABLED", &raw)?;
        }
        if let Some(login) = lookup("TWEETALYTICS_BITLY_LOGIN") {
            config.shortener.login = login;
        }
        if let Some(key) = lookup("TWEETALYTICS_BITLY_API_KEY") {
            debug!("Shortener API key taken from environment");
            config.shortener.api_key = key;
        }
        if let Some(level) = lookup("TWEETALYTICS_LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Some(raw) = lookup("TWEETALYTICS_LOG_FORMAT") {
            config.logging.format = match raw.trim() {
                "pretty" => LogFormat::Pretty,
                "compact" => LogFormat::Compact,
                "json" => LogFormat::Json,
                other => {
                    return Err(ConfigError::EnvParse {
                        var: "TWEETALYTICS_LOG_FORMAT".to_string(),
                        message: format!("unknown format {other:?}"),
                    })
                }
            };
        }

        Ok(())
    }
}

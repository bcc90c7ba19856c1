//! Runtime validation of a loaded configuration.

use crate::schema::Config;
use tweetalytics_common::{CanvasSize, Result, TweetalyticsError};
use url::Url;

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates a configuration, reporting the first problem found.
    pub fn validate(config: &Config) -> Result<()> {
        Self::validate_url(&config.provider.base_url, "provider.base_url")?;
        if config.provider.rate_limit_per_sec == 0 {
            return Err(TweetalyticsError::config(
                "provider.rate_limit_per_sec must be greater than 0",
            ));
        }
        if config.provider.timeout_secs == 0 {
            return Err(TweetalyticsError::config(
                "provider.timeout_secs must be greater than 0",
            ));
        }

        let ranking = &config.ranking;
        if ranking.max_limit == 0 {
            return Err(TweetalyticsError::config(
                "ranking.max_limit must be at least 1",
            ));
        }
        if !(1..=ranking.max_limit).contains(&ranking.default_limit) {
            return Err(TweetalyticsError::config(format!(
                "ranking.default_limit must be between 1 and {}",
                ranking.max_limit
            )));
        }

        let timeline = &config.timeline;
        if timeline.max_days == 0 || timeline.max_pages == 0 {
            return Err(TweetalyticsError::config(
                "timeline.max_days and timeline.max_pages must be at least 1",
            ));
        }
        if !(1..=timeline.max_days).contains(&timeline.default_days) {
            return Err(TweetalyticsError::config(format!(
                "timeline.default_days must be between 1 and {}",
                timeline.max_days
            )));
        }

        let charts = &config.charts;
        Self::validate_url(&charts.service_url, "charts.service_url")?;
        for (name, spec) in [
            ("charts.user_chart_size", &charts.user_chart_size),
            ("charts.activity_chart_size", &charts.activity_chart_size),
        ] {
            CanvasSize::parse(spec, charts.max_pixels)
                .map_err(|e| TweetalyticsError::config_with_source(format!("{name} is invalid"), e))?;
        }

        let shortener = &config.shortener;
        if shortener.enabled {
            Self::validate_url(&shortener.api_base, "shortener.api_base")?;
            if shortener.login.is_empty() || shortener.api_key.is_empty() {
                return Err(TweetalyticsError::config(
                    "shortener.login and shortener.api_key are required when shortening is enabled",
                ));
            }
        }

        Ok(())
    }

    fn validate_url(raw: &str, name: &str) -> Result<()> {
        let url = Url::parse(raw)
            .map_err(|e| TweetalyticsError::config_with_source(format!("{name} is not a URL"), e))?;
        match url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(TweetalyticsError::config(format!(
                "{name} must use http or https, got {other}"
            ))),
        }
    }
}

impl Config {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        ConfigValidator::validate(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_enabled_shortener_requires_credentials() {
        let mut config = Config::default();
        config.shortener.enabled = true;
        assert!(config.validate().is_err());

        config.shortener.login = "someone".to_string();
        config.shortener.api_key = "R_0123".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_limit_out_of_range() {
        let mut config = Config::default();
        config.ranking.default_limit = 101;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_chart_size_over_budget() {
        let mut config = Config::default();
        config.charts.max_pixels = 50_000;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("user_chart_size"));
    }

    #[test]
    fn test_bad_provider_url() {
        let mut config = Config::default();
        config.provider.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());
        config.provider.base_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }
}

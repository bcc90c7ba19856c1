//! Bitly link shortener.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::{fmt, time::Duration};
use tracing::{debug, instrument};
use tweetalytics_common::{Result, TweetalyticsError};
use tweetalytics_config::ShortenerConfig;
use tweetalytics_engine::LinkShortener;
use url::Url;

/// Bitly answers failures with an empty `data` array, so `data` stays loose.
#[derive(Debug, Deserialize)]
struct ShortenResponse {
    status_code: u16,
    #[serde(default)]
    status_txt: String,
    #[serde(default)]
    data: Value,
}

impl ShortenResponse {
    fn short_url(&self) -> Option<&str> {
        self.data
            .get("url")
            .and_then(Value::as_str)
            .filter(|short| !short.is_empty())
    }
}

/// [`LinkShortener`] backed by the Bitly REST API.
#[derive(Clone)]
pub struct BitlyShortener {
    client: Client,
    endpoint: Url,
    login: String,
    api_key: String,
}

impl fmt::Debug for BitlyShortener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BitlyShortener")
            .field("endpoint", &self.endpoint.as_str())
            .field("login", &self.login)
            .finish_non_exhaustive()
    }
}

impl BitlyShortener {
    /// Creates a shortener from configured credentials.
    pub fn new(config: &ShortenerConfig) -> Result<Self> {
        if config.login.is_empty() || config.api_key.is_empty() {
            return Err(TweetalyticsError::config(
                "Shortener login and API key must be configured",
            ));
        }

        let base = format!("{}/", config.api_base.trim().trim_end_matches('/'));
        let endpoint = Url::parse(&base)
            .and_then(|base| base.join("shorten"))
            .map_err(|e| {
                TweetalyticsError::config_with_source(
                    format!("Invalid shortener URL {:?}", config.api_base),
                    e,
                )
            })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TweetalyticsError::transport_with_source("Failed to create HTTP client", e))?;

        Ok(Self {
            client,
            endpoint,
            login: config.login.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Endpoint requests are sent to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl LinkShortener for BitlyShortener {
    #[instrument(skip_all)]
    async fn shorten(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[
                ("login", self.login.as_str()),
                ("apiKey", self.api_key.as_str()),
                ("longUrl", url),
                ("format", "json"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TweetalyticsError::transport_with_status(
                format!("Shortener returned {status}"),
                status.as_u16(),
            ));
        }

        let body: ShortenResponse = response.json().await?;
        if body.status_code != 200 {
            return Err(TweetalyticsError::transport_with_status(
                format!("Shortener refused the link: {}", body.status_txt),
                body.status_code,
            ));
        }

        let short = body
            .short_url()
            .map(str::to_owned)
            .ok_or_else(|| TweetalyticsError::transport("Shortener response carried no link"))?;
        debug!(short = %short, "Shortened link");
        Ok(short)
    }
}

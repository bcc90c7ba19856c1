//! HTTP provider gateway with connection pooling and rate limiting.
//!
//! Requests are never retried. A timeout, a non-success status or a body
//! that cannot be decoded is reported once as a transport error.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use governor::{DefaultDirectRateLimiter, Quota};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::{fmt, num::NonZeroU32, sync::Arc, time::Duration};
use tracing::{debug, instrument, warn};
use tweetalytics_common::{ConnectionKind, Handle, Result, TweetalyticsError};
use tweetalytics_config::ProviderConfig;
use tweetalytics_engine::{ActivityEntry, ConnectionRecord, ProviderGateway};
use url::Url;

/// Timestamp layout used by the provider, e.g. `Wed Aug 27 13:08:45 +0000 2008`.
pub const PROVIDER_TIMESTAMP_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// Parses a provider timestamp, accepting the provider's own layout or
/// RFC 3339.
pub fn parse_provider_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_str(raw, PROVIDER_TIMESTAMP_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|e| {
            TweetalyticsError::transport_with_source(format!("Unreadable timestamp {raw:?}"), e)
        })
}

#[derive(Debug, Deserialize)]
struct StatusPayload {
    id: Option<u64>,
    created_at: String,
}

impl StatusPayload {
    fn into_entry(self) -> Result<ActivityEntry> {
        Ok(ActivityEntry {
            id: self.id,
            created_at: parse_provider_timestamp(&self.created_at)?,
        })
    }
}

/// Connection lists arrive either bare or wrapped in a `users` envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ConnectionsPayload {
    List(Vec<ConnectionRecord>),
    Envelope { users: Vec<ConnectionRecord> },
}

impl From<ConnectionsPayload> for Vec<ConnectionRecord> {
    fn from(payload: ConnectionsPayload) -> Self {
        match payload {
            ConnectionsPayload::List(users) | ConnectionsPayload::Envelope { users } => users,
        }
    }
}

/// [`ProviderGateway`] speaking the provider's JSON REST API.
#[derive(Clone)]
pub struct HttpProviderGateway {
    client: Client,
    base_url: Url,
    rate_limiter: Arc<DefaultDirectRateLimiter>,
}

impl fmt::Debug for HttpProviderGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpProviderGateway")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl HttpProviderGateway {
    /// Builds the HTTP client and rate limiter from provider settings.
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(config.max_idle_per_host)
            .build()
            .map_err(|e| TweetalyticsError::transport_with_source("Failed to create HTTP client", e))?;

        let quota = Quota::per_second(
            NonZeroU32::new(config.rate_limit_per_sec)
                .ok_or_else(|| TweetalyticsError::config("Rate limit must be greater than 0"))?,
        );

        Ok(Self {
            client,
            base_url: directory_url(&config.base_url)?,
            rate_limiter: Arc::new(DefaultDirectRateLimiter::direct(quota)),
        })
    }

    /// Base URL endpoints are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url.join(path).map_err(|e| {
            TweetalyticsError::config_with_source(format!("Cannot build endpoint {path:?}"), e)
        })
    }

    fn connections_url(&self, handle: &Handle, kind: ConnectionKind) -> Result<Url> {
        let mut url = self.endpoint(&format!("statuses/{kind}.json"))?;
        url.query_pairs_mut().append_pair("id", handle.as_str());
        Ok(url)
    }

    fn timeline_url(&self, handle: &Handle, page: u32) -> Result<Url> {
        let mut url = self.endpoint(&format!("statuses/user_timeline/{handle}.json"))?;
        url.query_pairs_mut()
            .append_pair("page", &page.to_string());
        Ok(url)
    }

    #[instrument(skip(self, url), fields(url = %url))]
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        self.rate_limiter.until_ready().await;

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(%status, "Provider returned an error status");
            return Err(TweetalyticsError::transport_with_status(
                format!("Provider returned {status}"),
                status.as_u16(),
            ));
        }

        let body = response.text().await?;
        debug!(bytes = body.len(), "Received provider response");
        serde_json::from_str(&body).map_err(|e| {
            TweetalyticsError::transport_with_source("Malformed provider response", e)
        })
    }
}

/// Parses `raw` and makes sure it ends in a slash, so relative joins append
/// to its last path segment instead of replacing it.
fn directory_url(raw: &str) -> Result<Url> {
    let mut raw = raw.trim().to_string();
    if !raw.ends_with('/') {
        raw.push('/');
    }
    Url::parse(&raw).map_err(|e| {
        TweetalyticsError::config_with_source(format!("Invalid provider URL {raw:?}"), e)
    })
}

#[async_trait]
impl ProviderGateway for HttpProviderGateway {
    #[instrument(skip(self, handle), fields(handle = %handle))]
    async fn fetch_connections(
        &self,
        handle: &Handle,
        kind: ConnectionKind,
    ) -> Result<Vec<ConnectionRecord>> {
        let url = self.connections_url(handle, kind)?;
        let payload: ConnectionsPayload = self.get_json(url).await?;
        let records: Vec<ConnectionRecord> = payload.into();
        debug!(count = records.len(), "Fetched connections");
        Ok(records)
    }

    #[instrument(skip(self, handle), fields(handle = %handle))]
    async fn fetch_timeline_page(&self, handle: &Handle, page: u32) -> Result<Vec<ActivityEntry>> {
        let url = self.timeline_url(handle, page)?;
        let statuses: Vec<StatusPayload> = self.get_json(url).await?;
        statuses.into_iter().map(StatusPayload::into_entry).collect()
    }
}

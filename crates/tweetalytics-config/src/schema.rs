//! Configuration schema definitions using serde.

use serde::{Deserialize, Serialize};
use tweetalytics_common::{Category, ChartKind, LoggingConfig, Metric, Order};

/// Main configuration structure for Tweetalytics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Social-graph provider access.
    pub provider: ProviderConfig,
    /// Ranking policy and request defaults.
    pub ranking: RankingConfig,
    /// Daily activity aggregation policy.
    pub timeline: TimelineConfig,
    /// Chart policy and chart service access.
    pub charts: ChartsConfig,
    /// Link shortener access.
    pub shortener: ShortenerConfig,
    /// Logging setup.
    pub logging: LoggingConfig,
}

/// Social-graph provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Base URL the provider endpoints are resolved against.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Connection pool max idle connections per host.
    pub max_idle_per_host: usize,
    /// Requests per second allowed towards the provider.
    pub rate_limit_per_sec: u32,
}

/// Ranking policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    /// Largest accepted limit.
    pub max_limit: usize,
    /// Limit used when a request names none.
    pub default_limit: usize,
    /// Metric used when a request names none.
    pub default_metric: Metric,
    /// Order used when a request names none.
    pub default_order: Order,
    /// Category used when a request names none.
    pub default_category: Category,
}

/// Daily activity aggregation policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Day count used when a request names none.
    pub default_days: u32,
    /// Largest accepted day count.
    pub max_days: u32,
    /// Deepest timeline page the aggregator will request.
    pub max_pages: u32,
}

/// Chart policy and chart service access.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartsConfig {
    /// Chart service endpoint used by the URL renderer.
    pub service_url: String,
    /// Largest accepted canvas area in pixels.
    pub max_pixels: u64,
    /// Chart kind for connection rankings when a request names none.
    pub default_kind: ChartKind,
    /// Canvas for connection ranking charts when a request names none.
    pub user_chart_size: String,
    /// Canvas for activity charts when a request names none.
    pub activity_chart_size: String,
}

/// Link shortener access.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShortenerConfig {
    /// Whether chart links are shortened at all.
    pub enabled: bool,
    /// Shortener API base URL.
    pub api_base: String,
    /// API login.
    pub login: String,
    /// API key.
    pub api_key: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

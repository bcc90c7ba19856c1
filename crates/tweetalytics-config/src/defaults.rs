//! Default values for every configuration section.

use crate::schema::*;
use tweetalytics_common::{Category, ChartKind, LoggingConfig, Metric, Order};

/// Largest canvas area the chart service accepts.
pub const DEFAULT_MAX_PIXELS: u64 = 300_000;

/// Largest limit a ranking request may ask for.
pub const DEFAULT_MAX_LIMIT: usize = 100;

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            ranking: RankingConfig::default(),
            timeline: TimelineConfig::default(),
            charts: ChartsConfig::default(),
            shortener: ShortenerConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.twitter.com/1".to_string(),
            timeout_secs: 30,
            max_idle_per_host: 10,
            rate_limit_per_sec: 5,
        }
    }
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            max_limit: DEFAULT_MAX_LIMIT,
            default_limit: 10,
            default_metric: Metric::Statuses,
            default_order: Order::Ascending,
            default_category: Category::Top,
        }
    }
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            default_days: 7,
            max_days: 90,
            max_pages: 16,
        }
    }
}

impl Default for ChartsConfig {
    fn default() -> Self {
        Self {
            service_url: "https://chart.apis.google.com/chart".to_string(),
            max_pixels: DEFAULT_MAX_PIXELS,
            default_kind: ChartKind::Bar,
            user_chart_size: "300x300".to_string(),
            activity_chart_size: "300x200".to_string(),
        }
    }
}

impl Default for ShortenerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_base: "https://api-ssl.bitly.com/v3".to_string(),
            login: String::new(),
            api_key: String::new(),
            timeout_secs: 10,
        }
    }
}

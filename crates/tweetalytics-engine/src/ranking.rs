//! Sort-and-slice ranking of connection records.
//!
//! Ranking happens in two independent stages. The category picks which
//! extreme of the distribution survives the limit (`top` keeps the largest
//! values, `bottom` the smallest). The order then decides only how that
//! surviving subset is displayed. Asking for the top 10 by followers in
//! ascending order therefore returns the 10 most-followed accounts, smallest
//! of them first, never the 10 least-followed.

use crate::model::{ConnectionRecord, RankedResultSet};
use tracing::debug;
use tweetalytics_common::{Category, Metric, Order, Result, TweetalyticsError};
use tweetalytics_config::{RankingConfig, DEFAULT_MAX_LIMIT};

/// Orders and bounds connection records by a metric.
#[derive(Debug, Clone, Copy)]
pub struct RankingEngine {
    max_limit: usize,
}

impl RankingEngine {
    /// Creates an engine accepting limits in `1..=max_limit`.
    pub const fn new(max_limit: usize) -> Self {
        Self { max_limit }
    }

    /// Creates an engine from the ranking policy.
    pub const fn from_config(config: &RankingConfig) -> Self {
        Self::new(config.max_limit)
    }

    /// Largest accepted limit.
    pub const fn max_limit(&self) -> usize {
        self.max_limit
    }

    /// Rejects limits outside `1..=max_limit`.
    pub fn validate_limit(&self, limit: usize) -> Result<()> {
        if (1..=self.max_limit).contains(&limit) {
            Ok(())
        } else {
            Err(TweetalyticsError::validation_field(
                format!(
                    "Limit must be between 1 and {} inclusive, got {limit}",
                    self.max_limit
                ),
                "limit",
            ))
        }
    }

    /// Selects `limit` records at the `category` extreme of `metric` and
    /// lays them out in `order`.
    pub fn rank(
        &self,
        records: Vec<ConnectionRecord>,
        metric: Metric,
        limit: usize,
        order: Order,
        category: Category,
    ) -> Result<RankedResultSet> {
        self.validate_limit(limit)?;
        let available = records.len();

        let mut items = records;
        // Stable, so equal values keep the provider's relative order.
        items.sort_by_key(|record| record.metric_value(metric));

        if category == Category::Top {
            items.reverse();
        }
        items.truncate(limit);

        if order != category.natural_order() {
            items.reverse();
        }

        debug!(
            %metric,
            %category,
            %order,
            limit,
            available,
            selected = items.len(),
            "Ranked connections"
        );
        Ok(RankedResultSet { items, metric })
    }
}

impl Default for RankingEngine {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LIMIT)
    }
}

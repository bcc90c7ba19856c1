//! Daily activity aggregation over a paginated, newest-first timeline.
//!
//! The walk starts at yesterday and moves backward through the stream. Each
//! entry advances a running day offset by the number of calendar days between
//! it and the previous entry, so the offset of an entry is its distance from
//! yesterday. Pages are pulled lazily: the next page is requested only once
//! the current one has been folded and the window is still open.

use crate::model::{ActivityEntry, DailySeries};
use crate::traits::ProviderGateway;
use chrono::{NaiveDate, Utc};
use futures::{pin_mut, stream, Stream, TryStreamExt};
use std::ops::ControlFlow;
use std::sync::Arc;
use tracing::{debug, instrument};
use tweetalytics_common::{trailing_day_labels, Handle, Result, TweetalyticsError};
use tweetalytics_config::TimelineConfig;

/// Buckets timeline entries into per-day counts.
pub struct TimelineAggregator {
    gateway: Arc<dyn ProviderGateway>,
    max_days: u32,
    max_pages: u32,
}

impl TimelineAggregator {
    /// Creates an aggregator bounded by the timeline policy.
    pub fn new(gateway: Arc<dyn ProviderGateway>, config: &TimelineConfig) -> Self {
        Self::with_limits(gateway, config.max_days, config.max_pages)
    }

    /// Creates an aggregator with explicit bounds.
    pub fn with_limits(gateway: Arc<dyn ProviderGateway>, max_days: u32, max_pages: u32) -> Self {
        Self {
            gateway,
            max_days,
            max_pages,
        }
    }

    /// Rejects day counts outside `1..=max_days`.
    pub fn validate_day_count(&self, day_count: u32) -> Result<()> {
        if day_count == 0 || day_count > self.max_days {
            return Err(TweetalyticsError::validation_field(
                format!(
                    "Day count must be between 1 and {} inclusive, got {day_count}",
                    self.max_days
                ),
                "days",
            ));
        }
        Ok(())
    }

    /// Counts activity for each of the `day_count` days ending yesterday
    /// (UTC).
    pub async fn daily_counts(&self, handle: &Handle, day_count: u32) -> Result<DailySeries> {
        self.daily_counts_as_of(handle, day_count, Utc::now().date_naive())
            .await
    }

    /// Like [`daily_counts`](Self::daily_counts) with an explicit "today".
    #[instrument(skip(self, handle), fields(handle = %handle))]
    pub async fn daily_counts_as_of(
        &self,
        handle: &Handle,
        day_count: u32,
        today: NaiveDate,
    ) -> Result<DailySeries> {
        self.validate_day_count(day_count)?;
        let yesterday = today
            .pred_opt()
            .ok_or_else(|| TweetalyticsError::validation_field("Date out of range", "days"))?;

        let mut walk = DayWalk::new(yesterday, day_count as usize);
        let pages = self.pages(handle);
        pin_mut!(pages);

        'pages: while let Some(page) = pages.try_next().await? {
            for entry in &page {
                if walk.push(entry.date()).is_break() {
                    break 'pages;
                }
            }
        }

        let series = walk.finish(today);
        debug!(day_count, total = series.total(), "Aggregated daily activity");
        Ok(series)
    }

    /// Lazy stream of non-empty timeline pages, starting at page 1.
    fn pages<'a>(
        &'a self,
        handle: &'a Handle,
    ) -> impl Stream<Item = Result<Vec<ActivityEntry>>> + 'a {
        let gateway = self.gateway.as_ref();
        let max_pages = self.max_pages;
        stream::try_unfold(1u32, move |page| {
            next_page(gateway, handle, page, max_pages)
        })
    }
}

async fn next_page(
    gateway: &dyn ProviderGateway,
    handle: &Handle,
    page: u32,
    max_pages: u32,
) -> Result<Option<(Vec<ActivityEntry>, u32)>> {
    if page > max_pages {
        debug!(max_pages, "Timeline page ceiling reached");
        return Ok(None);
    }

    let entries = gateway.fetch_timeline_page(handle, page).await?;
    debug!(page, entries = entries.len(), "Fetched timeline page");

    if entries.is_empty() {
        Ok(None)
    } else {
        Ok(Some((entries, page + 1)))
    }
}

/// Fold state for the backward walk.
#[derive(Debug)]
struct DayWalk {
    boundary: NaiveDate,
    offset: i64,
    counts: Vec<u64>,
}

impl DayWalk {
    fn new(yesterday: NaiveDate, day_count: usize) -> Self {
        Self {
            boundary: yesterday,
            offset: 0,
            counts: vec![0; day_count],
        }
    }

    /// Folds one entry; breaks once the entry falls outside the window.
    fn push(&mut self, date: NaiveDate) -> ControlFlow<()> {
        self.offset += (self.boundary - date).num_days();
        self.boundary = date;

        if self.offset >= self.counts.len() as i64 {
            return ControlFlow::Break(());
        }
        // Entries newer than yesterday have a negative offset.
        if let Ok(index) = usize::try_from(self.offset) {
            self.counts[index] += 1;
        }
        ControlFlow::Continue(())
    }

    fn finish(self, today: NaiveDate) -> DailySeries {
        let mut counts = self.counts;
        counts.reverse();
        let labels = trailing_day_labels(today, counts.len());
        DailySeries { counts, labels }
    }
}

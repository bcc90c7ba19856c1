//! Collaborator seams: where records come from and where charts go.

use crate::model::{ActivityEntry, ChartRequest, ConnectionRecord, RenderedChart};
use async_trait::async_trait;
use tweetalytics_common::{ConnectionKind, Handle, Result};

/// Source of connection lists and timeline pages.
///
/// Implementations own timeouts and rate limiting. They must not retry; a
/// failed call is reported as a transport error and the caller decides.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProviderGateway: Send + Sync {
    /// Fetches the followers or friends of `handle`.
    async fn fetch_connections(
        &self,
        handle: &Handle,
        kind: ConnectionKind,
    ) -> Result<Vec<ConnectionRecord>>;

    /// Fetches timeline page `page` (1-based), newest entry first. An empty
    /// page means there are no older entries.
    async fn fetch_timeline_page(&self, handle: &Handle, page: u32) -> Result<Vec<ActivityEntry>>;
}

/// Turns a chart request into something presentable.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChartRenderer: Send + Sync {
    /// Renders the chart.
    async fn render(&self, request: &ChartRequest) -> Result<RenderedChart>;

    /// Short name for logs.
    fn name(&self) -> &'static str;
}

/// Shortens links.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkShortener: Send + Sync {
    /// Returns a short reference to `url`.
    async fn shorten(&self, url: &str) -> Result<String>;
}

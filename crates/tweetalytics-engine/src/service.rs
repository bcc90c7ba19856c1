//! Request-level orchestration: raw parameters in, reports and charts out.
//!
//! Every request takes one configuration snapshot and validates all of its
//! parameters against that snapshot before the provider is contacted.

use crate::model::{ChartRequest, DailySeries, RankedResultSet, RenderedChart};
use crate::ranking::RankingEngine;
use crate::report::ReportDataBuilder;
use crate::timeline::TimelineAggregator;
use crate::traits::{ChartRenderer, LinkShortener, ProviderGateway};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument};
use tweetalytics_common::{
    CanvasSize, Category, ChartKind, ConnectionKind, Handle, Metric, Order, Result, TweetalyticsError,
};
use tweetalytics_config::{Config, ConfigCache, RankingConfig};

static LIMIT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+$").expect("Invalid limit regex pattern"));

/// Raw connection query parameters, as a caller supplies them.
///
/// Absent parameters take their configured defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConnectionQuery {
    /// Handle whose connections are ranked.
    pub id: String,
    /// Ranking metric name.
    pub metric: Option<String>,
    /// Maximum number of records, as decimal digits.
    pub limit: Option<String>,
    /// Display order.
    pub order: Option<String>,
    /// Which extreme to keep.
    #[serde(alias = "cat")]
    pub category: Option<String>,
}

impl ConnectionQuery {
    /// Query for `id` with every other parameter defaulted.
    pub fn for_handle(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Parses and checks every parameter.
    pub fn validate(&self, kind: ConnectionKind, policy: &RankingConfig) -> Result<RankRequest> {
        let handle = Handle::new(self.id.trim())?;
        let category = parse_or(self.category.as_deref(), policy.default_category)?;
        let metric = parse_or(self.metric.as_deref(), policy.default_metric)?;
        let order = parse_or(self.order.as_deref(), policy.default_order)?;

        let limit = match self.limit.as_deref().map(str::trim) {
            None => policy.default_limit,
            Some(raw) if LIMIT_REGEX.is_match(raw) => raw.parse().map_err(|_| {
                TweetalyticsError::validation_field(format!("Limit {raw} is too large"), "limit")
            })?,
            Some(raw) => {
                return Err(TweetalyticsError::validation_field(
                    format!("Limit must be a positive integer, got {raw:?}"),
                    "limit",
                ))
            }
        };
        RankingEngine::from_config(policy).validate_limit(limit)?;

        Ok(RankRequest {
            handle,
            kind,
            metric,
            limit,
            order,
            category,
        })
    }
}

fn parse_or<T>(raw: Option<&str>, default: T) -> Result<T>
where
    T: std::str::FromStr<Err = TweetalyticsError>,
{
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => value.parse(),
    }
}

/// A validated connection query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankRequest {
    /// Handle whose connections are ranked.
    pub handle: Handle,
    /// Followers or friends.
    pub kind: ConnectionKind,
    /// Ranking metric.
    pub metric: Metric,
    /// Maximum number of records.
    pub limit: usize,
    /// Display order.
    pub order: Order,
    /// Which extreme to keep.
    pub category: Category,
}

/// Ranked connections together with the query that produced them.
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionReport {
    /// The validated query.
    pub query: RankRequest,
    /// Ranked records.
    pub users: RankedResultSet,
}

/// Daily activity of one handle.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityReport {
    /// Handle whose timeline was walked.
    pub handle: Handle,
    /// Number of days covered.
    pub days: u32,
    /// Per-day counts, oldest first.
    pub series: DailySeries,
}

/// Entry point tying the provider, the core and the chart collaborators
/// together.
pub struct QueryService {
    gateway: Arc<dyn ProviderGateway>,
    config: Arc<ConfigCache>,
}

impl QueryService {
    /// Creates a service reading policy from `config`.
    pub fn new(gateway: Arc<dyn ProviderGateway>, config: Arc<ConfigCache>) -> Self {
        Self { gateway, config }
    }

    /// Current configuration snapshot.
    pub fn config(&self) -> Arc<Config> {
        self.config.get()
    }

    /// Fetches and ranks the followers or friends of a handle.
    #[instrument(skip(self, query), fields(id = %query.id))]
    pub async fn connections(
        &self,
        kind: ConnectionKind,
        query: &ConnectionQuery,
    ) -> Result<ConnectionReport> {
        let config = self.config.get();
        let request = query.validate(kind, &config.ranking)?;

        let records = self.gateway.fetch_connections(&request.handle, kind).await?;
        debug!(fetched = records.len(), "Fetched connections");

        let users = RankingEngine::from_config(&config.ranking).rank(
            records,
            request.metric,
            request.limit,
            request.order,
            request.category,
        )?;

        info!(
            %kind,
            metric = %request.metric,
            category = %request.category,
            order = %request.order,
            returned = users.len(),
            "Connection query completed"
        );
        Ok(ConnectionReport {
            query: request,
            users,
        })
    }

    /// Counts daily activity for a handle over `days` days, or the
    /// configured default.
    #[instrument(skip(self))]
    pub async fn activity(&self, id: &str, days: Option<u32>) -> Result<ActivityReport> {
        let config = self.config.get();
        let handle = Handle::new(id.trim())?;
        let days = days.unwrap_or(config.timeline.default_days);

        let aggregator = TimelineAggregator::new(Arc::clone(&self.gateway), &config.timeline);
        let series = aggregator.daily_counts(&handle, days).await?;

        info!(days, total = series.total(), "Activity query completed");
        Ok(ActivityReport {
            handle,
            days,
            series,
        })
    }

    /// Chart kind for connection reports, falling back to configuration.
    /// Call before querying so a bad kind never reaches the provider.
    pub fn chart_kind(&self, kind: Option<&str>) -> Result<ChartKind> {
        parse_or(kind, self.config.get().charts.default_kind)
    }

    /// Canvas for connection charts, falling back to configuration.
    pub fn user_canvas(&self, size: Option<&str>) -> Result<CanvasSize> {
        let config = self.config.get();
        let size = size.unwrap_or(config.charts.user_chart_size.as_str());
        ReportDataBuilder::from_config(&config.charts).parse_canvas(size)
    }

    /// Canvas for activity charts, falling back to configuration.
    pub fn activity_canvas(&self, size: Option<&str>) -> Result<CanvasSize> {
        let config = self.config.get();
        let size = size.unwrap_or(config.charts.activity_chart_size.as_str());
        ReportDataBuilder::from_config(&config.charts).parse_canvas(size)
    }

    /// Chart request for ranked connections.
    pub fn user_chart(
        &self,
        report: &ConnectionReport,
        kind: ChartKind,
        canvas: CanvasSize,
    ) -> ChartRequest {
        ReportDataBuilder::user_chart(&report.users, kind, canvas)
    }

    /// Bar chart request for daily activity.
    pub fn activity_chart(&self, report: &ActivityReport, canvas: CanvasSize) -> ChartRequest {
        ReportDataBuilder::activity_chart(&report.series, canvas)
    }

    /// Renders a chart and, when a shortener is given, shortens the
    /// resulting link. Image output is returned untouched.
    #[instrument(skip_all, fields(renderer = renderer.name(), kind = %request.kind))]
    pub async fn publish(
        &self,
        request: &ChartRequest,
        renderer: &dyn ChartRenderer,
        shortener: Option<&dyn LinkShortener>,
    ) -> Result<RenderedChart> {
        let rendered = renderer.render(request).await?;
        match (rendered, shortener) {
            (RenderedChart::Url(url), Some(shortener)) => {
                let short = shortener.shorten(&url).await?;
                debug!(long = url.len(), short = %short, "Shortened chart link");
                Ok(RenderedChart::Url(short))
            }
            (rendered, _) => Ok(rendered),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ConnectionRecord;
    use crate::traits::{MockChartRenderer, MockLinkShortener, MockProviderGateway};

    fn query(id: &str, metric: &str, limit: &str, order: &str, category: &str) -> ConnectionQuery {
        ConnectionQuery {
            id: id.to_string(),
            metric: Some(metric.to_string()),
            limit: Some(limit.to_string()),
            order: Some(order.to_string()),
            category: Some(category.to_string()),
        }
    }

    fn service(gateway: MockProviderGateway) -> QueryService {
        QueryService::new(Arc::new(gateway), Arc::new(ConfigCache::default()))
    }

    #[test]
    fn test_defaults_apply() {
        let request = ConnectionQuery::for_handle("someone")
            .validate(ConnectionKind::Friends, &RankingConfig::default())
            .unwrap();

        assert_eq!(request.metric, Metric::Statuses);
        assert_eq!(request.limit, 10);
        assert_eq!(request.order, Order::Ascending);
        assert_eq!(request.category, Category::Top);
        assert_eq!(request.kind, ConnectionKind::Friends);
    }

    #[test]
    fn test_each_parameter_is_checked() {
        let policy = RankingConfig::default();
        let cases = [
            (query("bad name", "followers", "10", "asc", "top"), "id"),
            (query("someone", "likes", "10", "asc", "top"), "metric"),
            (query("someone", "followers", "ten", "asc", "top"), "limit"),
            (query("someone", "followers", "-1", "asc", "top"), "limit"),
            (query("someone", "followers", "0", "asc", "top"), "limit"),
            (query("someone", "followers", "101", "asc", "top"), "limit"),
            (query("someone", "followers", "10", "acs", "top"), "order"),
            (query("someone", "followers", "10", "asc", "middle"), "category"),
        ];

        for (query, field) in cases {
            let err = query
                .validate(ConnectionKind::Followers, &policy)
                .unwrap_err();
            assert!(err.is_validation());
            assert_eq!(err.field(), Some(field), "query {query:?}");
        }
    }

    #[test]
    fn test_long_order_names_accepted() {
        let request = query("someone", "friends", "100", "descending", "bottom")
            .validate(ConnectionKind::Followers, &RankingConfig::default())
            .unwrap();
        assert_eq!(request.order, Order::Descending);
        assert_eq!(request.limit, 100);
    }

    #[tokio::test]
    async fn test_connections_ranks_fetched_records() {
        let mut gateway = MockProviderGateway::new();
        gateway
            .expect_fetch_connections()
            .withf(|handle, kind| handle.as_str() == "someone" && *kind == ConnectionKind::Followers)
            .times(1)
            .returning(|_, _| {
                Ok(vec![
                    ConnectionRecord::with_metric("a", Metric::Followers, 5),
                    ConnectionRecord::with_metric("b", Metric::Followers, 20),
                    ConnectionRecord::with_metric("c", Metric::Followers, 1),
                ])
            });

        let report = service(gateway)
            .connections(
                ConnectionKind::Followers,
                &query("someone", "followers", "2", "desc", "top"),
            )
            .await
            .unwrap();

        assert_eq!(report.users.handles(), vec!["b", "a"]);
        assert_eq!(report.query.limit, 2);
    }

    #[tokio::test]
    async fn test_invalid_query_never_reaches_gateway() {
        let service = service(MockProviderGateway::new());
        let err = service
            .connections(
                ConnectionKind::Friends,
                &query("someone", "followers", "500", "asc", "top"),
            )
            .await
            .unwrap_err();
        assert_eq!(err.field(), Some("limit"));

        let err = service.activity("someone", Some(0)).await.unwrap_err();
        assert_eq!(err.field(), Some("days"));
    }

    #[test]
    fn test_chart_options_fall_back_to_configuration() {
        let service = service(MockProviderGateway::new());
        assert_eq!(service.chart_kind(None).unwrap(), ChartKind::Bar);
        assert_eq!(service.chart_kind(Some("pie-3d")).unwrap(), ChartKind::Pie3d);
        assert_eq!(service.user_canvas(None).unwrap().to_string(), "300x300");
        assert_eq!(service.activity_canvas(None).unwrap().to_string(), "300x200");
    }

    #[test]
    fn test_chart_options_are_validation_errors() {
        let service = service(MockProviderGateway::new());
        assert_eq!(service.chart_kind(Some("donut")).unwrap_err().field(), Some("chart"));
        assert_eq!(
            service.user_canvas(Some("1000x1000")).unwrap_err().field(),
            Some("size")
        );
        assert!(service.activity_canvas(Some("wide")).unwrap_err().is_validation());
    }

    #[tokio::test]
    async fn test_transport_failure_propagates() {
        let mut gateway = MockProviderGateway::new();
        gateway
            .expect_fetch_connections()
            .times(1)
            .returning(|_, _| Err(TweetalyticsError::transport("connection reset")));

        let err = service(gateway)
            .connections(ConnectionKind::Friends, &ConnectionQuery::for_handle("x"))
            .await
            .unwrap_err();
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_publish_shortens_links() {
        let request = ReportDataBuilder::user_chart(
            &RankedResultSet {
                items: vec![ConnectionRecord::with_metric("a", Metric::Friends, 3)],
                metric: Metric::Friends,
            },
            ChartKind::Pie,
            CanvasSize {
                width: 300,
                height: 300,
            },
        );

        let mut renderer = MockChartRenderer::new();
        renderer.expect_name().return_const("mock");
        renderer
            .expect_render()
            .times(1)
            .returning(|_| Ok(RenderedChart::Url("https://charts.example/chart?cht=p".into())));

        let mut shortener = MockLinkShortener::new();
        shortener
            .expect_shorten()
            .withf(|url| url == "https://charts.example/chart?cht=p")
            .times(1)
            .returning(|_| Ok("https://bit.ly/abc".into()));

        let rendered = service(MockProviderGateway::new())
            .publish(&request, &renderer, Some(&shortener as &dyn LinkShortener))
            .await
            .unwrap();
        assert_eq!(rendered, RenderedChart::Url("https://bit.ly/abc".into()));
    }

    #[tokio::test]
    async fn test_publish_leaves_images_alone() {
        let request = ReportDataBuilder::activity_chart(
            &DailySeries {
                counts: vec![1],
                labels: vec!["01/01".into()],
            },
            CanvasSize {
                width: 100,
                height: 100,
            },
        );

        let mut renderer = MockChartRenderer::new();
        renderer.expect_name().return_const("mock");
        renderer
            .expect_render()
            .returning(|_| Ok(RenderedChart::Png(vec![0x89, b'P', b'N', b'G'])));

        // No expectations: any call would panic.
        let shortener = MockLinkShortener::new();

        let rendered = service(MockProviderGateway::new())
            .publish(&request, &renderer, Some(&shortener as &dyn LinkShortener))
            .await
            .unwrap();
        assert!(matches!(rendered, RenderedChart::Png(_)));
    }
}

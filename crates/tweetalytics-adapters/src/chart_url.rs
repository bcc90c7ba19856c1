//! Chart rendering by URL against a query-string chart service.

use async_trait::async_trait;
use tracing::debug;
use tweetalytics_common::{ChartKind, Result, TweetalyticsError};
use tweetalytics_config::ChartsConfig;
use tweetalytics_engine::{ChartRenderer, ChartRequest, RenderedChart};
use url::Url;

/// Service code for each chart kind.
pub fn chart_type_code(kind: ChartKind) -> &'static str {
    match kind {
        ChartKind::Bar => "bvg",
        ChartKind::Pie => "p",
        ChartKind::Pie3d => "p3",
    }
}

/// Encodes a [`ChartRequest`] as a chart service link.
#[derive(Debug, Clone)]
pub struct ChartUrlRenderer {
    service_url: Url,
}

impl ChartUrlRenderer {
    /// Creates a renderer for the given service endpoint.
    pub fn new(service_url: &str) -> Result<Self> {
        let service_url = Url::parse(service_url).map_err(|e| {
            TweetalyticsError::config_with_source(format!("Invalid chart service URL {service_url:?}"), e)
        })?;
        Ok(Self { service_url })
    }

    /// Creates a renderer from the chart settings.
    pub fn from_config(config: &ChartsConfig) -> Result<Self> {
        Self::new(&config.service_url)
    }

    /// Builds the chart link without any I/O.
    pub fn chart_url(&self, request: &ChartRequest) -> Url {
        let dataset = &request.dataset;
        let mut url = self.service_url.clone();
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("cht", chart_type_code(request.kind))
                .append_pair("chs", &request.canvas.to_string())
                .append_pair("chd", &format!("t:{}", join(&dataset.values, ",")))
                .append_pair("chds", &format!("{},{}", dataset.min, dataset.max));

            if let Some(legend) = &request.legend {
                query.append_pair("chdl", &legend.join("|"));
            }
            if request.kind.is_pie() {
                if let Some(labels) = &dataset.labels {
                    query.append_pair("chl", &labels.join("|"));
                }
            }
            if let Some(axes) = &request.axis_labels {
                query.append_pair("chxt", "x,y").append_pair(
                    "chxl",
                    &format!("0:|{}|1:|{}", axes.x.join("|"), axes.y.join("|")),
                );
            }
        }
        url
    }
}

fn join<T: ToString>(values: &[T], separator: &str) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(separator)
}

#[async_trait]
impl ChartRenderer for ChartUrlRenderer {
    async fn render(&self, request: &ChartRequest) -> Result<RenderedChart> {
        let url = self.chart_url(request);
        debug!(kind = %request.kind, length = url.as_str().len(), "Built chart URL");
        Ok(RenderedChart::Url(url.into()))
    }

    fn name(&self) -> &'static str {
        "chart-url"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tweetalytics_common::{CanvasSize, Metric};
    use tweetalytics_engine::{ConnectionRecord, DailySeries, RankedResultSet, ReportDataBuilder};

    fn canvas(spec: &str) -> CanvasSize {
        ReportDataBuilder::default().parse_canvas(spec).unwrap()
    }

    fn params(url: &Url) -> HashMap<String, String> {
        url.query_pairs().into_owned().collect()
    }

    fn renderer() -> ChartUrlRenderer {
        ChartUrlRenderer::new("https://chart.example.com/chart").unwrap()
    }

    #[test]
    fn test_pie_chart_parameters() {
        let ranked = RankedResultSet {
            items: vec![
                ConnectionRecord::with_metric("b", Metric::Followers, 20),
                ConnectionRecord::with_metric("a", Metric::Followers, 5),
            ],
            metric: Metric::Followers,
        };
        let request = ReportDataBuilder::user_chart(&ranked, ChartKind::Pie3d, canvas("300x300"));

        let params = params(&renderer().chart_url(&request));
        assert_eq!(params["cht"], "p3");
        assert_eq!(params["chs"], "300x300");
        assert_eq!(params["chd"], "t:20,5");
        assert_eq!(params["chds"], "0,20");
        assert_eq!(params["chdl"], "b (20)|a (5)");
        assert_eq!(params["chl"], "b|a");
        assert!(!params.contains_key("chxl"));
    }

    #[test]
    fn test_bar_chart_axes() {
        let series = DailySeries {
            counts: vec![4, 0, 8],
            labels: vec!["03/07".into(), "03/08".into(), "03/09".into()],
        };
        let request = ReportDataBuilder::activity_chart(&series, canvas("300x200"));

        let url = renderer().chart_url(&request);
        let params = params(&url);
        assert_eq!(params["cht"], "bvg");
        assert_eq!(params["chxt"], "x,y");
        assert_eq!(params["chxl"], "0:|03/07|03/08|03/09|1:|0|4|8");
        assert!(!params.contains_key("chl"));
        assert!(url.as_str().starts_with("https://chart.example.com/chart?cht=bvg"));
    }

    #[tokio::test]
    async fn test_render_returns_url() {
        let request = ReportDataBuilder::activity_chart(
            &DailySeries {
                counts: vec![1],
                labels: vec!["01/01".into()],
            },
            canvas("100x100"),
        );

        match renderer().render(&request).await.unwrap() {
            RenderedChart::Url(url) => assert!(url.contains("chd=t%3A1")),
            RenderedChart::Png(_) => panic!("expected a URL"),
        }
    }

    #[test]
    fn test_invalid_service_url() {
        assert!(ChartUrlRenderer::new("::").is_err());
    }
}

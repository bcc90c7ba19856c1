//! Chart-ready datasets for ranked connections and daily activity.

use crate::model::{AxisLabels, ChartDataset, ChartRequest, DailySeries, RankedResultSet};
use tracing::debug;
use tweetalytics_common::{format_legend_entry, CanvasSize, ChartKind, Result};
use tweetalytics_config::{ChartsConfig, DEFAULT_MAX_PIXELS};

/// Builds [`ChartRequest`]s under a canvas pixel budget.
#[derive(Debug, Clone, Copy)]
pub struct ReportDataBuilder {
    max_pixels: u64,
}

impl ReportDataBuilder {
    /// Creates a builder with the given pixel budget.
    pub const fn new(max_pixels: u64) -> Self {
        Self { max_pixels }
    }

    /// Creates a builder from the chart policy.
    pub const fn from_config(config: &ChartsConfig) -> Self {
        Self::new(config.max_pixels)
    }

    /// Packages values with their scale bounds.
    pub fn build_chart_dataset(values: Vec<u64>, labels: Option<Vec<String>>) -> ChartDataset {
        let max = values.iter().copied().max().unwrap_or(0);
        let total = values.iter().sum();
        ChartDataset {
            values,
            labels,
            min: 0,
            max,
            total,
        }
    }

    /// `"handle (value)"` per record, in result-set order.
    pub fn build_legend(result_set: &RankedResultSet) -> Vec<String> {
        result_set
            .items
            .iter()
            .map(|record| {
                format_legend_entry(&record.screen_name, record.metric_value(result_set.metric))
            })
            .collect()
    }

    /// Parses a `WIDTHxHEIGHT` canvas and checks it against the budget.
    pub fn parse_canvas(&self, spec: &str) -> Result<CanvasSize> {
        CanvasSize::parse(spec, self.max_pixels)
    }

    /// Chart of a ranked result set on an already checked canvas. Pie kinds
    /// label each slice with its handle.
    pub fn user_chart(
        result_set: &RankedResultSet,
        kind: ChartKind,
        canvas: CanvasSize,
    ) -> ChartRequest {
        let labels = kind.is_pie().then(|| {
            result_set
                .handles()
                .into_iter()
                .map(str::to_owned)
                .collect::<Vec<_>>()
        });
        let dataset = Self::build_chart_dataset(result_set.values(), labels);
        debug!(%kind, %canvas, max = dataset.max, total = dataset.total, "Built user chart");

        ChartRequest {
            kind,
            canvas,
            dataset,
            legend: Some(Self::build_legend(result_set)),
            axis_labels: None,
        }
    }

    /// Bar chart of a daily series with day labels along x and
    /// `0, max/2, max` along y.
    pub fn activity_chart(series: &DailySeries, canvas: CanvasSize) -> ChartRequest {
        let dataset =
            Self::build_chart_dataset(series.counts.clone(), Some(series.labels.clone()));
        let max = dataset.max;
        debug!(%canvas, days = series.len(), max, "Built activity chart");

        ChartRequest {
            kind: ChartKind::Bar,
            canvas,
            axis_labels: Some(AxisLabels {
                x: series.labels.clone(),
                y: vec![0.to_string(), (max / 2).to_string(), max.to_string()],
            }),
            dataset,
            legend: None,
        }
    }
}

impl Default for ReportDataBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PIXELS)
    }
}

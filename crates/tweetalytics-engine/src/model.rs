//! Records fetched from the provider and the values derived from them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tweetalytics_common::{CanvasSize, ChartKind, Metric};

/// One connected account as returned by the provider.
///
/// Besides the handle, every attribute the provider sent is kept verbatim so
/// that any recognized metric can be read from it later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionRecord {
    /// Handle of the connected account.
    pub screen_name: String,
    /// Remaining provider attributes (counters, display name, ...).
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl ConnectionRecord {
    /// Creates a record with no attributes.
    pub fn new(screen_name: impl Into<String>) -> Self {
        Self {
            screen_name: screen_name.into(),
            attributes: Map::new(),
        }
    }

    /// Builder-style attribute setter.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Convenience constructor setting a single metric counter.
    pub fn with_metric(screen_name: impl Into<String>, metric: Metric, value: u64) -> Self {
        Self::new(screen_name).with_attribute(metric.attribute(), value)
    }

    /// Numeric value of `metric`, 0 when missing or not numeric.
    pub fn metric_value(&self, metric: Metric) -> u64 {
        self.attribute_value(metric.attribute())
    }

    /// Numeric value of an arbitrary attribute, 0 when missing or not numeric.
    pub fn attribute_value(&self, name: &str) -> u64 {
        match self.attributes.get(name) {
            Some(Value::Number(n)) => n
                .as_u64()
                .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
                .unwrap_or(0),
            Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
            _ => 0,
        }
    }
}

/// Connection records ordered by a metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedResultSet {
    /// Records in display order.
    pub items: Vec<ConnectionRecord>,
    /// Metric the ordering was computed on.
    pub metric: Metric,
}

impl RankedResultSet {
    /// Number of records.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether no record was selected.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Metric values in display order.
    pub fn values(&self) -> Vec<u64> {
        self.items.iter().map(|r| r.metric_value(self.metric)).collect()
    }

    /// Handles in display order.
    pub fn handles(&self) -> Vec<&str> {
        self.items.iter().map(|r| r.screen_name.as_str()).collect()
    }
}

/// One event from a user's activity stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
    /// Provider identifier, when supplied.
    pub id: Option<u64>,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
}

impl ActivityEntry {
    /// Creates an entry without an identifier.
    pub fn at(created_at: DateTime<Utc>) -> Self {
        Self {
            id: None,
            created_at,
        }
    }

    /// Calendar day the entry was created on.
    pub fn date(&self) -> NaiveDate {
        self.created_at.date_naive()
    }
}

/// Per-day activity counts ending yesterday, oldest day first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailySeries {
    /// One count per day.
    pub counts: Vec<u64>,
    /// `MM/DD` label per day.
    pub labels: Vec<String>,
}

impl DailySeries {
    /// Number of days covered.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether the series covers no day.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum over all days.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

/// Values, labels and scale bounds handed to a chart renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartDataset {
    /// Data points in display order.
    pub values: Vec<u64>,
    /// Optional per-point labels.
    pub labels: Option<Vec<String>>,
    /// Lower scale bound, always 0.
    pub min: u64,
    /// Upper scale bound, the largest value or 0.
    pub max: u64,
    /// Sum of all values.
    pub total: u64,
}

/// Axis label sets for cartesian charts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AxisLabels {
    /// Labels along the x axis.
    pub x: Vec<String>,
    /// Labels along the y axis, bottom to top.
    pub y: Vec<String>,
}

/// Everything a renderer needs to draw one chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartRequest {
    /// Chart style.
    pub kind: ChartKind,
    /// Canvas dimensions.
    pub canvas: CanvasSize,
    /// Data and bounds.
    pub dataset: ChartDataset,
    /// Legend entries, one per value.
    pub legend: Option<Vec<String>>,
    /// Axis labels for bar charts.
    pub axis_labels: Option<AxisLabels>,
}

/// Output of a chart renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedChart {
    /// A link to a remotely drawn chart.
    Url(String),
    /// PNG encoded image.
    Png(Vec<u8>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_metric_value_from_number_and_string() {
        let record = ConnectionRecord::new("a")
            .with_attribute("followers_count", 12)
            .with_attribute("friends_count", "34")
            .with_attribute("statuses_count", "many");

        assert_eq!(record.metric_value(Metric::Followers), 12);
        assert_eq!(record.metric_value(Metric::Friends), 34);
        assert_eq!(record.metric_value(Metric::Statuses), 0);
    }

    #[test]
    fn test_missing_metric_reads_zero() {
        let record = ConnectionRecord::new("a");
        assert_eq!(record.metric_value(Metric::Followers), 0);
    }

    #[test]
    fn test_record_deserializes_flattened_attributes() {
        let record: ConnectionRecord = serde_json::from_value(json!({
            "screen_name": "b",
            "followers_count": 20,
            "name": "Bee",
        }))
        .unwrap();

        assert_eq!(record.screen_name, "b");
        assert_eq!(record.metric_value(Metric::Followers), 20);
        assert_eq!(record.attributes.get("name"), Some(&json!("Bee")));
    }

    #[test]
    fn test_negative_counter_reads_zero() {
        let record = ConnectionRecord::new("a").with_attribute("followers_count", -5);
        assert_eq!(record.metric_value(Metric::Followers), 0);
    }
}

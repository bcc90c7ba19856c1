//! # Tweetalytics Engine
//!
//! Ranking of a user's connections and daily aggregation of their activity.
//!
//! The engine talks to the outside world only through the traits in
//! [`traits`]; adapters live in `tweetalytics-adapters`.
//!
//! - [`RankingEngine`] selects and orders connection records by a metric.
//! - [`TimelineAggregator`] walks a paginated timeline into per-day counts.
//! - [`ReportDataBuilder`] turns either result into a [`ChartRequest`].
//! - [`QueryService`] validates raw parameters and ties it all together.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod model;
pub mod ranking;
pub mod report;
pub mod service;
pub mod timeline;
pub mod traits;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use model::*;
pub use ranking::RankingEngine;
pub use report::ReportDataBuilder;
pub use service::{ActivityReport, ConnectionQuery, ConnectionReport, QueryService, RankRequest};
pub use timeline::TimelineAggregator;
pub use traits::{ChartRenderer, LinkShortener, ProviderGateway};

//! # Tweetalytics Adapters
//!
//! Concrete collaborators for the engine: an HTTP [`HttpProviderGateway`],
//! two chart renderers ([`ChartUrlRenderer`] and [`BitmapChartRenderer`]) and
//! the [`BitlyShortener`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod bitmap;
pub mod chart_url;
pub mod gateway;
pub mod shortener;

pub use bitmap::BitmapChartRenderer;
pub use chart_url::{chart_type_code, ChartUrlRenderer};
pub use gateway::{parse_provider_timestamp, HttpProviderGateway, PROVIDER_TIMESTAMP_FORMAT};
pub use shortener::BitlyShortener;

//! # Tweetalytics Common
//!
//! Shared types, errors, logging, and utilities for Tweetalytics.
//!
//! This crate provides the foundational types used across all other crates
//! in the Tweetalytics workspace.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod logging;
pub mod types;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

pub use error::{Result, TweetalyticsError};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use types::*;
pub use utils::*;

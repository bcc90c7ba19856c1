//! # Tweetalytics CLI
//!
//! Command-line front end: loads configuration, sets up logging, builds the
//! adapters and prints each query's report as JSON.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod cli;
pub mod error;

pub use app::*;
pub use cli::*;
pub use error::*;

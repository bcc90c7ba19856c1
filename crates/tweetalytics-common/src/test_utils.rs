//! Test utilities and shared test helpers for Tweetalytics.
//!
//! This module provides fixtures and helper functions used across the
//! workspace for unit and integration testing.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize test logging once per test run.
static INIT: Once = Once::new();

/// Initialize logging for tests with a sensible default configuration.
/// This function is safe to call multiple times and will only initialize once.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

        let _ = fmt().with_test_writer().with_env_filter(filter).try_init();
    });
}

/// Test fixture for creating a mock timestamp.
pub fn mock_timestamp(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    min: u32,
    sec: u32,
) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, min, sec)
        .unwrap()
}

/// Test fixture for a calendar date.
pub fn mock_date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Create a temporary directory for tests that automatically cleans up.
#[cfg(feature = "tempfile")]
pub fn create_temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Provider payload fixtures.
pub mod provider_fixtures {
    use serde_json::{json, Value};

    /// A user record as the provider returns it.
    pub fn user_json(screen_name: &str, followers: u64, friends: u64, statuses: u64) -> Value {
        json!({
            "screen_name": screen_name,
            "followers_count": followers,
            "friends_count": friends,
            "statuses_count": statuses,
        })
    }

    /// Three connections with distinct follower counts.
    pub fn sample_connections_json() -> Value {
        json!([
            user_json("a", 5, 10, 100),
            user_json("b", 20, 3, 40),
            user_json("c", 1, 7, 900),
        ])
    }

    /// A timeline status as the provider returns it.
    pub fn status_json(id: u64, created_at: &str) -> Value {
        json!({
            "id": id,
            "created_at": created_at,
            "text": format!("status {id}"),
        })
    }
}

/// Property-based testing utilities using proptest.
#[cfg(feature = "proptest")]
pub mod property_testing {
    use proptest::prelude::*;

    /// Strategy for generating metric counters, including ties.
    pub fn counter_strategy() -> impl Strategy<Value = u64> {
        prop_oneof![0u64..10, 0u64..1_000_000]
    }
}

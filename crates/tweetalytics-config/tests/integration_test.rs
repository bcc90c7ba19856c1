//! Integration tests for tweetalytics-config crate.

use std::fs;
use tweetalytics_common::test_utils::create_temp_dir;
use tweetalytics_common::{ChartKind, LogFormat, Metric, Order};
use tweetalytics_config::{Config, ConfigCache, ConfigLoader};

#[test]
fn test_yaml_file_partial_sections_keep_defaults() {
    let dir = create_temp_dir();
    let path = dir.path().join("tweetalytics.yaml");
    fs::write(
        &path,
        r#"
provider:
  base_url: "http://localhost:8080/1"
ranking:
  default_metric: followers
  default_order: desc
charts:
  max_pixels: 120000
  user_chart_size: "300x300"
  activity_chart_size: "300x200"
  default_kind: pie-3d
logging:
  format: compact
"#,
    )
    .unwrap();

    let config = ConfigLoader::parse_file(&path).unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(config.provider.base_url, "http://localhost:8080/1");
    assert_eq!(config.provider.timeout_secs, 30);
    assert_eq!(config.ranking.default_metric, Metric::Followers);
    assert_eq!(config.ranking.default_order, Order::Descending);
    assert_eq!(config.ranking.max_limit, 100);
    assert_eq!(config.charts.default_kind, ChartKind::Pie3d);
    assert_eq!(config.charts.max_pixels, 120_000);
    assert_eq!(config.logging.format, LogFormat::Compact);
    assert_eq!(config.timeline.default_days, 7);
}

#[test]
fn test_toml_file() {
    let dir = create_temp_dir();
    let path = dir.path().join("tweetalytics.toml");
    fs::write(
        &path,
        r#"
[timeline]
default_days = 14
max_days = 30
max_pages = 4

[shortener]
enabled = true
login = "someone"
api_key = "R_0123"
"#,
    )
    .unwrap();

    let config = ConfigLoader::parse_file(&path).unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(config.timeline.default_days, 14);
    assert_eq!(config.timeline.max_pages, 4);
    assert!(config.shortener.enabled);
}

#[test]
fn test_missing_file_is_config_error() {
    let dir = create_temp_dir();
    let err = ConfigLoader::load_from_file(dir.path().join("absent.yaml")).unwrap_err();
    assert!(err.to_string().contains("Configuration error"));
}

#[test]
fn test_config_cache() {
    let config = Config::default();
    let cache = ConfigCache::new(config.clone());

    let cached_config = cache.get();
    assert_eq!(cached_config.ranking.max_limit, config.ranking.max_limit);

    let mut new_config = config;
    new_config.ranking.max_limit = 50;
    cache.update(new_config).unwrap();
    assert_eq!(cache.get().ranking.max_limit, 50);

    // Snapshots taken earlier stay unchanged
    assert_eq!(cached_config.ranking.max_limit, 100);
}

#[test]
fn test_config_cache_rejects_invalid_update() {
    let cache = ConfigCache::default();
    let mut bad = Config::default();
    bad.timeline.max_pages = 0;

    assert!(cache.update(bad).is_err());
    assert_eq!(cache.get().timeline.max_pages, 16);
}

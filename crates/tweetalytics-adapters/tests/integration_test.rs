//! Integration tests for tweetalytics-adapters crate.
//!
//! A local axum server stands in for the provider and the shortener.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tweetalytics_adapters::{BitlyShortener, ChartUrlRenderer, HttpProviderGateway};
use tweetalytics_common::test_utils::{init_test_logging, mock_date, provider_fixtures};
use tweetalytics_common::{ConnectionKind, Handle, TweetalyticsError};
use tweetalytics_config::{Config, ConfigCache, ProviderConfig, ShortenerConfig};
use tweetalytics_engine::{
    ConnectionQuery, LinkShortener, ProviderGateway, QueryService, RenderedChart,
    TimelineAggregator,
};

type Reply = (StatusCode, Json<Value>);

#[derive(Clone, Default)]
struct FakeState {
    requested_pages: Arc<Mutex<Vec<u32>>>,
}

async fn followers(Query(params): Query<HashMap<String, String>>) -> Reply {
    match params.get("id").map(String::as_str) {
        Some("someone") => (StatusCode::OK, Json(provider_fixtures::sample_connections_json())),
        _ => (StatusCode::NOT_FOUND, Json(json!({"error": "Not found"}))),
    }
}

async fn friends() -> Reply {
    (
        StatusCode::OK,
        Json(json!({ "users": provider_fixtures::sample_connections_json() })),
    )
}

async fn timeline(
    State(state): State<FakeState>,
    Path(file): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Reply {
    if file == "broken.json" {
        return (StatusCode::SERVICE_UNAVAILABLE, Json(json!({"error": "Over capacity"})));
    }
    if file == "garbled.json" {
        return (StatusCode::OK, Json(json!([{"id": 1, "created_at": "sometime"}])));
    }

    let page: u32 = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(0);
    state.requested_pages.lock().unwrap().push(page);

    let statuses = match page {
        1 => json!([
            provider_fixtures::status_json(5, "Sat Mar 09 18:00:00 +0000 2024"),
            provider_fixtures::status_json(4, "Sat Mar 09 08:00:00 +0000 2024"),
            provider_fixtures::status_json(3, "Fri Mar 08 12:00:00 +0000 2024"),
        ]),
        2 => json!([
            provider_fixtures::status_json(2, "Wed Mar 06 12:00:00 +0000 2024"),
            provider_fixtures::status_json(1, "Tue Mar 05 12:00:00 +0000 2024"),
        ]),
        _ => json!([]),
    };
    (StatusCode::OK, Json(statuses))
}

async fn shorten(Query(params): Query<HashMap<String, String>>) -> Reply {
    let authorized = params.get("login").map(String::as_str) == Some("someone")
        && params.get("apiKey").map(String::as_str) == Some("R_0123")
        && params.get("format").map(String::as_str) == Some("json");
    let long_url = params.get("longUrl").cloned().unwrap_or_default();

    let body = if !authorized {
        json!({"status_code": 403, "status_txt": "INVALID_LOGIN", "data": []})
    } else if long_url.is_empty() {
        json!({"status_code": 500, "status_txt": "MISSING_ARG_URI", "data": []})
    } else {
        json!({
            "status_code": 200,
            "status_txt": "OK",
            "data": {"url": "https://bit.ly/short", "long_url": long_url},
        })
    };
    (StatusCode::OK, Json(body))
}

async fn spawn_fake_services() -> (String, FakeState) {
    init_test_logging();
    let state = FakeState::default();
    let app = Router::new()
        .route("/1/statuses/followers.json", get(followers))
        .route("/1/statuses/friends.json", get(friends))
        .route("/1/statuses/user_timeline/:file", get(timeline))
        .route("/v3/shorten", get(shorten))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), state)
}

fn gateway(base: &str) -> HttpProviderGateway {
    HttpProviderGateway::new(&ProviderConfig {
        base_url: format!("{base}/1"),
        rate_limit_per_sec: 50,
        ..ProviderConfig::default()
    })
    .unwrap()
}

fn handle(name: &str) -> Handle {
    Handle::new(name).unwrap()
}

#[tokio::test]
async fn test_followers_ranked_end_to_end() {
    let (base, _) = spawn_fake_services().await;
    let service = QueryService::new(
        Arc::new(gateway(&base)),
        Arc::new(ConfigCache::new(Config::default())),
    );

    let query = ConnectionQuery {
        id: "someone".into(),
        metric: Some("followers".into()),
        limit: Some("2".into()),
        order: Some("desc".into()),
        category: Some("top".into()),
    };
    let report = service
        .connections(ConnectionKind::Followers, &query)
        .await
        .unwrap();
    assert_eq!(report.users.handles(), vec!["b", "a"]);

    let renderer = ChartUrlRenderer::new("https://chart.example.com/chart").unwrap();
    let chart = service.user_chart(
        &report,
        service.chart_kind(Some("bar")).unwrap(),
        service.user_canvas(None).unwrap(),
    );
    match service.publish(&chart, &renderer, None).await.unwrap() {
        RenderedChart::Url(url) => assert!(url.contains("cht=bvg")),
        RenderedChart::Png(_) => panic!("expected a URL"),
    }
}

#[tokio::test]
async fn test_friends_envelope_is_unwrapped() {
    let (base, _) = spawn_fake_services().await;
    let records = gateway(&base)
        .fetch_connections(&handle("someone"), ConnectionKind::Friends)
        .await
        .unwrap();
    assert_eq!(records.len(), 3);
}

#[tokio::test]
async fn test_error_status_is_transport_error() {
    let (base, _) = spawn_fake_services().await;
    let err = gateway(&base)
        .fetch_connections(&handle("nobody"), ConnectionKind::Followers)
        .await
        .unwrap_err();

    match err {
        TweetalyticsError::Transport { status_code, .. } => assert_eq!(status_code, Some(404)),
        other => panic!("unexpected error: {other}"),
    }

    let err = gateway(&base)
        .fetch_timeline_page(&handle("broken"), 1)
        .await
        .unwrap_err();
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_unreadable_timestamps_are_transport_errors() {
    let (base, _) = spawn_fake_services().await;
    let err = gateway(&base)
        .fetch_timeline_page(&handle("garbled"), 1)
        .await
        .unwrap_err();
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_timeline_walk_stops_before_unneeded_pages() {
    let (base, state) = spawn_fake_services().await;
    let aggregator = TimelineAggregator::with_limits(Arc::new(gateway(&base)), 90, 16);

    let series = aggregator
        .daily_counts_as_of(&handle("someone"), 3, mock_date(2024, 3, 10))
        .await
        .unwrap();

    assert_eq!(series.counts, vec![0, 1, 2]);
    assert_eq!(series.labels, vec!["03/07", "03/08", "03/09"]);
    assert_eq!(*state.requested_pages.lock().unwrap(), vec![1, 2]);
}

#[tokio::test]
async fn test_timeline_walk_ends_on_empty_page() {
    let (base, state) = spawn_fake_services().await;
    let aggregator = TimelineAggregator::with_limits(Arc::new(gateway(&base)), 90, 16);

    let series = aggregator
        .daily_counts_as_of(&handle("someone"), 7, mock_date(2024, 3, 10))
        .await
        .unwrap();

    assert_eq!(series.counts, vec![0, 0, 1, 1, 0, 1, 2]);
    assert_eq!(*state.requested_pages.lock().unwrap(), vec![1, 2, 3]);
}

#[tokio::test]
async fn test_shortener_round_trip() {
    let (base, _) = spawn_fake_services().await;
    let config = ShortenerConfig {
        enabled: true,
        api_base: format!("{base}/v3"),
        login: "someone".into(),
        api_key: "R_0123".into(),
        ..ShortenerConfig::default()
    };

    let shortener = BitlyShortener::new(&config).unwrap();
    let short = shortener
        .shorten("https://chart.example.com/chart?cht=p&chd=t:1,2")
        .await
        .unwrap();
    assert_eq!(short, "https://bit.ly/short");

    let rejected = BitlyShortener::new(&ShortenerConfig {
        api_key: "R_wrong".into(),
        ..config
    })
    .unwrap();
    let err = rejected.shorten("https://example.com").await.unwrap_err();
    match err {
        TweetalyticsError::Transport { status_code, .. } => assert_eq!(status_code, Some(403)),
        other => panic!("unexpected error: {other}"),
    }
}

//! Integration tests for GoogleTrendsClient using wiremock
//!
//! These tests validate the two-step explore/multiline exchange and the
//! failure classification against a mock server.

mod common;

use chrono::NaiveDate;
use common::{explore_body, multiline_body};
use trends_explorer::config::TrendsConfig;
use trends_explorer::fetcher::{FetchOutcome, GoogleTrendsClient, TrendSource};
use trends_explorer::models::{Query, TimeRange};
use trends_explorer::utils::error::FetchError;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const EXPLORE: &str = "/trends/api/explore";
const MULTILINE: &str = "/trends/api/widgetdata/multiline";

fn query(keywords: &[&str]) -> Query {
    Query {
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
        region_code: "NG".to_string(),
        range: TimeRange {
            start_year: 2021,
            end_year: 2025,
        },
    }
}

/// Test successful two-step fetch from mock server
#[tokio::test]
async fn test_fetch_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(EXPLORE))
        .and(query_param("hl", "en-US"))
        .and(query_param("tz", "360"))
        .respond_with(ResponseTemplate::new(200).set_body_string(explore_body("tok-123")))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(MULTILINE))
        .and(query_param("token", "tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_string(multiline_body(&[
            (1609632000, &[50, 10][..]),
            (1610236800, &[75, 20][..]),
            (1610841600, &[100, 5][..]),
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = GoogleTrendsClient::with_base_url(&mock_server.uri(), 100).unwrap();
    let outcome = client.fetch(&query(&["ChatGPT", "AI jobs"])).await;

    let series = match outcome {
        Ok(FetchOutcome::Series(series)) => series,
        other => panic!("expected a series, got {other:?}"),
    };

    assert_eq!(series.keywords, vec!["ChatGPT", "AI jobs"]);
    assert_eq!(series.len(), 3);
    assert_eq!(
        series.points[0].date,
        NaiveDate::from_ymd_opt(2021, 1, 3).unwrap()
    );
    assert_eq!(series.points[2].values, vec![Some(100), Some(5)]);
}

/// The explore request carries keywords, geo and timeframe
#[tokio::test]
async fn test_explore_request_payload() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(EXPLORE))
        .respond_with(ResponseTemplate::new(200).set_body_string(explore_body("t")))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(MULTILINE))
        .respond_with(ResponseTemplate::new(200).set_body_string(multiline_body(&[(1609632000, &[1][..])])))
        .mount(&mock_server)
        .await;

    let client = GoogleTrendsClient::with_base_url(&mock_server.uri(), 100).unwrap();
    client.fetch(&query(&["rust"])).await.unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    let explore = requests
        .iter()
        .find(|r| r.url.path() == EXPLORE)
        .expect("explore request sent");

    let req = explore
        .url
        .query_pairs()
        .find(|(k, _)| k == "req")
        .map(|(_, v)| v.into_owned())
        .expect("req parameter");
    let payload: serde_json::Value = serde_json::from_str(&req).unwrap();

    assert_eq!(payload["comparisonItem"][0]["keyword"], "rust");
    assert_eq!(payload["comparisonItem"][0]["geo"], "NG");
    assert_eq!(payload["comparisonItem"][0]["time"], "2021-01-01 2025-12-31");

    let multiline = requests
        .iter()
        .find(|r| r.url.path() == MULTILINE)
        .expect("multiline request sent");
    let widget_req = multiline
        .url
        .query_pairs()
        .find(|(k, _)| k == "req")
        .map(|(_, v)| v.into_owned())
        .unwrap();
    let widget_req: serde_json::Value = serde_json::from_str(&widget_req).unwrap();
    assert_eq!(widget_req["resolution"], "WEEK");
}

/// Test that 429 is reported as a rate limit and not retried
#[tokio::test]
async fn test_429_is_rate_limited() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(EXPLORE))
        .respond_with(ResponseTemplate::new(429))
        .expect(1) // Should only be called once (no retry)
        .mount(&mock_server)
        .await;

    let client = GoogleTrendsClient::with_base_url(&mock_server.uri(), 100).unwrap();
    let result = client.fetch(&query(&["ChatGPT"])).await;

    assert!(matches!(result, Err(FetchError::RateLimited)));
}

/// A throttle on the second step is also a rate limit
#[tokio::test]
async fn test_429_on_multiline() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(EXPLORE))
        .respond_with(ResponseTemplate::new(200).set_body_string(explore_body("t")))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(MULTILINE))
        .respond_with(ResponseTemplate::new(429))
        .mount(&mock_server)
        .await;

    let client = GoogleTrendsClient::with_base_url(&mock_server.uri(), 100).unwrap();
    let result = client.fetch(&query(&["ChatGPT"])).await;

    assert!(matches!(result, Err(FetchError::RateLimited)));
}

/// Test server errors are surfaced without retry
#[tokio::test]
async fn test_server_error_no_retry() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(EXPLORE))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = GoogleTrendsClient::with_base_url(&mock_server.uri(), 100).unwrap();
    let result = client.fetch(&query(&["ChatGPT"])).await;

    assert!(matches!(result, Err(FetchError::ServerError(503))));
}

/// An empty timeline is an expected outcome, not an error
#[tokio::test]
async fn test_empty_timeline() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(EXPLORE))
        .respond_with(ResponseTemplate::new(200).set_body_string(explore_body("t")))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(MULTILINE))
        .respond_with(ResponseTemplate::new(200).set_body_string(multiline_body(&[])))
        .mount(&mock_server)
        .await;

    let client = GoogleTrendsClient::with_base_url(&mock_server.uri(), 100).unwrap();
    let result = client.fetch(&query(&["zzqxjv"])).await;

    assert_eq!(result.unwrap(), FetchOutcome::Empty);
}

/// Missing TIMESERIES widget
#[tokio::test]
async fn test_missing_widget() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(EXPLORE))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(")]}'\n{\"widgets\":[{\"id\":\"GEO_MAP\",\"token\":\"x\",\"request\":{}}]}"),
        )
        .mount(&mock_server)
        .await;

    let client = GoogleTrendsClient::with_base_url(&mock_server.uri(), 100).unwrap();
    let result = client.fetch(&query(&["ChatGPT"])).await;

    assert!(matches!(result, Err(FetchError::MissingWidget(_))));
}

/// Garbage instead of JSON
#[tokio::test]
async fn test_malformed_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(EXPLORE))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>captcha</html>"))
        .mount(&mock_server)
        .await;

    let client = GoogleTrendsClient::with_base_url(&mock_server.uri(), 100).unwrap();
    let result = client.fetch(&query(&["ChatGPT"])).await;

    assert!(matches!(result, Err(FetchError::Decode(_))));
}

/// Test request timeout
#[tokio::test]
async fn test_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(EXPLORE))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(explore_body("t"))
                .set_delay(std::time::Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let client = GoogleTrendsClient::from_config(&TrendsConfig {
        base_url: mock_server.uri(),
        request_timeout_secs: 1,
        requests_per_second: 100,
        ..TrendsConfig::default()
    })
    .unwrap();
    let result = client.fetch(&query(&["ChatGPT"])).await;

    assert!(matches!(result, Err(FetchError::Timeout)));
}

/// Custom host language and timezone are forwarded
#[tokio::test]
async fn test_custom_locale_parameters() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(EXPLORE))
        .and(query_param("hl", "ko-KR"))
        .and(query_param("tz", "-540"))
        .respond_with(ResponseTemplate::new(200).set_body_string(explore_body("t")))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(MULTILINE))
        .and(query_param("hl", "ko-KR"))
        .respond_with(ResponseTemplate::new(200).set_body_string(multiline_body(&[(1609632000, &[3][..])])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = GoogleTrendsClient::from_config(&TrendsConfig {
        base_url: mock_server.uri(),
        host_language: "ko-KR".to_string(),
        tz_offset_minutes: -540,
        requests_per_second: 100,
        ..TrendsConfig::default()
    })
    .unwrap();

    assert!(client.fetch(&query(&["ChatGPT"])).await.is_ok());
}

/// A base URL with a path prefix keeps the prefix on every request
#[tokio::test]
async fn test_base_url_path_prefix() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/proxy/trends/api/explore"))
        .respond_with(ResponseTemplate::new(200).set_body_string(explore_body("t")))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/proxy/trends/api/widgetdata/multiline"))
        .respond_with(ResponseTemplate::new(200).set_body_string(multiline_body(&[(1609632000, &[7][..])])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let base = format!("{}/proxy", mock_server.uri());
    let client = GoogleTrendsClient::with_base_url(&base, 100).unwrap();

    assert!(client.fetch(&query(&["ChatGPT"])).await.is_ok());

    let requests = mock_server.received_requests().await.unwrap();
    assert!(requests.iter().all(|r| r.url.path().starts_with("/proxy/")));
}

/// Every outbound request waits for the pacing limiter
#[tokio::test]
async fn test_each_request_is_paced() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(EXPLORE))
        .respond_with(ResponseTemplate::new(200).set_body_string(explore_body("t")))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(MULTILINE))
        .respond_with(ResponseTemplate::new(200).set_body_string(multiline_body(&[(1609632000, &[7][..])])))
        .mount(&mock_server)
        .await;

    // Warm-up, explore and multiline at one per second: two full waits
    let client = GoogleTrendsClient::with_base_url(&mock_server.uri(), 1).unwrap();
    let started = std::time::Instant::now();

    client.fetch(&query(&["ChatGPT"])).await.unwrap();

    assert!(started.elapsed() >= std::time::Duration::from_millis(1_900));
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 3);
}

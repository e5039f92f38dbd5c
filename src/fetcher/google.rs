//! Google Trends client with pacing and browser-like headers
//!
//! Interest-over-time data takes two requests:
//! - `explore` returns a set of widgets; the `TIMESERIES` widget carries a
//!   signed request object and a token
//! - `widgetdata/multiline` exchanges that request and token for the table
//!
//! Both responses begin with an anti-hijacking prefix (`)]}'`) that is
//! stripped before JSON parsing. A 429 from either step is reported as
//! [`FetchError::RateLimited`]; nothing is retried here.

use crate::config::TrendsConfig;
use crate::fetcher::{FetchOutcome, TrendSource};
use crate::models::{Query, TrendPoint, TrendSeries};
use crate::utils::error::FetchError;
use async_trait::async_trait;
use chrono::DateTime;
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use rand::seq::SliceRandom;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT},
    Client, StatusCode,
};
use serde::Deserialize;
use std::num::NonZeroU32;
use tokio::sync::OnceCell;
use url::Url;

/// Pool of realistic User-Agent strings for rotation
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.2 Safari/605.1.15",
];

const EXPLORE_PATH: &str = "trends/api/explore";
const MULTILINE_PATH: &str = "trends/api/widgetdata/multiline";
const COOKIE_PATH: &str = "trends/explore";
const TIMESERIES_WIDGET: &str = "TIMESERIES";

#[derive(Debug, Deserialize)]
struct ExploreResponse {
    #[serde(default)]
    widgets: Vec<Widget>,
}

#[derive(Debug, Deserialize)]
struct Widget {
    id: String,
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    request: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct MultilineResponse {
    #[serde(rename = "default", default)]
    data: MultilineData,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MultilineData {
    #[serde(default)]
    timeline_data: Vec<TimelineRow>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimelineRow {
    /// Unix seconds, sent as a string
    time: String,
    #[serde(default)]
    value: Vec<u32>,
    #[serde(default)]
    has_data: Vec<bool>,
    #[serde(default)]
    is_partial: bool,
}

/// Interest-over-time client for Google Trends
pub struct GoogleTrendsClient {
    /// HTTP client with configured timeout, compression and cookie jar
    client: Client,

    /// Paces outbound requests
    rate_limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,

    base_url: Url,

    /// `hl` parameter, also used for Accept-Language
    host_language: String,

    /// `tz` parameter in minutes
    tz_offset_minutes: i32,

    /// Set once the cookie warm-up request has been attempted
    cookies_ready: OnceCell<()>,
}

impl GoogleTrendsClient {
    /// Create a client with default settings
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Http` if the HTTP client cannot be created
    pub fn new() -> Result<Self, FetchError> {
        Self::from_config(&TrendsConfig::default())
    }

    /// Create a client from configuration
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Http` if the HTTP client cannot be created and
    /// `FetchError::InvalidUrl` if `base_url` does not parse
    pub fn from_config(config: &TrendsConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .gzip(true)
            .cookie_store(true)
            .build()?;

        let rate = NonZeroU32::new(config.requests_per_second).unwrap_or(NonZeroU32::MIN);
        let rate_limiter = RateLimiter::direct(Quota::per_second(rate));

        Ok(Self {
            client,
            rate_limiter,
            base_url: parse_base_url(&config.base_url)?,
            host_language: config.host_language.clone(),
            tz_offset_minutes: config.tz_offset_minutes,
            cookies_ready: OnceCell::new(),
        })
    }

    /// Create a client pointed at a custom base URL, for mock servers
    ///
    /// # Errors
    ///
    /// Same as [`GoogleTrendsClient::from_config`]
    pub fn with_base_url(base_url: &str, requests_per_second: u32) -> Result<Self, FetchError> {
        Self::from_config(&TrendsConfig {
            base_url: base_url.to_string(),
            requests_per_second,
            ..TrendsConfig::default()
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Visit the explore page once so the cookie jar holds a session cookie
    ///
    /// Best effort: failures are logged and otherwise ignored.
    async fn warm_up_cookies(&self) {
        self.cookies_ready
            .get_or_init(|| async {
                let url = match self.base_url.join(COOKIE_PATH) {
                    Ok(url) => url,
                    Err(e) => {
                        tracing::debug!(error = %e, "Skipping cookie warm-up");
                        return;
                    }
                };

                self.rate_limiter.until_ready().await;

                match self.client.get(url).headers(self.build_headers()).send().await {
                    Ok(response) => tracing::debug!(
                        status = response.status().as_u16(),
                        "Cookie warm-up finished"
                    ),
                    Err(e) => tracing::debug!(error = %e, "Cookie warm-up failed"),
                }
            })
            .await;
    }

    /// Step one: obtain the TIMESERIES widget request and token
    async fn explore(&self, query: &Query) -> Result<(serde_json::Value, String), FetchError> {
        let payload = explore_payload(query);
        let body = self
            .get_text(EXPLORE_PATH, &[("req", serde_json::to_string(&payload)?)])
            .await?;

        parse_explore(&body)
    }

    /// Step two: download the interest-over-time table
    async fn multiline(&self, request: &serde_json::Value, token: &str) -> Result<String, FetchError> {
        self.get_text(
            MULTILINE_PATH,
            &[
                ("req", serde_json::to_string(request)?),
                ("token", token.to_string()),
            ],
        )
        .await
    }

    /// GET `path` with the common `hl`/`tz` parameters plus `params`
    async fn get_text(&self, path: &str, params: &[(&str, String)]) -> Result<String, FetchError> {
        let url = self.base_url.join(path)?;

        self.rate_limiter.until_ready().await;

        let response = self
            .client
            .get(url)
            .headers(self.build_headers())
            .query(&[
                ("hl", self.host_language.clone()),
                ("tz", self.tz_offset_minutes.to_string()),
            ])
            .query(params)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(FetchError::RateLimited);
        }
        if !status.is_success() {
            return Err(FetchError::ServerError(status.as_u16()));
        }

        response.text().await.map_err(classify_transport_error)
    }

    /// Build HTTP headers for a trends request
    fn build_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();

        headers.insert(USER_AGENT, HeaderValue::from_static(self.random_user_agent()));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/json, text/plain, */*"),
        );

        if let Ok(language) = HeaderValue::from_str(&self.host_language) {
            headers.insert(ACCEPT_LANGUAGE, language);
        }

        headers
    }

    /// Get a random user agent from the pool
    fn random_user_agent(&self) -> &'static str {
        let mut rng = rand::thread_rng();
        USER_AGENTS.choose(&mut rng).unwrap_or(&USER_AGENTS[0])
    }
}

#[async_trait]
impl TrendSource for GoogleTrendsClient {
    fn name(&self) -> &str {
        "google-trends"
    }

    async fn fetch(&self, query: &Query) -> Result<FetchOutcome, FetchError> {
        self.warm_up_cookies().await;

        tracing::debug!(
            keywords = ?query.keywords,
            geo = %query.region_code,
            timeframe = %query.range.as_timeframe(),
            "Requesting interest over time"
        );

        let (widget_request, token) = self.explore(query).await?;
        let body = self.multiline(&widget_request, &token).await?;
        let outcome = parse_multiline(&body, &query.keywords)?;

        if let FetchOutcome::Series(series) = &outcome {
            tracing::debug!(rows = series.len(), "Interest over time received");
        }

        Ok(outcome)
    }
}

/// Parse a base URL so relative joins keep its path
///
/// `http://host/proxy` becomes `http://host/proxy/`.
fn parse_base_url(base_url: &str) -> Result<Url, FetchError> {
    if base_url.ends_with('/') {
        Ok(Url::parse(base_url)?)
    } else {
        Ok(Url::parse(&format!("{base_url}/"))?)
    }
}

fn classify_transport_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Http(err)
    }
}

/// The `req` object of an explore call
fn explore_payload(query: &Query) -> serde_json::Value {
    let timeframe = query.range.as_timeframe();
    let items: Vec<_> = query
        .keywords
        .iter()
        .map(|keyword| {
            serde_json::json!({
                "keyword": keyword,
                "time": timeframe,
                "geo": query.region_code,
            })
        })
        .collect();

    serde_json::json!({
        "comparisonItem": items,
        "category": 0,
        "property": "",
    })
}

/// Drop everything before the first `{`
fn strip_json_prefix(body: &str) -> Result<&str, FetchError> {
    body.find('{')
        .map(|start| &body[start..])
        .ok_or_else(|| FetchError::Decode("response body contains no JSON object".to_string()))
}

fn parse_explore(body: &str) -> Result<(serde_json::Value, String), FetchError> {
    let explore: ExploreResponse = serde_json::from_str(strip_json_prefix(body)?)?;

    let widget = explore
        .widgets
        .into_iter()
        .find(|w| w.id == TIMESERIES_WIDGET)
        .ok_or_else(|| FetchError::MissingWidget(TIMESERIES_WIDGET.to_string()))?;

    let token = widget
        .token
        .ok_or_else(|| FetchError::Decode("TIMESERIES widget has no token".to_string()))?;
    let request = widget
        .request
        .ok_or_else(|| FetchError::Decode("TIMESERIES widget has no request".to_string()))?;

    Ok((request, token))
}

fn parse_multiline(body: &str, keywords: &[String]) -> Result<FetchOutcome, FetchError> {
    let response: MultilineResponse = serde_json::from_str(strip_json_prefix(body)?)?;

    let mut points = Vec::with_capacity(response.data.timeline_data.len());
    for row in response.data.timeline_data {
        let secs: i64 = row
            .time
            .parse()
            .map_err(|_| FetchError::Decode(format!("invalid timestamp: {}", row.time)))?;
        let date = DateTime::from_timestamp(secs, 0)
            .ok_or_else(|| FetchError::Decode(format!("timestamp out of range: {secs}")))?
            .date_naive();

        let values = (0..keywords.len())
            .map(|i| {
                let has_data = row.has_data.get(i).copied().unwrap_or(true);
                row.value
                    .get(i)
                    .filter(|_| has_data)
                    .map(|&v| v.min(100) as u8)
            })
            .collect();

        points.push(TrendPoint {
            date,
            values,
            is_partial: row.is_partial,
        });
    }

    Ok(FetchOutcome::from_series(TrendSeries::new(
        keywords.to_vec(),
        points,
    )))
}

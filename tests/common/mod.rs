//! Common test utilities

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use trends_explorer::fetcher::{FetchOutcome, TrendSource};
use trends_explorer::models::{Query, TrendPoint, TrendSeries};
use trends_explorer::utils::error::FetchError;

/// What a [`ScriptedSource`] answers with
pub enum Scripted {
    Series(TrendSeries),
    Empty,
    RateLimited,
    ServerError(u16),
}

/// Trend source that returns a canned answer and records every query
pub struct ScriptedSource {
    answer: Scripted,
    calls: AtomicUsize,
    queries: Mutex<Vec<Query>>,
}

impl ScriptedSource {
    pub fn new(answer: Scripted) -> Self {
        Self {
            answer,
            calls: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_query(&self) -> Option<Query> {
        self.queries.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl TrendSource for ScriptedSource {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn fetch(&self, query: &Query) -> Result<FetchOutcome, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.clone());

        match &self.answer {
            Scripted::Series(series) => Ok(FetchOutcome::Series(series.clone())),
            Scripted::Empty => Ok(FetchOutcome::Empty),
            Scripted::RateLimited => Err(FetchError::RateLimited),
            Scripted::ServerError(status) => Err(FetchError::ServerError(*status)),
        }
    }
}

/// First Sunday of 2021, where weekly buckets start
pub fn first_week() -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, 1, 3).unwrap()
}

/// Weekly series with one column per keyword
pub fn weekly_series(keywords: &[&str], columns: &[&[u8]]) -> TrendSeries {
    let rows = columns.iter().map(|c| c.len()).max().unwrap_or(0);

    let points = (0..rows)
        .map(|i| TrendPoint {
            date: first_week() + Duration::weeks(i as i64),
            values: columns.iter().map(|c| c.get(i).copied()).collect(),
            is_partial: false,
        })
        .collect();

    TrendSeries::new(keywords.iter().map(|k| k.to_string()).collect(), points)
}

/// Body of an explore response with a TIMESERIES widget
pub fn explore_body(token: &str) -> String {
    format!(
        r#")]}}'
{{"widgets":[
  {{"id":"TIMESERIES","token":"{token}","request":{{"time":"2021-01-01 2025-12-31","resolution":"WEEK"}},"title":"Interest over time"}},
  {{"id":"GEO_MAP","token":"geo","request":{{}}}}
]}}"#
    )
}

/// Body of a multiline response; `rows` are `(unix_seconds, values)`
pub fn multiline_body(rows: &[(i64, &[u32])]) -> String {
    let timeline: Vec<String> = rows
        .iter()
        .map(|(time, values)| {
            let values: Vec<String> = values.iter().map(u32::to_string).collect();
            let has_data: Vec<&str> = values.iter().map(|_| "true").collect();
            format!(
                r#"{{"time":"{time}","value":[{}],"hasData":[{}]}}"#,
                values.join(","),
                has_data.join(",")
            )
        })
        .collect();

    format!(
        ")]}}',\n{{\"default\":{{\"timelineData\":[{}],\"averages\":[]}}}}",
        timeline.join(",")
    )
}

//! Query gate: input validation and cooldown enforcement
//!
//! Every outbound trends request passes through here first:
//!
//! 1. [`QueryGate::prepare`] turns raw user input into a [`Query`]
//!    (trimmed keywords, resolved region code, whole-year time range).
//! 2. [`QueryGate::admit`] checks the session's [`CooldownState`] and
//!    either lets the request through, stamping the state, or reports
//!    how long the caller still has to wait.
//!
//! The cooldown state is plain data owned by the caller. Tests drive it
//! with hand-made [`Instant`]s instead of a real clock.

pub mod regions;

use crate::config::GateConfig;
use crate::models::{ExploreRequest, Query, TimeRange};
use crate::utils::error::QueryError;
use crate::utils::{normalize_whitespace, seconds_ceil_tenth};
use serde::Serialize;
use std::collections::HashSet;
use std::time::{Duration, Instant};

/// Minimum spacing between outbound requests
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(10);

/// The data source compares at most this many keywords in one request
pub const DEFAULT_MAX_KEYWORDS: usize = 5;

pub const MIN_YEARS_BACK: u32 = 1;
pub const MAX_YEARS_BACK: u32 = 10;

/// Outcome of a cooldown check
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Admission {
    /// The request may go out; the cooldown window restarted
    Allowed,

    /// Too soon; retry after `wait_seconds`, rounded up to one decimal
    Rejected { wait_seconds: f64 },
}

impl Admission {
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }
}

/// Session-scoped record of the last admitted request
#[derive(Debug, Clone)]
pub struct CooldownState {
    last_request: Option<Instant>,
    min_interval: Duration,
}

impl CooldownState {
    /// Fresh state with no prior request
    #[must_use]
    pub fn new(min_interval: Duration) -> Self {
        Self {
            last_request: None,
            min_interval,
        }
    }

    #[must_use]
    pub fn last_request(&self) -> Option<Instant> {
        self.last_request
    }

    #[must_use]
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Time left before the next request may go out, if any
    #[must_use]
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        let last = self.last_request?;
        let elapsed = now.saturating_duration_since(last);

        if elapsed < self.min_interval {
            Some(self.min_interval - elapsed)
        } else {
            None
        }
    }

    /// Decide and record in one step
    ///
    /// On [`Admission::Allowed`] the last-request timestamp becomes `now`.
    /// A rejection leaves the state untouched.
    pub fn admit(&mut self, now: Instant) -> Admission {
        match self.remaining(now) {
            Some(wait) => Admission::Rejected {
                wait_seconds: seconds_ceil_tenth(wait),
            },
            None => {
                self.last_request = Some(now);
                Admission::Allowed
            }
        }
    }
}

impl Default for CooldownState {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN)
    }
}

/// Split a comma-separated keyword box into keywords
///
/// Entries are trimmed, inner whitespace collapses to one space, and
/// empty entries are dropped.
pub fn parse_keywords(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(normalize_whitespace)
        .filter(|kw| !kw.is_empty())
        .collect()
}

/// Validates requests and applies the cooldown
#[derive(Debug, Clone)]
pub struct QueryGate {
    max_keywords: usize,
}

impl QueryGate {
    #[must_use]
    pub fn new(max_keywords: usize) -> Self {
        Self { max_keywords }
    }

    #[must_use]
    pub fn from_config(config: &GateConfig) -> Self {
        Self::new(config.max_keywords)
    }

    #[must_use]
    pub fn max_keywords(&self) -> usize {
        self.max_keywords
    }

    /// Validate and normalize a request into a [`Query`]
    ///
    /// # Errors
    ///
    /// Returns a [`QueryError`] describing the first problem found, checked
    /// in the order keywords, region, years back.
    pub fn prepare(&self, request: &ExploreRequest, current_year: i32) -> Result<Query, QueryError> {
        let keywords = self.normalize_keywords(&request.keywords)?;

        let region_code = regions::resolve(&request.region)
            .ok_or_else(|| QueryError::UnknownRegion(request.region.trim().to_string()))?;

        if !(MIN_YEARS_BACK..=MAX_YEARS_BACK).contains(&request.years_back) {
            return Err(QueryError::YearsBackOutOfRange {
                given: request.years_back,
                min: MIN_YEARS_BACK,
                max: MAX_YEARS_BACK,
            });
        }

        Ok(Query {
            keywords,
            region_code,
            range: TimeRange::years_back(request.years_back, current_year),
        })
    }

    /// Cooldown check for a prepared query
    pub fn admit(&self, query: &Query, state: &mut CooldownState, now: Instant) -> Admission {
        let admission = state.admit(now);

        match admission {
            Admission::Allowed => tracing::debug!(
                keywords = ?query.keywords,
                region = %query.region_code,
                "Query admitted"
            ),
            Admission::Rejected { wait_seconds } => tracing::debug!(
                keywords = ?query.keywords,
                wait_seconds,
                "Query rejected by cooldown"
            ),
        }

        admission
    }

    fn normalize_keywords(&self, raw: &[String]) -> Result<Vec<String>, QueryError> {
        let keywords: Vec<String> = raw
            .iter()
            .map(|kw| normalize_whitespace(kw))
            .filter(|kw| !kw.is_empty())
            .collect();

        if keywords.is_empty() {
            return Err(QueryError::NoKeywords);
        }

        if keywords.len() > self.max_keywords {
            return Err(QueryError::TooManyKeywords {
                given: keywords.len(),
                max: self.max_keywords,
            });
        }

        let mut seen = HashSet::with_capacity(keywords.len());
        for kw in &keywords {
            if !seen.insert(kw.to_lowercase()) {
                return Err(QueryError::DuplicateKeyword(kw.clone()));
            }
        }

        Ok(keywords)
    }
}

impl Default for QueryGate {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_KEYWORDS)
    }
}

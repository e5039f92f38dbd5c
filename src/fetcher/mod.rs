//! Trend fetching
//!
//! [`TrendSource`] is the capability the session talks to. The production
//! implementation is [`google::GoogleTrendsClient`]; tests substitute their
//! own sources so the gate and calculator run without network access.

pub mod google;

use crate::models::{Query, TrendSeries};
use crate::utils::error::FetchError;
use async_trait::async_trait;

pub use google::GoogleTrendsClient;

/// Successful outcome of a fetch
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// Interest-over-time table with at least one observed value
    Series(TrendSeries),

    /// The source had nothing for these keywords, region and range
    Empty,
}

impl FetchOutcome {
    /// Wrap a series, downgrading it to [`FetchOutcome::Empty`] when it
    /// carries no observed values
    #[must_use]
    pub fn from_series(series: TrendSeries) -> Self {
        if series.has_data() {
            Self::Series(series)
        } else {
            Self::Empty
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Source of interest-over-time data
#[async_trait]
pub trait TrendSource: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Issue the single outbound request for `query`
    ///
    /// # Errors
    ///
    /// [`FetchError::RateLimited`] when the source throttles us, any other
    /// variant for transport, status or decoding failures.
    async fn fetch(&self, query: &Query) -> Result<FetchOutcome, FetchError>;
}

//! Per-keyword statistics and cross-keyword ranking
//!
//! Given an interest-over-time table this module derives, for every
//! keyword column:
//! - peak value and the date it was first reached
//! - minimum, mean and most recent value
//! - a trend label comparing the last window of observations with the
//!   window before it
//!
//! Missing values are skipped; statistics are computed over observed
//! values only.

use crate::models::{KeywordSummary, RankedKeyword, Ranking, Summary, TrendLabel, TrendSeries};
use crate::utils::mean;
use chrono::NaiveDate;

/// Default number of observations in each comparison window
pub const DEFAULT_TREND_WINDOW: usize = 6;

/// Recent mean must exceed the previous mean by this factor for `Up`
pub const UP_RATIO: f64 = 1.1;

/// Recent mean must fall below the previous mean by this factor for `Down`
pub const DOWN_RATIO: f64 = 0.9;

/// Derives [`Summary`] values from a [`TrendSeries`]
#[derive(Debug, Clone)]
pub struct SummaryCalculator {
    /// Observations per comparison window
    window: usize,
}

impl SummaryCalculator {
    /// Create a calculator
    ///
    /// # Arguments
    /// * `window` - Observations per trend window (default: 6, minimum 1)
    #[must_use]
    pub fn new(window: Option<usize>) -> Self {
        Self {
            window: window.unwrap_or(DEFAULT_TREND_WINDOW).max(1),
        }
    }

    #[must_use]
    pub fn window(&self) -> usize {
        self.window
    }

    /// Observations needed before a trend label other than
    /// `InsufficientData` is produced
    #[must_use]
    pub fn min_observations(&self) -> usize {
        self.window * 2
    }

    /// Summarize every keyword column of `series`
    pub fn summarize(&self, series: &TrendSeries) -> Summary {
        let mut keywords = Vec::with_capacity(series.keywords.len());
        let mut without_data = Vec::new();

        for (column, keyword) in series.keywords.iter().enumerate() {
            let observations: Vec<_> = series.observations(column).collect();

            match self.summarize_keyword(keyword, &observations) {
                Some(summary) => keywords.push(summary),
                None => without_data.push(keyword.clone()),
            }
        }

        let ranking = rank(&keywords);

        Summary {
            keywords,
            ranking,
            without_data,
        }
    }

    /// Statistics for one keyword, `None` when it has no observations
    pub fn summarize_keyword(
        &self,
        keyword: &str,
        observations: &[(NaiveDate, u8)],
    ) -> Option<KeywordSummary> {
        let (first_date, first_value) = *observations.first()?;

        let mut peak = first_value;
        let mut peak_date = first_date;
        let mut min = first_value;

        for &(date, value) in &observations[1..] {
            if value > peak {
                peak = value;
                peak_date = date;
            }
            min = min.min(value);
        }

        let values: Vec<u8> = observations.iter().map(|&(_, v)| v).collect();
        let as_f64: Vec<f64> = values.iter().map(|&v| f64::from(v)).collect();
        let average = mean(&as_f64)?;
        let latest = *values.last()?;

        Some(KeywordSummary {
            keyword: keyword.to_string(),
            peak,
            peak_date,
            min,
            average,
            latest,
            observations: values.len(),
            trend: self.trend_label(&values),
        })
    }

    /// Compare the last window of values with the window before it
    ///
    /// # Classification
    /// - `recent > previous * 1.1`: Up
    /// - `recent < previous * 0.9`: Down
    /// - otherwise: Stable
    /// - fewer than two full windows: InsufficientData
    #[must_use]
    pub fn trend_label(&self, values: &[u8]) -> TrendLabel {
        match self.window_means(values) {
            Some((recent, previous)) => classify(recent, previous),
            None => TrendLabel::InsufficientData,
        }
    }

    /// `(recent_avg, previous_avg)` over the trailing two windows
    #[must_use]
    pub fn window_means(&self, values: &[u8]) -> Option<(f64, f64)> {
        if values.len() < self.min_observations() {
            return None;
        }

        let split = values.len() - self.window;
        let recent: Vec<f64> = values[split..].iter().map(|&v| f64::from(v)).collect();
        let previous: Vec<f64> = values[split - self.window..split]
            .iter()
            .map(|&v| f64::from(v))
            .collect();

        Some((mean(&recent)?, mean(&previous)?))
    }
}

impl Default for SummaryCalculator {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Classify momentum from two window means
#[must_use]
pub fn classify(recent_avg: f64, previous_avg: f64) -> TrendLabel {
    if recent_avg > previous_avg * UP_RATIO {
        TrendLabel::Up
    } else if recent_avg < previous_avg * DOWN_RATIO {
        TrendLabel::Down
    } else {
        TrendLabel::Stable
    }
}

/// Most and least popular keyword by average
///
/// Returns `None` for fewer than two summaries. Ties go to the keyword
/// that appears first.
#[must_use]
pub fn rank(summaries: &[KeywordSummary]) -> Option<Ranking> {
    let averages: Vec<(&str, f64)> = summaries
        .iter()
        .map(|s| (s.keyword.as_str(), s.average))
        .collect();

    rank_averages(&averages)
}

/// Ranking over plain `(keyword, average)` pairs, in input order
#[must_use]
pub fn rank_averages(averages: &[(&str, f64)]) -> Option<Ranking> {
    if averages.len() < 2 {
        return None;
    }

    let mut most = averages[0];
    let mut least = averages[0];

    for &entry in &averages[1..] {
        if entry.1 > most.1 {
            most = entry;
        }
        if entry.1 < least.1 {
            least = entry;
        }
    }

    Some(Ranking {
        most_popular: RankedKeyword {
            keyword: most.0.to_string(),
            average: most.1,
        },
        least_popular: RankedKeyword {
            keyword: least.0.to_string(),
            average: least.1,
        },
    })
}

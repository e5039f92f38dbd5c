// Core data structures for the trends explorer

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Raw user input for one exploration, before validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExploreRequest {
    /// Keywords as typed; trimmed and checked by the gate
    pub keywords: Vec<String>,

    /// Region display name ("Worldwide", "Japan") or two-letter code
    pub region: String,

    /// How many past years to cover
    pub years_back: u32,
}

impl ExploreRequest {
    /// Create a request from already-split keywords
    pub fn new<I, S>(keywords: I, region: impl Into<String>, years_back: u32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keywords: keywords.into_iter().map(Into::into).collect(),
            region: region.into(),
            years_back,
        }
    }
}

impl Default for ExploreRequest {
    fn default() -> Self {
        Self::new(["ChatGPT", "AI jobs", "AI art"], "Worldwide", 5)
    }
}

/// Inclusive range of whole calendar years
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start_year: i32,
    pub end_year: i32,
}

impl TimeRange {
    /// Range ending with the last complete year before `current_year`
    ///
    /// `years_back` is not validated here; the gate does that.
    #[must_use]
    pub fn years_back(years_back: u32, current_year: i32) -> Self {
        Self {
            start_year: current_year - years_back as i32,
            end_year: current_year - 1,
        }
    }

    /// Number of calendar years covered
    #[must_use]
    pub fn span_years(&self) -> i32 {
        self.end_year - self.start_year + 1
    }

    /// Upstream timeframe string, e.g. `"2021-01-01 2025-12-31"`
    #[must_use]
    pub fn as_timeframe(&self) -> String {
        format!("{}-01-01 {}-12-31", self.start_year, self.end_year)
    }
}

/// A validated, normalized query ready to be sent upstream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    /// Keywords in input order, trimmed and non-empty
    pub keywords: Vec<String>,

    /// Two-letter region code; empty means worldwide
    pub region_code: String,

    pub range: TimeRange,
}

impl Query {
    /// Whether the query covers the whole world
    #[must_use]
    pub fn is_worldwide(&self) -> bool {
        self.region_code.is_empty()
    }
}

/// One row of an interest-over-time table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: NaiveDate,

    /// One value per keyword column; `None` when the source had no data
    pub values: Vec<Option<u8>>,

    /// The source marks the most recent bucket as partial
    #[serde(default)]
    pub is_partial: bool,
}

/// Interest-over-time table for a set of keywords
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendSeries {
    /// Column names, in query order
    pub keywords: Vec<String>,

    /// Rows in chronological order
    pub points: Vec<TrendPoint>,
}

impl TrendSeries {
    #[must_use]
    pub fn new(keywords: Vec<String>, points: Vec<TrendPoint>) -> Self {
        Self { keywords, points }
    }

    /// Number of rows
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether any keyword has at least one observed value
    #[must_use]
    pub fn has_data(&self) -> bool {
        self.points
            .iter()
            .any(|point| point.values.iter().any(Option::is_some))
    }

    /// Observed `(date, value)` pairs for one keyword column, skipping gaps
    pub fn observations(&self, column: usize) -> impl Iterator<Item = (NaiveDate, u8)> + '_ {
        self.points
            .iter()
            .filter_map(move |point| point.values.get(column).copied().flatten().map(|v| (point.date, v)))
    }

    /// The last `n` rows
    #[must_use]
    pub fn tail(&self, n: usize) -> &[TrendPoint] {
        let start = self.points.len().saturating_sub(n);
        &self.points[start..]
    }
}

/// Coarse classification of recent momentum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrendLabel {
    Up,
    Down,
    Stable,
    /// Fewer observations than the comparison windows need
    InsufficientData,
}

impl TrendLabel {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "UP",
            Self::Down => "DOWN",
            Self::Stable => "STABLE",
            Self::InsufficientData => "INSUFFICIENT_DATA",
        }
    }
}

impl std::fmt::Display for TrendLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derived statistics for one keyword
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordSummary {
    pub keyword: String,
    pub peak: u8,
    /// Date of the first occurrence of `peak`
    pub peak_date: NaiveDate,
    pub min: u8,
    pub average: f64,
    /// Last observed value
    pub latest: u8,
    /// Number of observed (non-missing) values
    pub observations: usize,
    pub trend: TrendLabel,
}

/// A keyword and its average interest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedKeyword {
    pub keyword: String,
    pub average: f64,
}

/// Most and least popular keyword by average interest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    pub most_popular: RankedKeyword,
    pub least_popular: RankedKeyword,
}

/// Everything the calculator derives from a series
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Per-keyword statistics, in query order
    pub keywords: Vec<KeywordSummary>,

    /// Present only when at least two keywords have data
    pub ranking: Option<Ranking>,

    /// Keywords the source returned no values for
    pub without_data: Vec<String>,
}

impl Summary {
    /// Look up the summary of one keyword
    #[must_use]
    pub fn get(&self, keyword: &str) -> Option<&KeywordSummary> {
        self.keywords.iter().find(|s| s.keyword == keyword)
    }
}

/// The result of one successful exploration, handed to a renderer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub query: Query,
    pub series: TrendSeries,
    pub summary: Summary,
    pub fetched_at: DateTime<Utc>,
}

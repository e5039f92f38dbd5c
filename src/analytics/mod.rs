//! Analytics over fetched interest-over-time tables

pub mod summary;

pub use summary::{classify, rank, rank_averages, SummaryCalculator, DEFAULT_TREND_WINDOW};

//! trends_explorer - Search interest explorer core
//!
//! Takes keywords, a region and a number of past years, fetches
//! interest-over-time data from a trends source, and derives per-keyword
//! statistics for a dashboard to display.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`gate`] - Input validation and the per-session request cooldown
//! - [`fetcher`] - The trends source capability and its Google Trends client
//! - [`analytics`] - Peak, average, trend label and keyword ranking
//! - [`session`] - One user's gate → fetch → summarize pipeline
//! - [`render`] - Presentation boundary and Markdown reports
//! - [`models`] - Core data structures and types
//! - [`config`] - Configuration management and settings
//! - [`error`] - Unified error type with localized guidance
//!
//! # Example
//!
//! ```no_run
//! use trends_explorer::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> trends_explorer::error::Result<()> {
//!     let config = Config::from_env()?;
//!     let mut session = ExplorerSession::google(&config)?;
//!     let mut renderer = MarkdownRenderer::new(std::io::stdout())?;
//!
//!     let request = ExploreRequest::new(parse_keywords("ChatGPT, AI jobs"), "Nigeria", 5);
//!     let _ = session.explore_and_render(&request, &mut renderer).await;
//!     Ok(())
//! }
//! ```

// Initialize rust-i18n at crate root level
rust_i18n::i18n!("locales", fallback = "en");

pub mod analytics;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod gate;
pub mod i18n;
pub mod logging;
pub mod models;
pub mod render;
pub mod session;
pub mod utils;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::analytics::SummaryCalculator;
    pub use crate::config::Config;
    pub use crate::error::{Error, ErrorCategory, ExplorerErrorTrait, Result};
    pub use crate::fetcher::{FetchOutcome, GoogleTrendsClient, TrendSource};
    pub use crate::gate::{parse_keywords, Admission, CooldownState, QueryGate};
    pub use crate::models::{ExploreRequest, KeywordSummary, Query, Report, Summary, TrendLabel, TrendSeries};
    pub use crate::render::{MarkdownRenderer, Renderer};
    pub use crate::session::ExplorerSession;
}

// Direct re-exports for convenience
pub use models::{KeywordSummary, Query, Report, TrendLabel, TrendSeries};

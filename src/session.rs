//! One user session: gate, fetch, summarize
//!
//! ```text
//! ExploreRequest ──▶ QueryGate::prepare ──▶ CooldownState::admit ──▶ TrendSource::fetch
//!                                                                         │
//!                     Renderer ◀── Report ◀── SummaryCalculator ◀─────────┘
//! ```
//!
//! A session owns its cooldown state; sessions never share one. `explore`
//! takes `&mut self`, so one session handles one request at a time.
//!
//! # Example
//!
//! ```no_run
//! use trends_explorer::config::Config;
//! use trends_explorer::models::ExploreRequest;
//! use trends_explorer::session::ExplorerSession;
//!
//! # async fn example() -> trends_explorer::error::Result<()> {
//! let mut session = ExplorerSession::google(&Config::default())?;
//! let report = session.explore(&ExploreRequest::default()).await?;
//! println!("{} rows", report.series.len());
//! # Ok(())
//! # }
//! ```

use chrono::{Datelike, Local, Utc};
use std::time::Instant;

use crate::analytics::SummaryCalculator;
use crate::config::Config;
use crate::error::{Error, ExplorerErrorTrait, Result};
use crate::fetcher::{FetchOutcome, GoogleTrendsClient, TrendSource};
use crate::gate::{Admission, CooldownState, QueryGate};
use crate::models::{ExploreRequest, Report};
use crate::render::Renderer;

/// Explorer state for a single user
pub struct ExplorerSession<S: TrendSource> {
    source: S,
    gate: QueryGate,
    cooldown: CooldownState,
    calculator: SummaryCalculator,
}

impl ExplorerSession<GoogleTrendsClient> {
    /// Session backed by Google Trends, configured from `config`
    pub fn google(config: &Config) -> Result<Self> {
        config.validate()?;
        let client = GoogleTrendsClient::from_config(&config.trends)?;
        Ok(Self::from_config(client, config))
    }
}

impl<S: TrendSource> ExplorerSession<S> {
    /// Session with default gate settings (10 s cooldown, 5 keywords)
    pub fn new(source: S) -> Self {
        Self::with_parts(source, QueryGate::default(), CooldownState::default())
    }

    /// Session with gate settings from configuration
    pub fn from_config(source: S, config: &Config) -> Self {
        Self::with_parts(
            source,
            QueryGate::from_config(&config.gate),
            CooldownState::new(config.cooldown()),
        )
    }

    pub fn with_parts(source: S, gate: QueryGate, cooldown: CooldownState) -> Self {
        Self {
            source,
            gate,
            cooldown,
            calculator: SummaryCalculator::default(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn cooldown(&self) -> &CooldownState {
        &self.cooldown
    }

    /// Run one exploration against the wall clock
    pub async fn explore(&mut self, request: &ExploreRequest) -> Result<Report> {
        self.explore_at(request, Instant::now(), Local::now().year()).await
    }

    /// Run one exploration at an explicit instant and calendar year
    ///
    /// Invalid input is rejected before the cooldown is consulted, so it
    /// does not use up the window. An empty upstream result is reported as
    /// [`Error::EmptyResult`] without summarizing anything.
    pub async fn explore_at(
        &mut self,
        request: &ExploreRequest,
        now: Instant,
        current_year: i32,
    ) -> Result<Report> {
        let query = self.gate.prepare(request, current_year)?;

        if let Admission::Rejected { wait_seconds } = self.gate.admit(&query, &mut self.cooldown, now) {
            tracing::warn!(wait_seconds, "Request rejected: cooldown active");
            return Err(Error::CooldownActive { wait_seconds });
        }

        tracing::info!(
            source = self.source.name(),
            keywords = ?query.keywords,
            region = %query.region_code,
            timeframe = %query.range.as_timeframe(),
            "Fetching interest over time"
        );

        let series = match self.source.fetch(&query).await {
            Ok(FetchOutcome::Series(series)) => series,
            Ok(FetchOutcome::Empty) => {
                tracing::info!(keywords = ?query.keywords, "Source returned no data");
                return Err(Error::EmptyResult);
            }
            Err(e) => {
                let err = Error::from(e);
                if matches!(err, Error::RateLimited) {
                    tracing::warn!("Trends source is rate limiting; back off for several minutes");
                } else {
                    tracing::warn!(error = %err, "Fetch failed");
                }
                return Err(err);
            }
        };

        let summary = self.calculator.summarize(&series);

        tracing::info!(
            rows = series.len(),
            summarized = summary.keywords.len(),
            without_data = summary.without_data.len(),
            "Exploration complete"
        );

        Ok(Report {
            query,
            series,
            summary,
            fetched_at: Utc::now(),
        })
    }

    /// Explore and hand the outcome to `renderer`
    ///
    /// The exploration error, if any, is returned after it has been
    /// rendered. A renderer failure on the success path becomes
    /// [`Error::Render`].
    pub async fn explore_and_render<R: Renderer>(
        &mut self,
        request: &ExploreRequest,
        renderer: &mut R,
    ) -> Result<Report> {
        match self.explore(request).await {
            Ok(report) => {
                renderer.render_report(&report)?;
                Ok(report)
            }
            Err(err) => {
                if let Err(render_err) = renderer.render_failure(&err) {
                    tracing::warn!(
                        error = %render_err,
                        category = ?err.category(),
                        "Failed to render failure notice"
                    );
                }
                Err(err)
            }
        }
    }
}

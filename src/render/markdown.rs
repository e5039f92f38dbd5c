//! Markdown reports with Handlebars template engine
//!
//! This module renders a [`Report`] (query header, per-keyword summary
//! table, ranking, latest rows) or a failure notice to Markdown and writes
//! it to any [`Write`] sink.

use handlebars::Handlebars;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

use crate::error::{Error, ExplorerErrorTrait};
use crate::gate::regions;
use crate::models::Report;
use crate::render::{RenderError, Renderer};

/// Default report template
const DEFAULT_REPORT_TEMPLATE: &str = include_str!("../../templates/report.hbs");

/// Default failure template
const DEFAULT_FAILURE_TEMPLATE: &str = include_str!("../../templates/failure.hbs");

/// Rows of raw data shown under the summary
const RECENT_ROWS: usize = 5;

/// Template data for a report
#[derive(Debug, Serialize)]
struct ReportTemplateData {
    title: String,
    region: String,
    timeframe: String,
    fetched_at: String,
    rows: Vec<SummaryRow>,
    ranking: Option<RankingData>,
    without_data: Vec<String>,
    columns: Vec<String>,
    recent: Vec<RecentRow>,
}

#[derive(Debug, Serialize)]
struct SummaryRow {
    keyword: String,
    peak: u8,
    peak_date: String,
    min: u8,
    average: String,
    latest: u8,
    trend: String,
}

#[derive(Debug, Serialize)]
struct RankingData {
    most: String,
    most_average: String,
    least: String,
    least_average: String,
}

#[derive(Debug, Serialize)]
struct RecentRow {
    date: String,
    cells: Vec<String>,
}

#[derive(Debug, Serialize)]
struct FailureTemplateData {
    category: String,
    message: String,
    guidance: Option<String>,
}

impl From<&Report> for ReportTemplateData {
    fn from(report: &Report) -> Self {
        let query = &report.query;

        let region = regions::name_for_code(&query.region_code)
            .map(str::to_string)
            .unwrap_or_else(|| query.region_code.clone());

        let rows = report
            .summary
            .keywords
            .iter()
            .map(|s| SummaryRow {
                keyword: s.keyword.clone(),
                peak: s.peak,
                peak_date: s.peak_date.format("%Y-%m-%d").to_string(),
                min: s.min,
                average: format!("{:.1}", s.average),
                latest: s.latest,
                trend: s.trend.to_string(),
            })
            .collect();

        let ranking = report.summary.ranking.as_ref().map(|r| RankingData {
            most: r.most_popular.keyword.clone(),
            most_average: format!("{:.1}", r.most_popular.average),
            least: r.least_popular.keyword.clone(),
            least_average: format!("{:.1}", r.least_popular.average),
        });

        let recent = report
            .series
            .tail(RECENT_ROWS)
            .iter()
            .map(|point| RecentRow {
                date: point.date.format("%Y-%m-%d").to_string(),
                cells: point
                    .values
                    .iter()
                    .map(|v| v.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string()))
                    .collect(),
            })
            .collect();

        Self {
            title: query.keywords.join(", "),
            region,
            timeframe: query.range.as_timeframe(),
            fetched_at: report.fetched_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            rows,
            ranking,
            without_data: report.summary.without_data.clone(),
            columns: report.series.keywords.clone(),
            recent,
        }
    }
}

/// Markdown renderer writing to `W`
pub struct MarkdownRenderer<W: Write> {
    /// Handlebars template engine
    handlebars: Handlebars<'static>,

    out: W,
}

impl<W: Write> MarkdownRenderer<W> {
    /// Create a renderer with the built-in templates
    ///
    /// # Example
    /// ```no_run
    /// use trends_explorer::render::MarkdownRenderer;
    ///
    /// let renderer = MarkdownRenderer::new(std::io::stdout()).unwrap();
    /// ```
    pub fn new(out: W) -> Result<Self, RenderError> {
        let mut handlebars = Self::engine();
        handlebars.register_template_string("report", DEFAULT_REPORT_TEMPLATE)?;
        handlebars.register_template_string("failure", DEFAULT_FAILURE_TEMPLATE)?;

        Ok(Self { handlebars, out })
    }

    /// Create with a custom report template file
    ///
    /// The failure template stays the built-in one.
    pub fn with_template(out: W, template_path: &Path) -> Result<Self, RenderError> {
        let mut handlebars = Self::engine();
        handlebars.register_template_file("report", template_path)?;
        handlebars.register_template_string("failure", DEFAULT_FAILURE_TEMPLATE)?;

        Ok(Self { handlebars, out })
    }

    fn engine() -> Handlebars<'static> {
        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(handlebars::no_escape);
        handlebars.set_strict_mode(false);
        handlebars
    }

    /// Render a report to a Markdown string
    pub fn report_markdown(&self, report: &Report) -> Result<String, RenderError> {
        let data = ReportTemplateData::from(report);
        Ok(self.handlebars.render("report", &data)?)
    }

    /// Render a failure notice to a Markdown string
    pub fn failure_markdown(&self, error: &Error) -> Result<String, RenderError> {
        let data = FailureTemplateData {
            category: error.category().localized_desc(),
            message: error.localized_desc(),
            guidance: error.guidance(),
        };
        Ok(self.handlebars.render("failure", &data)?)
    }

    /// Consume the renderer and return the sink
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for MarkdownRenderer<W> {
    fn render_report(&mut self, report: &Report) -> Result<(), RenderError> {
        let markdown = self.report_markdown(report)?;
        self.out.write_all(markdown.as_bytes())?;
        self.out.flush()?;

        tracing::debug!(bytes = markdown.len(), "Rendered report");
        Ok(())
    }

    fn render_failure(&mut self, error: &Error) -> Result<(), RenderError> {
        let markdown = self.failure_markdown(error)?;
        self.out.write_all(markdown.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }
}

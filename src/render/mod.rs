//! Presentation boundary
//!
//! A [`Renderer`] receives finished values: a [`Report`] on success or an
//! [`Error`] on failure. It never recomputes statistics.

pub mod markdown;

use crate::error::Error;
use crate::models::Report;
use thiserror::Error;

pub use markdown::MarkdownRenderer;

/// Errors raised while presenting a result
#[derive(Error, Debug)]
pub enum RenderError {
    /// A template failed to compile
    #[error("Template error: {0}")]
    Template(#[from] handlebars::TemplateError),

    /// A template failed to render
    #[error("Render error: {0}")]
    Render(#[from] handlebars::RenderError),

    /// Writing the output failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Something that can show exploration results to a user
pub trait Renderer {
    /// Present a successful exploration
    fn render_report(&mut self, report: &Report) -> Result<(), RenderError>;

    /// Present a failed attempt with its guidance
    fn render_failure(&mut self, error: &Error) -> Result<(), RenderError>;
}

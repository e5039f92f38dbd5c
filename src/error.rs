//! Unified error handling for the trends explorer
//!
//! Every failure of one exploration ends up as an [`Error`]. None of them
//! is fatal: each ends the current attempt and is shown to the user with a
//! localized description and a hint on what to try next.
//!
//! # Architecture
//!
//! - [`ExplorerErrorTrait`] - Common interface for user-facing handling
//! - [`ErrorCategory`] - Classification of errors for handling strategies
//! - [`Error`] - Unified error enum wrapping the domain errors
//!
//! # Usage
//!
//! ```rust,ignore
//! use trends_explorer::error::{Error, ExplorerErrorTrait};
//!
//! fn show(err: &Error) {
//!     eprintln!("{}", err.localized_desc());
//!     if let Some(hint) = err.guidance() {
//!         eprintln!("{hint}");
//!     }
//! }
//! ```

use thiserror::Error;

pub use crate::render::RenderError;
pub use crate::utils::error::{FetchError, QueryError};

/// Common trait for the explorer's error types
pub trait ExplorerErrorTrait: std::error::Error {
    /// Check if retrying later (possibly with other input) can succeed
    fn is_recoverable(&self) -> bool;

    /// Get localized description for user-facing messages
    fn localized_desc(&self) -> String;

    /// Localized advice on what to do next, if there is any
    fn guidance(&self) -> Option<String>;

    /// Get the error category for handling strategies
    fn category(&self) -> ErrorCategory;
}

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Rejected user input
    Input,
    /// Cooldown or upstream rate limit
    Throttle,
    /// Transport and HTTP status failures
    Network,
    /// Empty or undecodable upstream data
    Data,
    /// Configuration and validation errors
    Config,
    /// Presentation failures
    Render,
}

impl ErrorCategory {
    /// Get localized description for the category
    pub fn localized_desc(&self) -> String {
        match self {
            Self::Input => crate::i18n::t!("errors.category.input").to_string(),
            Self::Throttle => crate::i18n::t!("errors.category.throttle").to_string(),
            Self::Network => crate::i18n::t!("errors.category.network").to_string(),
            Self::Data => crate::i18n::t!("errors.category.data").to_string(),
            Self::Config => crate::i18n::t!("errors.category.config").to_string(),
            Self::Render => crate::i18n::t!("errors.category.render").to_string(),
        }
    }
}

/// Unified error type for the trends explorer
#[derive(Error, Debug)]
pub enum Error {
    /// The session's cooldown window has not elapsed yet
    #[error("Cooldown active: wait {wait_seconds:.1}s")]
    CooldownActive { wait_seconds: f64 },

    /// The source returned no rows for any keyword
    #[error("No data returned for the query")]
    EmptyResult,

    /// The source throttled us; back off for minutes, not seconds
    #[error("Rate limited by the trends source")]
    RateLimited,

    /// Input validation errors
    #[error("Invalid query: {0}")]
    InvalidQuery(#[from] QueryError),

    /// Any other fetch failure
    #[error("Fetch error: {0}")]
    Fetch(FetchError),

    /// Rendering errors
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),
}

impl From<FetchError> for Error {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::RateLimited => Self::RateLimited,
            other => Self::Fetch(other),
        }
    }
}

impl ExplorerErrorTrait for Error {
    fn is_recoverable(&self) -> bool {
        match self {
            Self::CooldownActive { .. } | Self::EmptyResult | Self::RateLimited => true,
            Self::InvalidQuery(_) => false,
            Self::Fetch(e) => matches!(
                e,
                FetchError::Http(_) | FetchError::Timeout | FetchError::ServerError(_)
            ),
            Self::Render(_) => false,
            Self::Config(_) => false,
        }
    }

    fn localized_desc(&self) -> String {
        match self {
            Self::CooldownActive { wait_seconds } => {
                let wait = format!("{wait_seconds:.1}");
                crate::i18n::t!("errors.cooldown", wait = wait).to_string()
            }
            Self::EmptyResult => crate::i18n::t!("errors.empty").to_string(),
            Self::RateLimited => crate::i18n::t!("errors.rate_limited").to_string(),
            Self::InvalidQuery(e) => format!("{}: {e}", crate::i18n::t!("errors.invalid_query")),
            Self::Fetch(e) => format!("{}: {e}", crate::i18n::t!("errors.fetch")),
            Self::Render(e) => format!("{}: {e}", crate::i18n::t!("errors.render")),
            Self::Config(msg) => format!("{}: {msg}", crate::i18n::t!("errors.config")),
        }
    }

    fn guidance(&self) -> Option<String> {
        let hint = match self {
            Self::CooldownActive { .. } => crate::i18n::t!("guidance.cooldown"),
            Self::EmptyResult => crate::i18n::t!("guidance.empty"),
            Self::RateLimited => crate::i18n::t!("guidance.rate_limited"),
            Self::InvalidQuery(_) => crate::i18n::t!("guidance.invalid_query"),
            Self::Fetch(_) => crate::i18n::t!("guidance.fetch"),
            Self::Render(_) | Self::Config(_) => return None,
        };

        Some(hint.to_string())
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::CooldownActive { .. } | Self::RateLimited => ErrorCategory::Throttle,
            Self::EmptyResult => ErrorCategory::Data,
            Self::InvalidQuery(_) => ErrorCategory::Input,
            Self::Fetch(e) => match e {
                FetchError::Decode(_) | FetchError::MissingWidget(_) => ErrorCategory::Data,
                FetchError::InvalidUrl(_) => ErrorCategory::Config,
                _ => ErrorCategory::Network,
            },
            Self::Render(_) => ErrorCategory::Render,
            Self::Config(_) => ErrorCategory::Config,
        }
    }
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

// Conversion from anyhow::Error, used by configuration loading
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Config(format!("{err:#}"))
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;

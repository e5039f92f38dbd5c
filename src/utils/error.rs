//! Error types for the query gate and the trends fetcher
//!
//! This module defines the domain-specific errors that the unified
//! [`crate::error::Error`] wraps.

use thiserror::Error;

/// Errors that can occur while talking to the trends data source
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP request error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The data source throttled us (HTTP 429)
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Server error with status code
    #[error("Server error: {0}")]
    ServerError(u16),

    /// Request timeout
    #[error("Request timeout")]
    Timeout,

    /// Response body could not be decoded
    #[error("Decoding error: {0}")]
    Decode(String),

    /// The explore response had no widget of the requested kind
    #[error("Widget not found in explore response: {0}")]
    MissingWidget(String),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl FetchError {
    /// Whether the source asked us to back off
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited)
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<url::ParseError> for FetchError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}

/// Errors raised while validating user input into a [`crate::models::Query`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// Nothing left after trimming the keyword input
    #[error("No keywords given")]
    NoKeywords,

    /// More keywords than the data source compares at once
    #[error("Too many keywords: {given} given, at most {max} allowed")]
    TooManyKeywords { given: usize, max: usize },

    /// The same keyword appears twice (case-insensitive)
    #[error("Duplicate keyword: {0}")]
    DuplicateKeyword(String),

    /// Region name is neither a known display name nor a two-letter code
    #[error("Unknown region: {0}")]
    UnknownRegion(String),

    /// History window outside 1..=10 years
    #[error("Years back must be between {min} and {max}, got {given}")]
    YearsBackOutOfRange { given: u32, min: u32, max: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limited_flag() {
        assert!(FetchError::RateLimited.is_rate_limited());
        assert!(!FetchError::ServerError(500).is_rate_limited());
        assert!(!FetchError::Timeout.is_rate_limited());
    }

    #[test]
    fn test_query_error_messages() {
        let err = QueryError::TooManyKeywords { given: 7, max: 5 };
        assert_eq!(err.to_string(), "Too many keywords: 7 given, at most 5 allowed");

        let err = QueryError::YearsBackOutOfRange {
            given: 12,
            min: 1,
            max: 10,
        };
        assert_eq!(err.to_string(), "Years back must be between 1 and 10, got 12");
    }

    #[test]
    fn test_json_error_maps_to_decode() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: FetchError = json_err.into();
        assert!(matches!(err, FetchError::Decode(_)));
    }
}

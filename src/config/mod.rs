//! Configuration management for the trends explorer
//!
//! This module handles loading and validating configuration from environment
//! variables and TOML files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Upstream trends source configuration
    #[serde(default)]
    pub trends: TrendsConfig,

    /// Query gate configuration
    #[serde(default)]
    pub gate: GateConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Upstream trends source settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendsConfig {
    /// Base URL of the trends service
    pub base_url: String,

    /// Host language sent with each request
    pub host_language: String,

    /// Timezone offset in minutes, as the service expects it
    pub tz_offset_minutes: i32,

    /// Request timeout in seconds
    pub request_timeout_secs: u64,

    /// Outbound pacing (requests per second)
    pub requests_per_second: u32,
}

/// Query gate settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Minimum seconds between two outbound requests of one session
    pub cooldown_secs: u64,

    /// Maximum keywords per query
    pub max_keywords: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Default for TrendsConfig {
    fn default() -> Self {
        Self {
            base_url: String::from("https://trends.google.com"),
            host_language: String::from("en-US"),
            tz_offset_minutes: 360,
            request_timeout_secs: 30,
            requests_per_second: 1,
        }
    }
}

impl TrendsConfig {
    /// Get request timeout as Duration
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            cooldown_secs: 10,
            max_keywords: crate::gate::DEFAULT_MAX_KEYWORDS,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Unset or unparsable variables fall back to defaults.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let base_url =
            std::env::var("TRENDS_BASE_URL").unwrap_or_else(|_| defaults.trends.base_url.clone());

        let host_language = std::env::var("TRENDS_HOST_LANGUAGE")
            .unwrap_or_else(|_| defaults.trends.host_language.clone());

        let tz_offset_minutes = env_parse("TRENDS_TZ_OFFSET").unwrap_or(defaults.trends.tz_offset_minutes);

        let request_timeout_secs =
            env_parse("TRENDS_REQUEST_TIMEOUT").unwrap_or(defaults.trends.request_timeout_secs);

        let requests_per_second =
            env_parse("TRENDS_RATE_LIMIT").unwrap_or(defaults.trends.requests_per_second);

        let cooldown_secs = env_parse("TRENDS_COOLDOWN_SECS").unwrap_or(defaults.gate.cooldown_secs);

        let max_keywords = env_parse("TRENDS_MAX_KEYWORDS").unwrap_or(defaults.gate.max_keywords);

        let log_level =
            std::env::var("TRENDS_LOG_LEVEL").unwrap_or_else(|_| defaults.logging.level.clone());

        let log_format =
            std::env::var("TRENDS_LOG_FORMAT").unwrap_or_else(|_| defaults.logging.format.clone());

        Ok(Self {
            trends: TrendsConfig {
                base_url,
                host_language,
                tz_offset_minutes,
                request_timeout_secs,
                requests_per_second,
            },
            gate: GateConfig {
                cooldown_secs,
                max_keywords,
            },
            logging: LoggingConfig {
                level: log_level,
                format: log_format,
            },
        })
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.trends.base_url.trim().is_empty() {
            anyhow::bail!("base_url must not be empty");
        }

        url::Url::parse(&self.trends.base_url)
            .with_context(|| format!("base_url is not a valid URL: {}", self.trends.base_url))?;

        if self.trends.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be greater than 0");
        }

        if self.trends.requests_per_second == 0 {
            anyhow::bail!("requests_per_second must be greater than 0");
        }

        if self.gate.max_keywords == 0 {
            anyhow::bail!("max_keywords must be greater than 0");
        }

        if !matches!(self.logging.format.as_str(), "text" | "json") {
            anyhow::bail!("log format must be 'text' or 'json', got '{}'", self.logging.format);
        }

        Ok(())
    }

    /// Get the cooldown interval as Duration
    #[must_use]
    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.gate.cooldown_secs)
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse::<T>().ok())
}

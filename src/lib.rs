//! Mynavi-Scout: a corp-search scraper for the Mynavi job portal
//!
//! This crate drives the portal's search form the way a browser would: it
//! pulls anti-forgery tokens from the entry page, replays them across
//! paginated form submissions, and extracts company records from the
//! returned markup.

pub mod config;
pub mod output;
pub mod scrape;
pub mod session;

use thiserror::Error;

/// Main error type for Mynavi-Scout operations
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Unexpected status {status} from {url}")]
    BadStatus { url: String, status: u16 },

    #[error("Search form not found (selector: {selector})")]
    FormMissing { selector: String },

    #[error("Required CSRF/view-state tokens missing from form fields")]
    TokensMissing,

    #[error("Response body contains error marker: {marker}")]
    ErrorMarker { marker: String },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Mynavi-Scout operations
pub type Result<T> = std::result::Result<T, ScoutError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use scrape::{CompanyRecord, HiddenFields, PageResult, ScrapeOutcome, Scraper, StopReason};

//! Terminal Procedures: FAA d-TPP listings for airports
//!
//! This crate queries the FAA digital Terminal Procedures Publication search
//! pages and turns the HTML result tables into typed procedure records,
//! including the effective date range of the publication cycle.

pub mod config;
pub mod crawler;
pub mod cycle;
pub mod procedure;

use thiserror::Error;

/// Main error type for terminal procedure lookups
///
/// Only transport-level problems surface here. A cycle that is not published
/// yet is `Ok(None)`, and a page without a results table is reported through
/// [`crawler::PageOutcome`] rather than as an error.
#[derive(Debug, Error)]
pub enum TppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP status {status} for {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
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

/// Result type alias for terminal procedure operations
pub type Result<T> = std::result::Result<T, TppError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Icaos, Listing, PageOutcome, PageResult, ProceduresClient};
pub use cycle::{parse_effective_dates, Cycle, CycleKind, EffectiveDateRange};
pub use procedure::{FlagMeaning, ListOptions, Link, ProcedureRecord, QueryFilter};

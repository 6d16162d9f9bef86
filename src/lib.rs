//! Apizoo-Harvest: API documentation scraper and catalog submitter
//!
//! This crate scrapes API documentation pages into structured records,
//! reconciles them with submitter metadata, and publishes the successful
//! records to a shared catalog repository.

pub mod config;
pub mod extract;
pub mod publish;
pub mod reconcile;
pub mod results;
pub mod scrape;
pub mod service;
pub mod submission;

use thiserror::Error;

/// Main error type for request-level failures
///
/// Per-URL failures never show up here; they are recorded as data inside
/// the result mapping.
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Publish failed: {0}")]
    Publish(#[from] publish::PublishError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HarvestError {
    /// HTTP-style status code a request boundary should report for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Unauthorized(_) => 401,
            Self::Publish(publish::PublishError::Unauthorized) => 401,
            _ => 500,
        }
    }
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

/// Result type alias for request-level operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use extract::{extract, ExtractError, ExtractedRecord, HttpMethod, Parameter};
pub use reconcile::{reconcile, CatalogEntry, FinalResults, SubmissionMetadata};
pub use results::{Outcome, ResultMap, ScrapeResults};
pub use scrape::BatchScraper;
pub use submission::{select_successful, Submission};

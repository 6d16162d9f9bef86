//! Request-level entry points
//!
//! [`Harvester`] is what a transport layer (HTTP routes, CLI) calls. It
//! validates requests before any network work, runs the scrape pipeline,
//! and hands successful records to a [`Publisher`]. Request-level failures
//! come back as [`HarvestError`]; [`ErrorPayload`] is their wire shape.

use crate::config::{CatalogConfig, Config};
use crate::publish::{Credential, PublishError, PublishResult, Publisher};
use crate::reconcile::{reconcile, EntryOverride, FinalResults, SubmissionMetadata};
use crate::scrape::{BatchScraper, HttpFetcher};
use crate::submission::{select_successful, validate_user_name, Submission};
use crate::HarvestError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Body of a convert request
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ConvertRequest {
    pub api_urls: Vec<String>,
    pub user_name: String,

    #[serde(default)]
    pub overrides: IndexMap<String, EntryOverride>,
}

/// Body of a publish request: the reconciled mapping returned by convert
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RaisePrRequest {
    pub user_name: String,
    pub api_urls: FinalResults,
}

/// Parses a JSON request body, reporting missing or mistyped fields as a
/// validation error
pub fn parse_request<T: for<'de> Deserialize<'de>>(body: &str) -> Result<T, HarvestError> {
    serde_json::from_str(body)
        .map_err(|e| HarvestError::Validation(format!("Missing data in request: {}", e)))
}

/// Structured error body for request-level failures
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorPayload {
    pub error: String,
    pub status: u16,
}

impl From<&HarvestError> for ErrorPayload {
    fn from(err: &HarvestError) -> Self {
        Self {
            error: err.to_string(),
            status: err.status_code(),
        }
    }
}

/// Scrape, reconcile, and publish pipeline for one configuration
#[derive(Clone)]
pub struct Harvester {
    scraper: BatchScraper,
    catalog: CatalogConfig,
}

impl Harvester {
    pub fn new(scraper: BatchScraper, catalog: CatalogConfig) -> Self {
        Self { scraper, catalog }
    }

    /// Builds a harvester that fetches over HTTP with the configured limits
    pub fn from_config(config: &Config) -> Result<Self, HarvestError> {
        let fetcher = HttpFetcher::from_config(&config.scraper, &config.user_agent)?;
        let scraper = BatchScraper::new(
            Arc::new(fetcher),
            config.scraper.max_concurrent_fetches as usize,
        );
        Ok(Self::new(scraper, config.catalog.clone()))
    }

    pub fn catalog(&self) -> &CatalogConfig {
        &self.catalog
    }

    /// Scrapes every URL and reconciles the outcomes with the submitter's
    /// metadata
    ///
    /// URL-level failures are part of the returned mapping. Only an invalid
    /// request is an error, and it is raised before anything is fetched.
    pub async fn convert(&self, request: ConvertRequest) -> Result<FinalResults, HarvestError> {
        validate_user_name(&request.user_name)?;

        let results = self.scraper.scrape_all(&request.api_urls).await;

        let metadata = SubmissionMetadata {
            user_name: request.user_name,
            overrides: request.overrides,
        };
        Ok(reconcile(&results, &metadata))
    }

    /// Publishes the successful entries of a reconciled mapping
    ///
    /// The credential is checked first; nothing is published without one.
    /// An empty selection is still handed to the publisher.
    pub async fn raise_pr(
        &self,
        request: RaisePrRequest,
        authorization: Option<&str>,
        publisher: &dyn Publisher,
    ) -> Result<PublishResult, HarvestError> {
        let credential = Credential::from_header(authorization)
            .map_err(|e| HarvestError::Unauthorized(e.to_string()))?;

        let records = select_successful(&request.api_urls);
        tracing::info!(
            user_name = %request.user_name,
            selected = records.len(),
            total = request.api_urls.len(),
            "Selected successful records for submission"
        );

        let submission = Submission::prepare_now(&self.catalog, &request.user_name, &records)?;

        publisher
            .publish(&submission, &credential)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Publishing failed");
                match e {
                    PublishError::Unauthorized => {
                        HarvestError::Unauthorized(PublishError::Unauthorized.to_string())
                    }
                    other => HarvestError::Publish(other),
                }
            })
    }
}

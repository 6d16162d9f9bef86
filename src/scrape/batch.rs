//! Batch scraping over a list of URLs
//!
//! Every URL is fetched and extracted in its own task. A semaphore bounds
//! how many fetches are in flight, and tasks are joined in input order so
//! the resulting mapping never depends on completion order.

use crate::extract::{PageExtractor, ShapeExtractor};
use crate::results::{Outcome, ScrapeResults};
use crate::scrape::fetcher::PageFetcher;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Runs fetch + extract for each URL with per-URL failure isolation
#[derive(Clone)]
pub struct BatchScraper {
    fetcher: Arc<dyn PageFetcher>,
    extractor: Arc<dyn PageExtractor>,
    max_concurrent: usize,
}

impl BatchScraper {
    /// Creates a scraper using the default shape extractor
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Source of raw page content
    /// * `max_concurrent` - Upper bound on in-flight fetches (minimum 1)
    pub fn new(fetcher: Arc<dyn PageFetcher>, max_concurrent: usize) -> Self {
        Self::with_extractor(fetcher, Arc::new(ShapeExtractor::default()), max_concurrent)
    }

    pub fn with_extractor(
        fetcher: Arc<dyn PageFetcher>,
        extractor: Arc<dyn PageExtractor>,
        max_concurrent: usize,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            max_concurrent: max_concurrent.max(1),
        }
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Scrapes every URL and returns one outcome per distinct URL, in input
    /// order
    ///
    /// One URL failing, including a panic inside its task, only produces a
    /// failure entry for that URL. Duplicate URLs are still processed; the
    /// first occurrence's outcome is the one kept.
    pub async fn scrape_all(&self, urls: &[String]) -> ScrapeResults {
        tracing::info!(
            urls = urls.len(),
            max_concurrent = self.max_concurrent,
            "Starting batch scrape"
        );

        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let mut handles = Vec::with_capacity(urls.len());

        for url in urls {
            let semaphore = Arc::clone(&semaphore);
            let fetcher = Arc::clone(&self.fetcher);
            let extractor = Arc::clone(&self.extractor);
            let url = url.clone();

            handles.push(tokio::spawn(async move {
                // The semaphore is never closed, so acquisition cannot fail
                let _permit = semaphore.acquire_owned().await.ok();
                scrape_one(fetcher.as_ref(), extractor.as_ref(), &url).await
            }));
        }

        let mut results = ScrapeResults::with_capacity(urls.len());

        for (url, handle) in urls.iter().zip(handles) {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::error!(url = %url, error = %e, "Scrape task aborted");
                    Outcome::failure(format!("internal error while scraping: {}", e))
                }
            };

            if !results.insert_once(url.clone(), outcome) {
                tracing::debug!(url = %url, "Duplicate URL, keeping first outcome");
            }
        }

        tracing::info!(
            succeeded = results.success_count(),
            failed = results.failure_count(),
            "Batch scrape finished"
        );

        results
    }
}

/// Fetches and extracts a single URL
///
/// The extractor is only invoked when the fetch succeeded.
pub async fn scrape_one(
    fetcher: &dyn PageFetcher,
    extractor: &dyn PageExtractor,
    url: &str,
) -> Outcome<crate::extract::ExtractedRecord> {
    tracing::debug!(url = %url, "Fetching page");

    let raw = match fetcher.fetch(url).await {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!(url = %url, error = %e, "Fetch failed");
            return Outcome::failure(e.to_string());
        }
    };

    match extractor.extract(&raw) {
        Ok(record) => {
            tracing::debug!(url = %url, method = %record.method, "Extracted record");
            Outcome::success(record)
        }
        Err(e) => {
            tracing::warn!(url = %url, error = %e, "Extraction failed");
            Outcome::failure(e.to_string())
        }
    }
}

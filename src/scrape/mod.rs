//! Scrape module for fetching documentation pages and extracting records
//!
//! This module contains the per-request scrape pipeline:
//! - HTTP fetching with bounded timeouts and error classification
//! - Batch orchestration with bounded concurrency and per-URL isolation

mod batch;
mod fetcher;

pub use batch::{scrape_one, BatchScraper};
pub use fetcher::{build_http_client, fetch_url, FetchError, HttpFetcher, PageFetcher};

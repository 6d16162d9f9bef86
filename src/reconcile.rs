//! Reconciliation of scrape outcomes with submitter metadata
//!
//! The reconciler attaches request-level context (submitter name, per-URL
//! overrides) to each successful record and reshapes it into the catalog
//! entry layout. It never changes an outcome's status or the extracted
//! values themselves.

use crate::extract::{ExtractedRecord, HttpMethod, Parameter, UNKNOWN};
use crate::results::{ResultMap, ScrapeResults};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key under `meta_data` that always holds the scraped URL
pub const SOURCE_URL_KEY: &str = "source_url";

/// Request-level context supplied by the submitter
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SubmissionMetadata {
    pub user_name: String,

    /// Per-URL overrides, keyed by the exact input URL
    #[serde(default)]
    pub overrides: IndexMap<String, EntryOverride>,
}

impl SubmissionMetadata {
    pub fn new(user_name: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            overrides: IndexMap::new(),
        }
    }
}

/// Contextual fields a submitter may set for one URL
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct EntryOverride {
    #[serde(default)]
    pub api_name: Option<String>,

    #[serde(default)]
    pub api_version: Option<String>,

    #[serde(default)]
    pub env_requirements: Option<Vec<String>>,

    #[serde(default)]
    pub questions: Option<Vec<String>>,

    #[serde(default)]
    pub meta_data: Option<Map<String, Value>>,
}

/// One catalog entry, serialized in the catalog's key order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub user_name: String,
    pub api_name: String,
    pub api_call: String,
    pub api_method: HttpMethod,
    pub api_version: String,
    pub api_arguments: Vec<Parameter>,
    pub functionality: String,
    pub env_requirements: Vec<String>,
    pub example_code: Option<String>,
    pub meta_data: Map<String, Value>,
    pub questions: Vec<String>,
}

/// Reconciled outcomes, ready to serialize
pub type FinalResults = ResultMap<CatalogEntry>;

/// Merges scrape outcomes with submitter metadata
///
/// Output order equals the scrape order; failures are carried over as-is.
pub fn reconcile(results: &ScrapeResults, metadata: &SubmissionMetadata) -> FinalResults {
    results
        .iter()
        .map(|(url, outcome)| {
            let entry_override = metadata.overrides.get(url);
            let reconciled = outcome.map(|record| {
                catalog_entry(url, record, &metadata.user_name, entry_override)
            });
            (url.to_string(), reconciled)
        })
        .collect()
}

fn catalog_entry(
    url: &str,
    record: &ExtractedRecord,
    user_name: &str,
    entry_override: Option<&EntryOverride>,
) -> CatalogEntry {
    let ov = entry_override.cloned().unwrap_or_default();

    let mut meta_data = ov.meta_data.unwrap_or_default();
    // Set last so an override can never misattribute the source
    meta_data.insert(SOURCE_URL_KEY.to_string(), Value::String(url.to_string()));

    CatalogEntry {
        user_name: user_name.to_string(),
        api_name: ov.api_name.unwrap_or_else(|| record.name.clone()),
        api_call: record.endpoint.clone(),
        api_method: record.method,
        api_version: ov.api_version.unwrap_or_else(|| UNKNOWN.to_string()),
        api_arguments: record.parameters.clone(),
        functionality: record.description.clone(),
        env_requirements: ov.env_requirements.unwrap_or_default(),
        example_code: record.example.clone(),
        meta_data,
        questions: ov.questions.unwrap_or_default(),
    }
}

/// Serializes reconciled results as pretty JSON with two-space indentation
pub fn to_json(results: &FinalResults) -> serde_json::Result<String> {
    serde_json::to_string_pretty(results)
}

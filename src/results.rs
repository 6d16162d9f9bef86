//! Per-URL outcomes and the ordered mapping that holds them

use crate::extract::ExtractedRecord;
use indexmap::map::Entry;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Outcome of processing one URL
///
/// Serialized as `{"status": "success", "data": ...}` or
/// `{"status": "failure", "error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Outcome<T> {
    Success { data: T },
    Failure { error: String },
}

impl<T> Outcome<T> {
    pub fn success(data: T) -> Self {
        Self::Success { data }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self::Failure {
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success { data } => Some(data),
            Self::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error } => Some(error),
        }
    }

    /// Transforms the success payload, leaving failures untouched
    pub fn map<U>(&self, f: impl FnOnce(&T) -> U) -> Outcome<U> {
        match self {
            Self::Success { data } => Outcome::Success { data: f(data) },
            Self::Failure { error } => Outcome::Failure {
                error: error.clone(),
            },
        }
    }
}

/// URL-keyed outcomes in input order
///
/// Each key is written once; later writes for the same URL are ignored so
/// the first occurrence keeps both its position and its outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultMap<T> {
    entries: IndexMap<String, Outcome<T>>,
}

/// Outcomes of a scrape, before reconciliation
pub type ScrapeResults = ResultMap<ExtractedRecord>;

impl<T> ResultMap<T> {
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
        }
    }

    /// Records the outcome for `url` unless one is already present
    ///
    /// Returns `false` when the URL already had an outcome.
    pub fn insert_once(&mut self, url: String, outcome: Outcome<T>) -> bool {
        match self.entries.entry(url) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(outcome);
                true
            }
        }
    }

    pub fn get(&self, url: &str) -> Option<&Outcome<T>> {
        self.entries.get(url)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates `(url, outcome)` pairs in input order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Outcome<T>)> {
        self.entries.iter().map(|(url, outcome)| (url.as_str(), outcome))
    }

    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn success_count(&self) -> usize {
        self.entries.values().filter(|o| o.is_success()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.len() - self.success_count()
    }
}

impl<T> Default for ResultMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<(String, Outcome<T>)> for ResultMap<T> {
    fn from_iter<I: IntoIterator<Item = (String, Outcome<T>)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (url, outcome) in iter {
            map.insert_once(url, outcome);
        }
        map
    }
}

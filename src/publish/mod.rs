//! Publishing of submissions to the catalog repository
//!
//! Publishing is a fork → branch → commit flow ending in a compare link the
//! submitter opens to create the pull request. The core only depends on the
//! [`Publisher`] trait; [`GitHubPublisher`] is the REST implementation.

mod github;

pub use github::{compare_url, GitHubPublisher};

use crate::submission::Submission;
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Errors that can occur while publishing a submission
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Authorization header missing or incorrect")]
    Unauthorized,

    #[error("Failed to fork repository. Status code: {status}. Error: {message}")]
    Fork { status: u16, message: String },

    #[error("Failed to get latest commit SHA of '{branch}'. Status code: {status}")]
    BaseRef { branch: String, status: u16 },

    #[error("Failed to create branch '{branch}'. Status code: {status}. Error: {message}")]
    Branch {
        branch: String,
        status: u16,
        message: String,
    },

    #[error("Failed to create file '{path}'. Status code: {status}. Error: {message}")]
    File {
        path: String,
        status: u16,
        message: String,
    },

    #[error("Unexpected response from hosting API: {0}")]
    Response(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Opaque bearer credential forwarded to the hosting API
///
/// The value is never inspected, refreshed, or printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Accepts an `Authorization` header value; absent or blank is an error
    pub fn from_header(header: Option<&str>) -> Result<Self, PublishError> {
        header
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(Self::new)
            .ok_or(PublishError::Unauthorized)
    }

    /// Raw header value
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Where a published submission ended up
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct PublishResult {
    /// Fork the file was committed to, as `owner/name`
    pub fork: String,
    pub branch: String,
    /// Link for opening the pull request against the upstream repository
    pub compare_url: String,
}

/// Publishes a prepared submission
///
/// Completed steps are not rolled back when a later step fails.
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(
        &self,
        submission: &Submission,
        credential: &Credential,
    ) -> Result<PublishResult, PublishError>;
}

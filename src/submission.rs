//! Selection and packaging of successful records for publishing

use crate::config::CatalogConfig;
use crate::results::ResultMap;
use crate::HarvestError;
use serde::Serialize;

/// Longest user name the hosting service accepts
const MAX_USER_NAME_LEN: usize = 39;

/// Returns the payloads of all successful outcomes, in mapping order
///
/// An empty or all-failure mapping yields an empty list.
pub fn select_successful<T: Clone>(results: &ResultMap<T>) -> Vec<T> {
    results
        .iter()
        .filter_map(|(_, outcome)| outcome.data().cloned())
        .collect()
}

/// Serializes the selected records as a pretty JSON array plus a trailing
/// newline
pub fn serialize_submission<T: Serialize>(records: &[T]) -> serde_json::Result<String> {
    let mut content = serde_json::to_string_pretty(records)?;
    content.push('\n');
    Ok(content)
}

/// Checks that a user name is safe to use in file paths and branch names
pub fn validate_user_name(user_name: &str) -> Result<(), HarvestError> {
    if user_name.is_empty() {
        return Err(HarvestError::Validation(
            "user_name cannot be empty".to_string(),
        ));
    }

    if user_name.len() > MAX_USER_NAME_LEN {
        return Err(HarvestError::Validation(format!(
            "user_name must be at most {} characters, got {}",
            MAX_USER_NAME_LEN,
            user_name.len()
        )));
    }

    if !user_name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(HarvestError::Validation(format!(
            "user_name must contain only ASCII letters, digits, '-' or '_', got '{}'",
            user_name
        )));
    }

    Ok(())
}

/// Path of the submitter's file inside the catalog repository
pub fn target_file_path(catalog: &CatalogConfig, user_name: &str) -> String {
    format!("{}/{}.json", catalog.data_dir.trim_end_matches('/'), user_name)
}

/// Branch name unique per submitter and second
pub fn branch_name(user_name: &str, unix_seconds: i64) -> String {
    format!("{}-branch-{}", user_name, unix_seconds)
}

/// Everything the publishing collaborator needs for one submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub user_name: String,
    pub file_path: String,
    pub branch_name: String,
    pub commit_message: String,
    pub content: String,
    pub record_count: usize,
}

impl Submission {
    /// Builds a submission from already-selected records
    ///
    /// # Arguments
    ///
    /// * `catalog` - Target repository layout
    /// * `user_name` - Submitter identity; validated here
    /// * `records` - Successful records, in order
    /// * `unix_seconds` - Uniqueness token for the branch name
    pub fn prepare<T: Serialize>(
        catalog: &CatalogConfig,
        user_name: &str,
        records: &[T],
        unix_seconds: i64,
    ) -> Result<Self, HarvestError> {
        validate_user_name(user_name)?;

        Ok(Self {
            user_name: user_name.to_string(),
            file_path: target_file_path(catalog, user_name),
            branch_name: branch_name(user_name, unix_seconds),
            commit_message: format!("Add new file for {}", user_name),
            content: serialize_submission(records)?,
            record_count: records.len(),
        })
    }

    /// Same as [`Submission::prepare`] using the current time
    pub fn prepare_now<T: Serialize>(
        catalog: &CatalogConfig,
        user_name: &str,
        records: &[T],
    ) -> Result<Self, HarvestError> {
        Self::prepare(catalog, user_name, records, chrono::Utc::now().timestamp())
    }
}

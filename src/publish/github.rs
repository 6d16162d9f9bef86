//! GitHub REST implementation of the publishing flow

use crate::config::{CatalogConfig, Config};
use crate::publish::{Credential, PublishError, PublishResult, Publisher};
use crate::submission::Submission;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;

const ACCEPT: &str = "application/vnd.github.v3+json";

/// Publishes submissions by forking the catalog repository, creating a
/// branch on the fork, and committing the submission file to it
#[derive(Debug, Clone)]
pub struct GitHubPublisher {
    client: Client,
    catalog: CatalogConfig,
}

impl GitHubPublisher {
    pub fn new(client: Client, catalog: CatalogConfig) -> Self {
        Self { client, catalog }
    }

    /// Builds a publisher whose client identifies with the configured user
    /// agent (the API rejects requests without one)
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(config.user_agent.header_value())
            .timeout(Duration::from_secs(config.scraper.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.scraper.connect_timeout_secs))
            .build()?;
        Ok(Self::new(client, config.catalog.clone()))
    }

    fn request(&self, method: Method, path: &str, credential: &Credential) -> RequestBuilder {
        let url = format!("{}{}", self.catalog.api_url.trim_end_matches('/'), path);
        self.client
            .request(method, url)
            .header("Authorization", credential.expose())
            .header("Accept", ACCEPT)
    }

    /// Forks the upstream repository and returns the fork's `owner/name`
    async fn fork_repository(&self, credential: &Credential) -> Result<String, PublishError> {
        let path = format!("/repos/{}/forks", self.catalog.repository);
        let response = self.request(Method::POST, &path, credential).send().await?;

        let status = reject_credential(response.status())?;
        if status != StatusCode::ACCEPTED {
            return Err(PublishError::Fork {
                status: status.as_u16(),
                message: error_message(response).await,
            });
        }

        let body: Value = response.json().await?;
        body.get("full_name")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| PublishError::Response("fork response has no full_name".to_string()))
    }

    async fn latest_commit_sha(
        &self,
        repository: &str,
        branch: &str,
        credential: &Credential,
    ) -> Result<String, PublishError> {
        let path = format!("/repos/{}/git/ref/heads/{}", repository, branch);
        let response = self.request(Method::GET, &path, credential).send().await?;

        let status = reject_credential(response.status())?;
        if status != StatusCode::OK {
            return Err(PublishError::BaseRef {
                branch: branch.to_string(),
                status: status.as_u16(),
            });
        }

        let body: Value = response.json().await?;
        body.pointer("/object/sha")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| PublishError::Response("ref response has no object.sha".to_string()))
    }

    async fn create_branch(
        &self,
        repository: &str,
        branch: &str,
        credential: &Credential,
    ) -> Result<(), PublishError> {
        let sha = self
            .latest_commit_sha(repository, &self.catalog.base_branch, credential)
            .await?;

        let path = format!("/repos/{}/git/refs", repository);
        let response = self
            .request(Method::POST, &path, credential)
            .json(&json!({
                "ref": format!("refs/heads/{}", branch),
                "sha": sha,
            }))
            .send()
            .await?;

        let status = reject_credential(response.status())?;
        if status != StatusCode::CREATED {
            return Err(PublishError::Branch {
                branch: branch.to_string(),
                status: status.as_u16(),
                message: error_message(response).await,
            });
        }

        Ok(())
    }

    async fn create_file(
        &self,
        repository: &str,
        submission: &Submission,
        credential: &Credential,
    ) -> Result<(), PublishError> {
        let path = format!("/repos/{}/contents/{}", repository, submission.file_path);
        let response = self
            .request(Method::PUT, &path, credential)
            .json(&json!({
                "message": submission.commit_message,
                "content": STANDARD.encode(submission.content.as_bytes()),
                "branch": submission.branch_name,
            }))
            .send()
            .await?;

        // 201 when created, 200 when an existing file was updated
        let status = reject_credential(response.status())?;
        if status != StatusCode::CREATED && status != StatusCode::OK {
            return Err(PublishError::File {
                path: submission.file_path.clone(),
                status: status.as_u16(),
                message: error_message(response).await,
            });
        }

        Ok(())
    }
}

#[async_trait]
impl Publisher for GitHubPublisher {
    async fn publish(
        &self,
        submission: &Submission,
        credential: &Credential,
    ) -> Result<PublishResult, PublishError> {
        tracing::info!(
            repository = %self.catalog.repository,
            branch = %submission.branch_name,
            records = submission.record_count,
            "Publishing submission"
        );

        let fork = self.fork_repository(credential).await?;
        tracing::debug!(fork = %fork, "Repository forked");

        self.create_branch(&fork, &submission.branch_name, credential)
            .await?;
        tracing::debug!(fork = %fork, branch = %submission.branch_name, "Branch created");

        self.create_file(&fork, submission, credential).await?;
        tracing::debug!(path = %submission.file_path, "Submission file committed");

        let compare_url = compare_url(
            &self.catalog.web_url,
            &self.catalog.repository,
            &fork,
            &self.catalog.base_branch,
            &submission.branch_name,
        );
        tracing::info!(compare_url = %compare_url, "Submission published");

        Ok(PublishResult {
            fork,
            branch: submission.branch_name.clone(),
            compare_url,
        })
    }
}

/// A rejected credential fails the same way at every step
fn reject_credential(status: StatusCode) -> Result<StatusCode, PublishError> {
    if status == StatusCode::UNAUTHORIZED {
        Err(PublishError::Unauthorized)
    } else {
        Ok(status)
    }
}

/// Builds the web link that compares a fork branch against the upstream
/// base branch
///
/// # Example
///
/// ```
/// use apizoo_harvest::publish::compare_url;
///
/// let url = compare_url("https://github.com", "ShishirPatil/gorilla", "octocat/gorilla", "main", "octocat-branch-1");
/// assert_eq!(
///     url,
///     "https://github.com/ShishirPatil/gorilla/compare/main...octocat:octocat-branch-1?expand=1"
/// );
/// ```
pub fn compare_url(
    web_url: &str,
    upstream: &str,
    fork: &str,
    base_branch: &str,
    branch: &str,
) -> String {
    let fork_owner = fork.split('/').next().unwrap_or(fork);
    format!(
        "{}/{}/compare/{}...{}:{}?expand=1",
        web_url.trim_end_matches('/'),
        upstream,
        base_branch,
        fork_owner,
        branch
    )
}

/// Best-effort `message` field from an error response body
async fn error_message(response: Response) -> String {
    response
        .json::<Value>()
        .await
        .ok()
        .and_then(|body| body.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| "No error message provided.".to_string())
}

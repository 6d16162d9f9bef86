//! Integration tests for the GitHub publishing flow
//!
//! A wiremock server stands in for the hosting REST API.

use apizoo_harvest::config::CatalogConfig;
use apizoo_harvest::publish::{Credential, GitHubPublisher, PublishError, Publisher};
use apizoo_harvest::scrape::{BatchScraper, HttpFetcher};
use apizoo_harvest::service::{Harvester, RaisePrRequest};
use apizoo_harvest::submission::Submission;
use apizoo_harvest::FinalResults;
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_test_catalog(api_url: &str) -> CatalogConfig {
    CatalogConfig {
        repository: "upstream/catalog".to_string(),
        base_branch: "main".to_string(),
        data_dir: "data/apizoo".to_string(),
        api_url: api_url.to_string(),
        web_url: "https://github.example".to_string(),
    }
}

fn create_test_submission(catalog: &CatalogConfig) -> Submission {
    Submission::prepare(catalog, "octocat", &["record"], 1_700_000_000).unwrap()
}

fn create_publisher(catalog: CatalogConfig) -> GitHubPublisher {
    let client = reqwest::Client::builder()
        .user_agent("TestBot/1.0")
        .build()
        .unwrap();
    GitHubPublisher::new(client, catalog)
}

async fn mount_fork(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/repos/upstream/catalog/forks"))
        .and(header("authorization", "token abc123"))
        .and(header("accept", "application/vnd.github.v3+json"))
        .respond_with(
            ResponseTemplate::new(202)
                .set_body_json(serde_json::json!({"full_name": "octocat/catalog"})),
        )
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_publish_full_flow() {
    let server = MockServer::start().await;
    mount_fork(&server).await;

    Mock::given(method("GET"))
        .and(path("/repos/octocat/catalog/git/ref/heads/main"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"object": {"sha": "abc"}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/repos/octocat/catalog/git/refs"))
        .and(body_partial_json(serde_json::json!({
            "ref": "refs/heads/octocat-branch-1700000000",
            "sha": "abc"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&server)
        .await;

    // base64 of "[\n  \"record\"\n]\n"
    Mock::given(method("PUT"))
        .and(path("/repos/octocat/catalog/contents/data/apizoo/octocat.json"))
        .and(body_partial_json(serde_json::json!({
            "message": "Add new file for octocat",
            "branch": "octocat-branch-1700000000",
            "content": "WwogICJyZWNvcmQiCl0K"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let catalog = create_test_catalog(&server.uri());
    let submission = create_test_submission(&catalog);
    let publisher = create_publisher(catalog);

    let result = publisher
        .publish(&submission, &Credential::new("token abc123"))
        .await
        .expect("publish failed");

    assert_eq!(result.fork, "octocat/catalog");
    assert_eq!(result.branch, "octocat-branch-1700000000");
    assert_eq!(
        result.compare_url,
        "https://github.example/upstream/catalog/compare/main...octocat:octocat-branch-1700000000?expand=1"
    );
}

#[tokio::test]
async fn test_fork_failure_reports_status_and_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/repos/upstream/catalog/forks"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(serde_json::json!({"message": "Forbidden"})),
        )
        .mount(&server)
        .await;

    let catalog = create_test_catalog(&server.uri());
    let submission = create_test_submission(&catalog);
    let publisher = create_publisher(catalog);

    let err = publisher
        .publish(&submission, &Credential::new("token abc123"))
        .await
        .unwrap_err();

    match err {
        PublishError::Fork { status, message } => {
            assert_eq!(status, 403);
            assert_eq!(message, "Forbidden");
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[tokio::test]
async fn test_branch_failure_stops_before_commit() {
    let server = MockServer::start().await;
    mount_fork(&server).await;

    Mock::given(method("GET"))
        .and(path("/repos/octocat/catalog/git/ref/heads/main"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"object": {"sha": "abc"}})),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/repos/octocat/catalog/git/refs"))
        .respond_with(
            ResponseTemplate::new(422)
                .set_body_json(serde_json::json!({"message": "Reference already exists"})),
        )
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let catalog = create_test_catalog(&server.uri());
    let submission = create_test_submission(&catalog);
    let publisher = create_publisher(catalog);

    let err = publisher
        .publish(&submission, &Credential::new("token abc123"))
        .await
        .unwrap_err();

    assert!(matches!(err, PublishError::Branch { status: 422, .. }));
    assert!(err.to_string().contains("Reference already exists"));
}

#[tokio::test]
async fn test_missing_base_ref() {
    let server = MockServer::start().await;
    mount_fork(&server).await;

    Mock::given(method("GET"))
        .and(path("/repos/octocat/catalog/git/ref/heads/main"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let catalog = create_test_catalog(&server.uri());
    let submission = create_test_submission(&catalog);
    let publisher = create_publisher(catalog);

    let err = publisher
        .publish(&submission, &Credential::new("token abc123"))
        .await
        .unwrap_err();

    assert!(matches!(err, PublishError::BaseRef { status: 404, .. }));
}

#[tokio::test]
async fn test_rejected_credential_is_unauthorized() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/repos/upstream/catalog/forks"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(serde_json::json!({"message": "Bad credentials"})),
        )
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let catalog = create_test_catalog(&server.uri());
    let submission = create_test_submission(&catalog);
    let publisher = create_publisher(catalog.clone());

    let err = publisher
        .publish(&submission, &Credential::new("token revoked"))
        .await
        .unwrap_err();
    assert!(matches!(err, PublishError::Unauthorized));

    let fetcher = HttpFetcher::new(reqwest::Client::new());
    let harvester = Harvester::new(BatchScraper::new(Arc::new(fetcher), 1), catalog);
    let request = RaisePrRequest {
        user_name: "octocat".to_string(),
        api_urls: FinalResults::new(),
    };

    let err = harvester
        .raise_pr(request, Some("token revoked"), &publisher)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 401);
}

#[tokio::test]
async fn test_credential_rejected_mid_flow() {
    let server = MockServer::start().await;
    mount_fork(&server).await;

    Mock::given(method("GET"))
        .and(path("/repos/octocat/catalog/git/ref/heads/main"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let catalog = create_test_catalog(&server.uri());
    let submission = create_test_submission(&catalog);
    let publisher = create_publisher(catalog);

    let err = publisher
        .publish(&submission, &Credential::new("token abc123"))
        .await
        .unwrap_err();
    assert!(matches!(err, PublishError::Unauthorized));
}

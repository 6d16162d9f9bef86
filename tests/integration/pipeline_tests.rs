//! Integration tests for the scrape pipeline
//!
//! These tests use wiremock to serve documentation pages and run the whole
//! fetch → extract → reconcile → select chain end-to-end.

use apizoo_harvest::config::{CatalogConfig, ScraperConfig, UserAgentConfig};
use apizoo_harvest::extract::HttpMethod;
use apizoo_harvest::reconcile::{reconcile, to_json, SubmissionMetadata};
use apizoo_harvest::scrape::{BatchScraper, HttpFetcher};
use apizoo_harvest::service::{ConvertRequest, Harvester};
use apizoo_harvest::submission::{select_successful, serialize_submission};
use indexmap::IndexMap;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const REFERENCE_PAGE: &str = r#"<html>
<head><title>List Users</title></head>
<body>
  <h1>List Users</h1>
  <p>Returns a page of users.</p>
  <pre><code>GET /v1/users</code></pre>
  <table>
    <tr><th>Name</th><th>Type</th><th>Description</th></tr>
    <tr><td>limit</td><td>integer</td><td>Page size</td></tr>
    <tr><td>cursor</td><td>string</td><td>Pagination cursor</td></tr>
  </table>
  <pre>curl https://api.example.com/v1/users?limit=10</pre>
</body>
</html>"#;

const OPENAPI_DOC: &str = r#"{
  "openapi": "3.0.3",
  "info": {"title": "Weather"},
  "servers": [{"url": "https://weather.example.com"}],
  "paths": {
    "/forecast": {
      "get": {
        "summary": "Daily forecast",
        "parameters": [{"name": "city", "in": "query", "schema": {"type": "string"}}]
      }
    }
  }
}"#;

/// Creates a scraper with short timeouts that fetches over real HTTP
fn create_test_scraper(max_concurrent: usize) -> BatchScraper {
    let scraper = ScraperConfig {
        request_timeout_secs: 2,
        connect_timeout_secs: 1,
        max_concurrent_fetches: max_concurrent as u32,
    };
    let user_agent = UserAgentConfig {
        agent_name: "TestBot".to_string(),
        agent_version: "1.0.0".to_string(),
        contact_url: "https://example.com/contact".to_string(),
    };
    let fetcher = HttpFetcher::from_config(&scraper, &user_agent).expect("Failed to build client");
    BatchScraper::new(Arc::new(fetcher), max_concurrent)
}

async fn mount_page(server: &MockServer, route: &str, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(status)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_good_and_not_found_urls() {
    let server = MockServer::start().await;
    mount_page(&server, "/doc", 200, REFERENCE_PAGE).await;
    mount_page(&server, "/404", 404, "not here").await;

    let good = format!("{}/doc", server.uri());
    let bad = format!("{}/404", server.uri());

    let results = create_test_scraper(4)
        .scrape_all(&[good.clone(), bad.clone()])
        .await;

    assert_eq!(results.len(), 2);
    let urls: Vec<&str> = results.urls().collect();
    assert_eq!(urls, vec![good.as_str(), bad.as_str()]);

    let record = results.get(&good).unwrap().data().expect("good URL should succeed");
    assert_eq!(record.name, "List Users");
    assert_eq!(record.endpoint, "/v1/users");
    assert_eq!(record.method, HttpMethod::Get);
    assert_eq!(record.parameters.len(), 2);
    assert_eq!(record.description, "Returns a page of users.");
    assert!(record.example.as_deref().unwrap().starts_with("curl"));

    let error = results.get(&bad).unwrap().error().expect("404 URL should fail");
    assert!(error.contains("404"), "unexpected reason: {}", error);

    let selected = select_successful(&results);
    assert_eq!(selected.len(), 1);
    assert_eq!(&selected[0], record);
}

#[tokio::test]
async fn test_empty_url_list() {
    let results = create_test_scraper(4).scrape_all(&[]).await;
    assert!(results.is_empty());

    let selected = select_successful(&results);
    assert!(selected.is_empty());
    assert_eq!(serialize_submission(&selected).unwrap().trim_end(), "[]");
}

#[tokio::test]
async fn test_unrecognized_shape_fails_closed() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/blog",
        200,
        "<html><head><title>Our Blog</title></head><body><p>News!</p></body></html>",
    )
    .await;

    let url = format!("{}/blog", server.uri());
    let results = create_test_scraper(1).scrape_all(&[url.clone()]).await;

    let outcome = results.get(&url).unwrap();
    assert!(!outcome.is_success());
    assert_eq!(outcome.error(), Some("unrecognized page shape"));
    assert!(select_successful(&results).is_empty());
}

#[tokio::test]
async fn test_one_failure_does_not_abort_batch() {
    let server = MockServer::start().await;
    mount_page(&server, "/a", 200, REFERENCE_PAGE).await;
    mount_page(&server, "/b", 500, "oops").await;
    mount_page(&server, "/c", 200, OPENAPI_DOC).await;

    let urls = vec![
        format!("{}/a", server.uri()),
        format!("{}/b", server.uri()),
        "not even a url".to_string(),
        format!("{}/c", server.uri()),
    ];

    let results = create_test_scraper(2).scrape_all(&urls).await;
    assert_eq!(results.len(), 4);
    assert_eq!(results.success_count(), 2);

    let weather = results.get(&urls[3]).unwrap().data().unwrap();
    assert_eq!(weather.endpoint, "https://weather.example.com/forecast");
    assert_eq!(weather.parameters[0].param_type, "string");

    let selected = select_successful(&results);
    assert_eq!(selected.len(), 2);
    assert_eq!(selected[0].endpoint, "/v1/users");
    assert_eq!(selected[1].name, "Weather");
}

#[tokio::test]
async fn test_reconciled_output_is_reproducible() {
    let server = MockServer::start().await;
    mount_page(&server, "/doc", 200, REFERENCE_PAGE).await;
    mount_page(&server, "/gone", 410, "").await;

    let urls = vec![
        format!("{}/doc", server.uri()),
        format!("{}/gone", server.uri()),
    ];
    let metadata = SubmissionMetadata::new("octocat");

    let sequential = create_test_scraper(1).scrape_all(&urls).await;
    let parallel = create_test_scraper(4).scrape_all(&urls).await;

    let first = to_json(&reconcile(&sequential, &metadata)).unwrap();
    let second = to_json(&reconcile(&parallel, &metadata)).unwrap();
    assert_eq!(first, second);
    assert!(first.contains("\"user_name\": \"octocat\""));
    assert!(first.contains("HTTP 410 Gone"));
}

#[tokio::test]
async fn test_harvester_convert_end_to_end() {
    let server = MockServer::start().await;
    mount_page(&server, "/doc", 200, REFERENCE_PAGE).await;

    let harvester = Harvester::new(create_test_scraper(2), CatalogConfig::default());
    let url = format!("{}/doc", server.uri());

    let results = harvester
        .convert(ConvertRequest {
            api_urls: vec![url.clone()],
            user_name: "octocat".to_string(),
            overrides: IndexMap::new(),
        })
        .await
        .expect("convert failed");

    let entry = results.get(&url).unwrap().data().unwrap();
    assert_eq!(entry.user_name, "octocat");
    assert_eq!(entry.api_name, "List Users");
    assert_eq!(entry.api_call, "/v1/users");
    assert_eq!(entry.api_arguments.len(), 2);
}

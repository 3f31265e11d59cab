//! Integration tests for the HTTP API
//!
//! Each test starts the router on an ephemeral port and drives it with a
//! real HTTP client; target pages are served by wiremock.

use serde_json::Value;
use std::net::SocketAddr;
use web_analyzer::config::Config;
use web_analyzer::server::{router, AppState};
use web_analyzer::ErrorResponse;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Starts the API in the background and returns its address
async fn spawn_api(config: &Config) -> SocketAddr {
    let state = AppState::from_config(config).expect("Failed to build state");
    let server = config.server.clone();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to read address");

    tokio::spawn(async move {
        axum::serve(listener, router(state, &server)).await.ok();
    });

    addr
}

async fn get_analyze(addr: SocketAddr, target: Option<&str>) -> reqwest::Response {
    let client = reqwest::Client::new();
    let mut request = client.get(format!("http://{}/analyze", addr));
    if let Some(target) = target {
        request = request.query(&[("url", target)]);
    }
    request.send().await.expect("API request failed")
}

async fn expect_error(response: reqwest::Response, status: u16, message: &str) {
    assert_eq!(response.status().as_u16(), status);
    let body: ErrorResponse = response.json().await.expect("Invalid error body");
    assert_eq!(body, ErrorResponse::new(status, message));
}

#[tokio::test]
async fn test_missing_url_parameter() {
    let addr = spawn_api(&Config::default()).await;

    expect_error(get_analyze(addr, None).await, 400, "URL parameter is required").await;
    expect_error(get_analyze(addr, Some("")).await, 400, "URL parameter is required").await;
}

#[tokio::test]
async fn test_invalid_url_format() {
    let addr = spawn_api(&Config::default()).await;

    expect_error(
        get_analyze(addr, Some("not-a-url")).await,
        400,
        "invalid URL format, please provide a valid URL",
    )
    .await;
}

#[tokio::test]
async fn test_unreachable_target() {
    let addr = spawn_api(&Config::default()).await;

    let closed = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let target = format!("http://{}/", closed.local_addr().unwrap());
    drop(closed);

    expect_error(
        get_analyze(addr, Some(&target)).await,
        400,
        "URL is not reachable, please provide a valid URL",
    )
    .await;
}

#[tokio::test]
async fn test_repeated_url_parameter_gets_json_error() {
    let addr = spawn_api(&Config::default()).await;

    let response = reqwest::Client::new()
        .get(format!("http://{}/analyze?url=a&url=b", addr))
        .send()
        .await
        .expect("API request failed");

    assert_eq!(response.status().as_u16(), 400);
    let body: ErrorResponse = response.json().await.expect("Invalid error body");
    assert_eq!(body.status, 400);
    assert!(!body.error.is_empty());
}

#[tokio::test]
async fn test_cors_allows_configured_origin() {
    let addr = spawn_api(&Config::default()).await;

    let response = reqwest::Client::new()
        .get(format!("http://{}/analyze", addr))
        .header("origin", "http://localhost:3000")
        .send()
        .await
        .expect("API request failed");

    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "http://localhost:3000"
    );
    assert_eq!(
        response.headers()["access-control-allow-credentials"],
        "true"
    );
}

#[tokio::test]
async fn test_cors_preflight() {
    let mut config = Config::default();
    config.server.allowed_origins = vec!["https://app.example.com".to_string()];
    let addr = spawn_api(&config).await;

    let response = reqwest::Client::new()
        .request(reqwest::Method::OPTIONS, format!("http://{}/analyze", addr))
        .header("origin", "https://app.example.com")
        .header("access-control-request-method", "GET")
        .send()
        .await
        .expect("Preflight request failed");

    assert!(response.status().is_success());
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "https://app.example.com"
    );
    let methods = response.headers()["access-control-allow-methods"]
        .to_str()
        .unwrap()
        .to_string();
    assert!(methods.contains("GET"), "methods: {}", methods);
}

#[tokio::test]
async fn test_cors_ignores_unknown_origin() {
    let addr = spawn_api(&Config::default()).await;

    let response = reqwest::Client::new()
        .get(format!("http://{}/analyze", addr))
        .header("origin", "https://evil.example.com")
        .send()
        .await
        .expect("API request failed");

    assert!(response
        .headers()
        .get("access-control-allow-origin")
        .is_none());
}

#[tokio::test]
async fn test_non_200_target() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let addr = spawn_api(&Config::default()).await;

    expect_error(
        get_analyze(addr, Some(&mock_server.uri())).await,
        400,
        "URL returned non-200 status",
    )
    .await;
}

#[tokio::test]
async fn test_successful_analysis_returns_report() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();
    let body = format!(
        r#"<!DOCTYPE html><html><head><title>Home</title></head><body>
        <h1>Welcome</h1><h3>News</h3>
        <a href="{base}/about">About</a>
        </body></html>"#
    );
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&mock_server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/about"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let addr = spawn_api(&Config::default()).await;
    let response = get_analyze(addr, Some(&base)).await;

    assert_eq!(response.status().as_u16(), 200);
    let report: Value = response.json().await.expect("Invalid report body");

    assert_eq!(report["title"], "Home");
    assert_eq!(report["html_version"], "HTML5");
    assert_eq!(report["headings"]["h1"], 1);
    assert_eq!(report["headings"]["h3"], 1);
    assert_eq!(report["internal_links"], 1);
    assert_eq!(report["external_links"], 0);
    assert_eq!(report["inaccessible_links"], 0);
    assert_eq!(report["has_login_form"], false);
}

#[tokio::test]
async fn test_analysis_failure_is_server_error() {
    let mock_server = MockServer::start().await;
    // Validation GET succeeds, the analyzer's own fetch then times out
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(std::time::Duration::from_secs(3)))
        .mount(&mock_server)
        .await;

    let mut config = Config::default();
    config.http.fetch_timeout_ms = 1_000;
    let addr = spawn_api(&config).await;

    expect_error(
        get_analyze(addr, Some(&mock_server.uri())).await,
        500,
        "failed to fetch the URL",
    )
    .await;
}

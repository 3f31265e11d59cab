//! Integration tests for page analysis
//!
//! These tests use wiremock to serve pages and link targets and run the
//! full fetch, extract, probe and merge cycle end-to-end.

use async_trait::async_trait;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;
use web_analyzer::analyzer::build_http_client;
use web_analyzer::config::{Config, HttpConfig};
use web_analyzer::{AnalysisError, Analyzer, LinkProber, ProbeStatus};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Prober that reports every link as reachable without touching the network
struct ReachableProber;

#[async_trait]
impl LinkProber for ReachableProber {
    async fn probe(&self, _url: &Url) -> ProbeStatus {
        ProbeStatus::Reachable { status_code: 200 }
    }
}

struct PanickingProber;

#[async_trait]
impl LinkProber for PanickingProber {
    async fn probe(&self, _url: &Url) -> ProbeStatus {
        panic!("probe task crashed");
    }
}

/// Prober that never finishes; counts how many probes started and were dropped
#[derive(Default)]
struct StalledProber {
    started: Arc<AtomicUsize>,
    released: Arc<AtomicUsize>,
}

struct ReleaseOnDrop(Arc<AtomicUsize>);

impl Drop for ReleaseOnDrop {
    fn drop(&mut self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl LinkProber for StalledProber {
    async fn probe(&self, _url: &Url) -> ProbeStatus {
        self.started.fetch_add(1, Ordering::SeqCst);
        let _release = ReleaseOnDrop(Arc::clone(&self.released));
        std::future::pending::<ProbeStatus>().await
    }
}

/// Log sink shared between a test and its subscriber
#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn analyzer_with(prober: Arc<dyn LinkProber>) -> Analyzer {
    let client = build_http_client(&HttpConfig::default()).expect("Failed to build client");
    Analyzer::new(client, prober, Duration::from_secs(5), 4)
}

async fn serve_page(mock_server: &MockServer, body: String) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html; charset=utf-8")
                .set_body_string(body),
        )
        .mount(mock_server)
        .await;
}

fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to read address");
    drop(listener);
    format!("http://{}/", addr)
}

#[tokio::test]
async fn test_minimal_page_end_to_end() {
    let mock_server = MockServer::start().await;
    serve_page(
        &mock_server,
        r#"<html><head><title>Test Page</title></head><body><h1>Heading 1</h1><a href="http://example.com">Link</a></body></html>"#
            .to_string(),
    )
    .await;

    let analyzer = analyzer_with(Arc::new(ReachableProber));
    let url = Url::parse(&mock_server.uri()).unwrap();
    let report = analyzer.analyze(&url).await.expect("Analysis failed");

    assert_eq!(report.title, "Test Page");
    assert_eq!(report.html_version, "Unknown HTML version");
    assert_eq!(report.headings.len(), 1);
    assert_eq!(report.headings.get("h1"), 1);
    assert_eq!(report.links.internal, 0);
    assert_eq!(report.links.external, 1);
    assert_eq!(report.links.inaccessible, 0);
    assert!(!report.has_login_form);
}

#[tokio::test]
async fn test_http_probes_against_live_targets() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();
    let unreachable = closed_port_url();

    let body = format!(
        r#"<!DOCTYPE html>
        <html><head><title>Links</title></head><body>
        <h2>Internal</h2>
        <a href="{base}/ok">ok</a>
        <a href="{base}/missing">missing</a>
        <a href="/relative">skipped</a>
        <h2>External</h2>
        <a href="{unreachable}">gone</a>
        <form action="/login"><input type="text" name="user"><input type="password" name="pass"></form>
        </body></html>"#
    );
    serve_page(&mock_server, body).await;

    Mock::given(method("HEAD"))
        .and(path("/ok"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let analyzer = Analyzer::from_config(&Config::default()).unwrap();
    let url = Url::parse(&base).unwrap();
    let report = analyzer.analyze(&url).await.expect("Analysis failed");

    assert_eq!(report.title, "Links");
    assert_eq!(report.html_version, "HTML5");
    assert_eq!(report.headings.get("h2"), 2);
    assert_eq!(report.links.internal, 2);
    assert_eq!(report.links.external, 1);
    assert_eq!(report.links.inaccessible, 2);
    assert!(report.has_login_form);
}

#[tokio::test]
async fn test_error_status_page_is_still_analyzed() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<title>Down</title>"))
        .mount(&mock_server)
        .await;

    let analyzer = analyzer_with(Arc::new(ReachableProber));
    let url = Url::parse(&mock_server.uri()).unwrap();
    let report = analyzer.analyze(&url).await.expect("Analysis failed");

    assert_eq!(report.title, "Down");
}

#[tokio::test]
async fn test_connection_refused_is_fetch_failure() {
    let analyzer = analyzer_with(Arc::new(ReachableProber));
    let url = Url::parse(&closed_port_url()).unwrap();

    for _ in 0..3 {
        assert_eq!(analyzer.analyze(&url).await, Err(AnalysisError::FetchFailed));
    }
}

#[tokio::test]
async fn test_fetch_timeout_is_fetch_failure() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&mock_server)
        .await;

    let mut config = Config::default();
    config.http.fetch_timeout_ms = 200;
    let analyzer = Analyzer::from_config(&config).unwrap();
    let url = Url::parse(&mock_server.uri()).unwrap();

    assert_eq!(analyzer.analyze(&url).await, Err(AnalysisError::FetchFailed));
}

#[tokio::test]
async fn test_probe_crash_fails_whole_run() {
    let mock_server = MockServer::start().await;
    serve_page(
        &mock_server,
        r#"<title>T</title><a href="https://a.example/">a</a><a href="https://b.example/">b</a>"#
            .to_string(),
    )
    .await;

    let analyzer = analyzer_with(Arc::new(PanickingProber));
    let url = Url::parse(&mock_server.uri()).unwrap();

    assert_eq!(
        analyzer.analyze(&url).await,
        Err(AnalysisError::LinkProbeFailed)
    );
}

#[tokio::test]
async fn test_dropping_analysis_releases_probes() {
    let mock_server = MockServer::start().await;
    serve_page(
        &mock_server,
        r#"<a href="https://a.example/">a</a><a href="https://b.example/">b</a><a href="https://c.example/">c</a>"#
            .to_string(),
    )
    .await;

    let prober = Arc::new(StalledProber::default());
    let started = Arc::clone(&prober.started);
    let released = Arc::clone(&prober.released);

    let analyzer = analyzer_with(prober);
    let url = Url::parse(&mock_server.uri()).unwrap();

    let result = tokio::time::timeout(Duration::from_millis(500), analyzer.analyze(&url)).await;
    assert!(result.is_err(), "stalled probes must not complete");

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(started.load(Ordering::SeqCst), 3);
    assert_eq!(released.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_logs_go_to_injected_dispatch() {
    let mock_server = MockServer::start().await;
    serve_page(
        &mock_server,
        r#"<title>Logged</title><a href="https://a.example/">a</a>"#.to_string(),
    )
    .await;

    let buf = SharedBuf::default();
    let writer = buf.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();

    let analyzer =
        analyzer_with(Arc::new(ReachableProber)).with_dispatch(tracing::Dispatch::new(subscriber));
    let url = Url::parse(&mock_server.uri()).unwrap();
    analyzer.analyze(&url).await.expect("Analysis failed");

    let logs = buf.contents();
    assert!(logs.contains("Fetching the web page"), "logs: {}", logs);
    assert!(logs.contains("Web page analysis completed successfully"));
}

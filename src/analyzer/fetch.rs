//! Outbound page fetching
//!
//! This module handles the HTTP side of an analysis run:
//! - Building the shared HTTP client from configuration
//! - GET requests for the analyzed page, bounded by a deadline
//! - Draining the response body
//!
//! Failures map onto the terminal `AnalysisError` kinds; nothing is retried.

use crate::config::HttpConfig;
use crate::{AnalysisError, AnalysisResult};
use reqwest::{Client, Response};
use std::time::Duration;
use url::Url;

/// Builds an HTTP client with proper configuration
///
/// Request deadlines are applied per request (page fetch or probe), the
/// client only carries the user agent and the connect timeout.
///
/// # Example
///
/// ```
/// use web_analyzer::analyzer::build_http_client;
/// use web_analyzer::config::HttpConfig;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .connect_timeout(config.connect_timeout())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Issues the GET for the analyzed page
///
/// Any transport-level failure, including hitting `timeout`, yields
/// [`AnalysisError::FetchFailed`]. The status code is not inspected here.
pub async fn fetch_page(client: &Client, url: &Url, timeout: Duration) -> AnalysisResult<Response> {
    match client.get(url.clone()).timeout(timeout).send().await {
        Ok(response) => {
            tracing::debug!(url = %url, status = response.status().as_u16(), "Page responded");
            Ok(response)
        }
        Err(e) => {
            let reason = if e.is_timeout() {
                "Request timeout".to_string()
            } else if e.is_connect() {
                "Connection refused".to_string()
            } else {
                e.to_string()
            };
            tracing::warn!(url = %url, error = %reason, "Failed to fetch page");
            Err(AnalysisError::FetchFailed)
        }
    }
}

/// Buffers the full response body as text
pub async fn read_body(response: Response) -> AnalysisResult<String> {
    response.text().await.map_err(|e| {
        tracing::warn!(error = %e, "Failed to read response body");
        AnalysisError::ReadBodyFailed
    })
}

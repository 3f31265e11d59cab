//! Target URL validation
//!
//! Requests to the analysis endpoint are checked before any analysis work
//! starts:
//! - The parameter must be present and non-empty
//! - It must parse as an absolute `http`/`https` URL with a host
//! - A GET to it must succeed and answer `200 OK`
//!
//! Each rejection maps to one [`UrlError`] variant whose message is sent
//! back to the client unchanged.

use crate::{UrlError, UrlResult};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use url::Url;

/// Parses a raw request parameter into a target URL
///
/// # Examples
///
/// ```
/// use web_analyzer::validator::parse_target_url;
/// use web_analyzer::UrlError;
///
/// assert!(parse_target_url("https://example.com/").is_ok());
/// assert_eq!(parse_target_url(""), Err(UrlError::Missing));
/// assert_eq!(parse_target_url("example.com"), Err(UrlError::InvalidFormat));
/// ```
pub fn parse_target_url(raw: &str) -> UrlResult<Url> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(UrlError::Missing);
    }

    let url = Url::parse(raw).map_err(|_| UrlError::InvalidFormat)?;

    match url.scheme() {
        "http" | "https" if url.host_str().is_some_and(|h| !h.is_empty()) => Ok(url),
        _ => Err(UrlError::InvalidFormat),
    }
}

/// Checks that a target URL is well-formed and currently answers `200 OK`
#[derive(Debug, Clone)]
pub struct UrlValidator {
    client: Client,
    timeout: Duration,
}

impl UrlValidator {
    pub fn new(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Validates `raw` and returns the parsed URL
    ///
    /// The reachability check is a full GET; its body is discarded.
    pub async fn validate(&self, raw: &str) -> UrlResult<Url> {
        let url = parse_target_url(raw)?;

        let response = self
            .client
            .get(url.clone())
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                tracing::debug!(url = %url, error = %e, "Target URL is not reachable");
                UrlError::NotReachable
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::debug!(url = %url, status = status.as_u16(), "Target URL returned non-200 status");
            return Err(UrlError::Non200Status {
                status: status.as_u16(),
            });
        }

        Ok(url)
    }
}

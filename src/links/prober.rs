//! Reachability probes for link targets

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Outcome of probing one link
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeStatus {
    /// The target answered with a status below 400
    Reachable { status_code: u16 },

    /// The target answered with a status of 400 or above
    HttpError { status_code: u16 },

    /// No response (connection refused, DNS failure, timeout, ...)
    NetworkError { error: String },
}

impl ProbeStatus {
    /// Maps an HTTP status code to a probe outcome
    pub fn from_status_code(status_code: u16) -> Self {
        if status_code >= 400 {
            Self::HttpError { status_code }
        } else {
            Self::Reachable { status_code }
        }
    }

    pub fn is_accessible(&self) -> bool {
        matches!(self, Self::Reachable { .. })
    }

    /// Status code of the response, if one arrived
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Reachable { status_code } | Self::HttpError { status_code } => {
                Some(*status_code)
            }
            Self::NetworkError { .. } => None,
        }
    }
}

/// A liveness check for a single link target
///
/// Implementations must not fail: every problem reaching the target is
/// reported as a [`ProbeStatus`].
#[async_trait]
pub trait LinkProber: Send + Sync {
    async fn probe(&self, url: &Url) -> ProbeStatus;
}

/// Probes links with header-only HEAD requests
#[derive(Debug, Clone)]
pub struct HttpProber {
    client: Client,
    timeout: Duration,
}

impl HttpProber {
    /// Creates a prober that gives each probe at most `timeout`
    pub fn new(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }
}

#[async_trait]
impl LinkProber for HttpProber {
    async fn probe(&self, url: &Url) -> ProbeStatus {
        match self
            .client
            .head(url.clone())
            .timeout(self.timeout)
            .send()
            .await
        {
            Ok(response) => ProbeStatus::from_status_code(response.status().as_u16()),
            Err(e) => {
                let error = if e.is_timeout() {
                    "Request timeout".to_string()
                } else if e.is_connect() {
                    "Connection refused".to_string()
                } else {
                    e.to_string()
                };
                ProbeStatus::NetworkError { error }
            }
        }
    }
}

use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for web-analyzer
///
/// Every section and field has a default, so an empty (or absent) file is
/// a valid configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub http: HttpConfig,
    pub probing: ProbingConfig,
}

/// HTTP API listener configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Browser origins allowed to call the API (CORS)
    #[serde(rename = "allowed-origins")]
    pub allowed_origins: Vec<String>,
}

impl ServerConfig {
    /// Returns the `host:port` string to bind
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8081,
            allowed_origins: vec!["http://localhost:3000".to_string()],
        }
    }
}

/// Outbound HTTP configuration shared by page fetches and link probes
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Deadline for fetching (and reading) the analyzed page (milliseconds)
    #[serde(rename = "fetch-timeout-ms")]
    pub fetch_timeout_ms: u64,

    /// Deadline for a single link probe (milliseconds)
    #[serde(rename = "probe-timeout-ms")]
    pub probe_timeout_ms: u64,

    /// Deadline for establishing a TCP/TLS connection (milliseconds)
    #[serde(rename = "connect-timeout-ms")]
    pub connect_timeout_ms: u64,
}

impl HttpConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("web-analyzer/{}", env!("CARGO_PKG_VERSION")),
            fetch_timeout_ms: 30_000,
            probe_timeout_ms: 10_000,
            connect_timeout_ms: 10_000,
        }
    }
}

/// Link probing configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProbingConfig {
    /// Maximum number of link probes in flight for one analysis
    #[serde(rename = "max-concurrent-probes")]
    pub max_concurrent_probes: usize,
}

impl Default for ProbingConfig {
    fn default() -> Self {
        Self {
            max_concurrent_probes: 32,
        }
    }
}

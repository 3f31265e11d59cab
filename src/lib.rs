//! web-analyzer: structural reports for a single web page
//!
//! This crate fetches a page and produces a report containing its title,
//! detected HTML version, heading histogram, internal/external/inaccessible
//! link counts, and whether it carries a login form. Extraction units and
//! link probes run concurrently and are merged into one report.

pub mod analyzer;
pub mod config;
pub mod links;
pub mod parser;
pub mod report;
pub mod server;
pub mod validator;

use thiserror::Error;

/// Main error type for web-analyzer operations
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("Failed to bind server to {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Terminal outcomes of a single analysis run
///
/// The set is closed: callers match on variants rather than messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum AnalysisError {
    /// The page could not be reached at the transport level
    #[error("failed to fetch the URL")]
    FetchFailed,

    /// The response body could not be drained
    #[error("failed to read response body")]
    ReadBodyFailed,

    /// The link probing machinery itself broke down
    #[error("failed to analyze page links")]
    LinkProbeFailed,
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid environment override {key}={value}")]
    InvalidOverride { key: String, value: String },
}

/// Target URL validation errors
///
/// The messages are returned verbatim to API clients.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("URL parameter is required")]
    Missing,

    #[error("invalid URL format, please provide a valid URL")]
    InvalidFormat,

    #[error("URL is not reachable, please provide a valid URL")]
    NotReachable,

    #[error("URL returned non-200 status")]
    Non200Status { status: u16 },
}

/// Result type alias for web-analyzer operations
pub type Result<T> = std::result::Result<T, AnalyzerError>;

/// Result type alias for a single analysis run
pub type AnalysisResult<T> = std::result::Result<T, AnalysisError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL validation
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use analyzer::{AnalysisPhase, AnalysisRequest, Analyzer};
pub use config::Config;
pub use links::{HttpProber, LinkProber, ProbeStatus};
pub use parser::HtmlVersion;
pub use report::{AnalysisReport, ErrorResponse, HeadingHistogram, LinkTally};

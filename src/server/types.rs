use crate::analyzer::{build_http_client, Analyzer};
use crate::config::Config;
use crate::validator::UrlValidator;
use serde::Deserialize;
use std::sync::Arc;

/// Shared state handed to every request handler
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<Analyzer>,
    pub validator: Arc<UrlValidator>,
}

impl AppState {
    pub fn new(analyzer: Arc<Analyzer>, validator: Arc<UrlValidator>) -> Self {
        Self {
            analyzer,
            validator,
        }
    }

    /// Builds the analyzer and validator from `config`
    ///
    /// Both share one HTTP client; validation uses the page fetch timeout.
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let client = build_http_client(&config.http)?;
        let validator = UrlValidator::new(client.clone(), config.http.fetch_timeout());
        let analyzer = Analyzer::with_client(client, config);

        Ok(Self::new(Arc::new(analyzer), Arc::new(validator)))
    }
}

/// Query parameters of `GET /analyze`
#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeParams {
    pub url: Option<String>,
}

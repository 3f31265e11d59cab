//! HTTP API for page analysis
//!
//! Exposes a single endpoint:
//! - `GET /analyze?url=<target>` - validates the target, analyzes it and
//!   returns the report as JSON
//!
//! Failures are returned as an `ErrorResponse` body: validation problems
//! with `400 Bad Request`, analysis failures with `500 Internal Server Error`.
//!
//! Browser access is limited to the configured `allowed-origins` by a CORS
//! layer.

mod handlers;
mod types;

use crate::config::ServerConfig;
use crate::AnalyzerError;
use axum::http::{header, HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use url::Url;

use handlers::analyze_handler;
pub use types::{AnalyzeParams, AppState};

/// Builds the API router, with CORS for `config.allowed_origins`
pub fn router(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .route("/analyze", get(analyze_handler))
        .layer(cors_layer(&config.allowed_origins))
        .with_state(state)
}

/// CORS policy for the browser frontend
///
/// Entries are reduced to their origin (`scheme://host[:port]`); entries
/// that are not URLs are skipped with a warning.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|entry| {
            let origin = Url::parse(entry).ok()?.origin().ascii_serialization();
            match HeaderValue::from_str(&origin) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::warn!(origin = %entry, error = %e, "Skipping invalid allowed origin");
                    None
                }
            }
        })
        .collect();

    if origins.len() < allowed_origins.len() {
        tracing::warn!(
            configured = allowed_origins.len(),
            usable = origins.len(),
            "Some allowed origins were ignored"
        );
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::ORIGIN, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}

/// Binds the configured address and serves the API until the process exits
pub async fn serve(config: &ServerConfig, state: AppState) -> crate::Result<()> {
    let addr = config.bind_address();

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| AnalyzerError::Bind {
            addr: addr.clone(),
            source,
        })?;

    tracing::info!("Server listening on http://{}/", addr);
    tracing::info!("  - Analyze: http://{}/analyze?url=<target>", addr);

    axum::serve(listener, router(state, config)).await?;

    Ok(())
}

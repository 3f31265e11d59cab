use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::types::{AnalyzeParams, AppState};
use crate::report::ErrorResponse;

/// Validates the `url` parameter, runs the analysis and returns its report
pub async fn analyze_handler(
    State(state): State<AppState>,
    params: Result<Query<AnalyzeParams>, QueryRejection>,
) -> Response {
    tracing::info!("Received request for /analyze endpoint");

    let params = match params {
        Ok(Query(params)) => params,
        Err(rejection) => {
            return error_response(
                ErrorResponse::new(400, rejection.body_text()),
                "Malformed query string",
            )
        }
    };

    let raw = params.url.unwrap_or_default();
    let url = match state.validator.validate(&raw).await {
        Ok(url) => url,
        Err(e) => return error_response(ErrorResponse::from(&e), "Invalid URL parameter"),
    };

    tracing::info!(url = %url, "Start analyzing web page");

    match state.analyzer.analyze(&url).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => error_response(ErrorResponse::from(&e), "Web page analysis failed"),
    }
}

fn error_response(body: ErrorResponse, context: &str) -> Response {
    tracing::error!(status = body.status, error = %body.error, context, "API error occurred");

    let status = StatusCode::from_u16(body.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(body)).into_response()
}

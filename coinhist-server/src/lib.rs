//! HTTP surface of coinhist.
//!
//! - `GET /` welcome string
//! - `GET /health` liveness
//! - `GET /exchanges` registered exchanges and the tokens each serves
//! - `GET /historical/{exchange}/{interval}` newest-first price series
//!
//! Errors are plain text: `400` for a bad interval, `404` for an unknown
//! exchange, `500` when the exchange fails or answers with something unreadable.

pub mod config;

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use coinhist::{CoinhistError, Gateway};
use serde::Serialize;
use serde_json::json;
use tower_http::trace::TraceLayer;

pub use config::ServerConfig;

/// Body of `GET /`.
pub const WELCOME: &str = "Welcome to the Bitcoin Historical Data API";

const JSON_UTF8: &str = "application/json; charset=utf-8";

/// Build the router over a shared gateway.
pub fn app(gateway: Arc<Gateway>) -> Router {
    Router::new()
        .route("/", get(welcome))
        .route("/health", get(health))
        .route("/exchanges", get(exchanges))
        .route("/historical/:exchange/:interval", get(historical))
        .layer(TraceLayer::new_for_http())
        .with_state(gateway)
}

fn json_utf8<T: Serialize>(body: T) -> Response {
    ([(header::CONTENT_TYPE, JSON_UTF8)], Json(body)).into_response()
}

async fn welcome() -> Response {
    json_utf8(WELCOME)
}

async fn health() -> Response {
    json_utf8(json!({ "status": "ok" }))
}

async fn exchanges(State(gateway): State<Arc<Gateway>>) -> Response {
    json_utf8(gateway.exchanges())
}

async fn historical(
    State(gateway): State<Arc<Gateway>>,
    Path((exchange, interval)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let points = gateway.history(&exchange, &interval).await?;
    Ok(json_utf8(points))
}

/// A gateway error on its way to becoming a plain-text response.
#[derive(Debug)]
pub struct ApiError(pub CoinhistError);

impl From<CoinhistError> for ApiError {
    fn from(e: CoinhistError) -> Self {
        Self(e)
    }
}

/// Status code a gateway error maps to.
#[must_use]
pub fn status_for(e: &CoinhistError) -> StatusCode {
    match e {
        CoinhistError::UnknownExchange { .. } => StatusCode::NOT_FOUND,
        e if e.is_validation() => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        tracing::warn!(status = status.as_u16(), error = %self.0, "request failed");
        (status, self.0.to_string()).into_response()
    }
}

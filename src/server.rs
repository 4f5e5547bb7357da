//! The proxy endpoint the presentation layer talks to.
//!
//! Browsers cannot fetch third-party feeds directly (cross-origin), so
//! `GET /api/rss?url=...` performs the fetch server-side and re-emits the
//! upstream XML verbatim with permissive CORS headers and a short public
//! cache lifetime. Failures come back as JSON `{error, details?}` with
//! the taxonomy's status mapping.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use crate::config::Config;
use crate::error::FeedError;
use crate::fetch::{build_client, fetch_feed};
use crate::util::validate_feed_url;

/// Shared per-process state: one HTTP client reused across requests plus
/// the immutable configuration. Nothing here is mutated after startup.
#[derive(Clone)]
pub struct AppState {
    client: reqwest::Client,
    config: Arc<Config>,
}

impl AppState {
    pub fn new(client: reqwest::Client, config: Config) -> Self {
        AppState {
            client,
            config: Arc::new(config),
        }
    }
}

/// Query parameters for the feed proxy.
#[derive(Debug, Deserialize)]
pub struct ProxyQuery {
    /// Absolute URL of the upstream feed.
    pub url: Option<String>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/rss", get(proxy_feed).options(preflight))
        .with_state(state)
}

/// Binds the listener and serves the proxy until the process exits.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let client = build_client(&config.user_agent)?;
    let bind = config.bind;
    let state = AppState::new(client, config);
    let app = create_router(state);

    tracing::info!(addr = %bind, "starting feed proxy");

    let listener = tokio::net::TcpListener::bind(bind).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn proxy_feed(
    State(state): State<AppState>,
    Query(query): Query<ProxyQuery>,
) -> Response {
    let Some(url) = query.url else {
        let e = FeedError::MissingUrl;
        return error_response(status_of(&e), &e.to_string(), None);
    };

    if let Err(e) = validate_feed_url(&url, state.config.allow_private_networks) {
        tracing::warn!(url = %url, error = %e, "refusing to proxy feed URL");
        return error_response(StatusCode::BAD_REQUEST, "Invalid RSS URL", Some(e.to_string()));
    }

    match fetch_feed(&state.client, &url, state.config.fetch_timeout).await {
        Ok(body) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "application/xml".to_string()),
                (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*".to_string()),
                (header::ACCESS_CONTROL_ALLOW_METHODS, "GET".to_string()),
                (
                    header::CACHE_CONTROL,
                    format!("public, max-age={}", state.config.cache_max_age),
                ),
            ],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::warn!(url = %url, error = %e, "feed fetch failed");
            error_response(status_of(&e), "Failed to fetch RSS feed", Some(e.to_string()))
        }
    }
}

/// CORS capability check: advertises the allowed methods/headers, no body.
async fn preflight() -> Response {
    (
        StatusCode::OK,
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::ACCESS_CONTROL_ALLOW_METHODS, "GET, OPTIONS"),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
        ],
    )
        .into_response()
}

fn status_of(e: &FeedError) -> StatusCode {
    StatusCode::from_u16(e.proxy_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

fn error_response(status: StatusCode, error: &str, details: Option<String>) -> Response {
    let mut body = serde_json::json!({ "error": error });
    if let Some(details) = details {
        body["details"] = serde_json::Value::String(details);
    }
    (status, Json(body)).into_response()
}

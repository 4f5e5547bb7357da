//! Upstream feed retrieval and the fetch-then-parse pipeline.
//!
//! One logical request per invocation: no shared mutable state, no
//! retries (re-invoking with the same URL is the caller's retry), and the
//! only suspension point is the HTTP round trip, bounded by a hard
//! timeout. A timeout is a normal [`FeedError::Unreachable`] outcome, not
//! a crash.

use std::time::Duration;

use crate::error::FeedError;
use crate::feed::{parse_feed, ParseResult};

/// Default bound on the upstream round trip.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Descriptive client identifier sent upstream.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; feedlens/1.0)";

const ACCEPT_XML: &str = "application/rss+xml, application/xml, text/xml";

/// reqwest funnels every failure mode through one error type; only
/// network-layer failures count as unreachable, the rest are
/// unclassified.
fn classify_transport_error(e: reqwest::Error) -> FeedError {
    if e.is_timeout() || e.is_connect() || e.is_request() {
        FeedError::Unreachable(e.to_string())
    } else {
        FeedError::Unknown(e.to_string())
    }
}

fn upstream_message(status: u16) -> String {
    match status {
        404 => "RSS feed not found".to_string(),
        403 => "Access to RSS feed denied".to_string(),
        500..=599 => "RSS server temporarily unavailable".to_string(),
        _ => "RSS feed is not available".to_string(),
    }
}

/// Fetches the raw feed document from `url`.
///
/// Sends an XML-family `Accept` header, enforces `timeout` around the
/// whole round trip, and maps every failure into the taxonomy:
///
/// - timeout and network-layer errors become [`FeedError::Unreachable`]
/// - non-2xx statuses become [`FeedError::Upstream`] with status-specific
///   messaging
/// - anything else becomes [`FeedError::Unknown`]
///
/// # Errors
///
/// Never panics; all failures surface as [`FeedError`].
pub async fn fetch_feed(
    client: &reqwest::Client,
    url: &str,
    timeout: Duration,
) -> Result<String, FeedError> {
    let request = client.get(url).header(reqwest::header::ACCEPT, ACCEPT_XML);

    let response = tokio::time::timeout(timeout, request.send())
        .await
        .map_err(|_| {
            FeedError::Unreachable(format!("request timed out after {}s", timeout.as_secs()))
        })?
        .map_err(classify_transport_error)?;

    let status = response.status();
    if !status.is_success() {
        tracing::warn!(url = %url, status = %status, "upstream returned non-success status");
        return Err(FeedError::Upstream {
            status: status.as_u16(),
            message: upstream_message(status.as_u16()),
        });
    }

    response.text().await.map_err(classify_transport_error)
}

/// The stateless pipeline: fetch `url`, parse the body, resolve images.
///
/// This is the single entry point a caller needs; it owns no state beyond
/// the borrowed client, so concurrent invocations need no coordination.
/// Every failure path is classified into [`FeedError`] before returning.
pub async fn fetch_and_parse(
    client: &reqwest::Client,
    url: &str,
    timeout: Duration,
) -> ParseResult {
    let body = fetch_feed(client, url, timeout).await?;
    parse_feed(&body)
}

/// Builds the HTTP client the pipeline and proxy share.
pub fn build_client(user_agent: &str) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder().user_agent(user_agent).build()
}

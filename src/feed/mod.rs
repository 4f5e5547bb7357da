//! Feed parsing: RSS/Atom XML in, structured articles out.
//!
//! The module is organized into two submodules:
//!
//! - [`entry`] - a flattened, namespace-tolerant view of one feed entry,
//!   keeping both the parsed elements and the raw markup slice (the image
//!   strategies need both)
//! - [`parser`] - streams the document with `quick-xml`, classifies
//!   failures into the [`FeedError`](crate::error::FeedError) taxonomy,
//!   and resolves a thumbnail per entry

pub mod entry;
pub mod parser;

use serde::Serialize;

use crate::error::{ErrorKind, FeedError};

pub use parser::parse_feed;

/// One normalized feed entry.
///
/// Constructed once per parse pass and immutable afterwards. `pub_date` is
/// the raw source string; no date normalization happens here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Article {
    /// Sequence index, unique within a single parse.
    pub id: usize,
    pub title: String,
    /// Raw description, possibly HTML-bearing.
    pub description: String,
    pub link: String,
    #[serde(rename = "pubDate")]
    pub pub_date: String,
    pub author: Option<String>,
    pub category: Option<String>,
    pub guid: Option<String>,
    /// Resolved thumbnail URL, when any strategy produced one.
    pub image: Option<String>,
}

/// Result of one fetch/parse invocation, `Ok` only when at least one
/// article was produced.
pub type ParseResult = Result<Vec<Article>, FeedError>;

/// The discriminated shape the presentation layer consumes.
///
/// Callers must branch on `error` before reading `items`; `message` is
/// display-only and `kind` is the stable tag for programmatic handling.
#[derive(Debug, Serialize)]
pub struct FeedResponse {
    pub error: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    pub items: Vec<Article>,
}

impl From<ParseResult> for FeedResponse {
    fn from(result: ParseResult) -> Self {
        match result {
            Ok(items) => FeedResponse {
                error: false,
                message: format!("Successfully loaded {} articles", items.len()),
                kind: None,
                status: None,
                items,
            },
            Err(e) => FeedResponse {
                error: true,
                message: e.to_string(),
                kind: Some(e.kind()),
                status: e.upstream_status(),
                items: Vec::new(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_from_success() {
        let articles = vec![Article {
            id: 0,
            title: "Hello".into(),
            description: String::new(),
            link: "https://example.com/1".into(),
            pub_date: String::new(),
            author: None,
            category: None,
            guid: None,
            image: None,
        }];
        let result: ParseResult = Ok(articles);
        let resp = FeedResponse::from(result);
        assert!(!resp.error);
        assert_eq!(resp.items.len(), 1);
        assert_eq!(resp.message, "Successfully loaded 1 articles");
        assert!(resp.status.is_none());
    }

    #[test]
    fn test_response_from_upstream_failure_carries_status() {
        let result: ParseResult = Err(FeedError::Upstream {
            status: 404,
            message: "RSS feed not found".into(),
        });
        let resp = FeedResponse::from(result);
        assert!(resp.error);
        assert_eq!(resp.status, Some(404));
        assert_eq!(resp.kind, Some(ErrorKind::UpstreamError));
        assert!(resp.items.is_empty());
    }

    #[test]
    fn test_response_serializes_pub_date_key() {
        let result: ParseResult = Err(FeedError::EmptyFeed);
        let resp = FeedResponse::from(result);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["error"], true);
        assert_eq!(json["kind"], "empty_feed");
        assert!(json.get("status").is_none());
    }
}

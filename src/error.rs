//! The closed failure taxonomy of the fetch/parse pipeline.
//!
//! Every failure the pipeline can experience is mapped to one
//! [`FeedError`] variant before it reaches a caller; nothing here is
//! fatal to the process. Callers branch on [`ErrorKind`], never on the
//! display text, which is advisory only.

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    /// The caller did not supply a feed URL at all.
    #[error("RSS URL is required")]
    MissingUrl,

    /// The upstream host could not be reached: connection failure, DNS
    /// failure, or the bounded timeout elapsing.
    #[error("Unable to connect to RSS feed - check your internet connection: {0}")]
    Unreachable(String),

    /// The upstream server answered with a non-success HTTP status.
    /// `message` is pre-phrased per status class.
    #[error("{message}")]
    Upstream { status: u16, message: String },

    /// The response body was not well-formed XML.
    #[error("RSS feed format is invalid: {0}")]
    Malformed(String),

    /// The response body was empty or whitespace-only.
    #[error("RSS feed is empty")]
    EmptyFeed,

    /// Well-formed XML, but with zero `<item>`/`<entry>` nodes.
    #[error("RSS feed contains no articles")]
    NoArticles,

    /// A failure the pipeline could not classify.
    #[error("Failed to load RSS feed: {0}")]
    Unknown(String),
}

/// The stable, serializable tag for each [`FeedError`] variant.
///
/// This is what crosses the wire in [`FeedResponse`](crate::feed::FeedResponse)
/// and what callers match on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    MissingUrl,
    Unreachable,
    UpstreamError,
    MalformedFeed,
    EmptyFeed,
    NoArticles,
    Unknown,
}

impl FeedError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FeedError::MissingUrl => ErrorKind::MissingUrl,
            FeedError::Unreachable(_) => ErrorKind::Unreachable,
            FeedError::Upstream { .. } => ErrorKind::UpstreamError,
            FeedError::Malformed(_) => ErrorKind::MalformedFeed,
            FeedError::EmptyFeed => ErrorKind::EmptyFeed,
            FeedError::NoArticles => ErrorKind::NoArticles,
            FeedError::Unknown(_) => ErrorKind::Unknown,
        }
    }

    /// The upstream HTTP status, when this failure carries one.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            FeedError::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The HTTP status the proxy answers with for this failure: the
    /// caller's own mistakes are 400, upstream statuses are passed
    /// through, everything else is a 500.
    pub fn proxy_status(&self) -> u16 {
        match self {
            FeedError::MissingUrl => 400,
            FeedError::Upstream { status, .. } => *status,
            _ => 500,
        }
    }
}

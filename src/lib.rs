//! feedlens: RSS/Atom feed proxy and parser with multi-strategy thumbnail
//! resolution.
//!
//! The core is a stateless pipeline: [`fetch::fetch_and_parse`] takes a
//! feed URL and a timeout and returns either a list of normalized
//! [`feed::Article`]s or a classified [`error::FeedError`]. Around it sits
//! a small [`server`] exposing the fetch as a CORS-friendly proxy
//! endpoint for browser callers.
//!
//! The interesting part is [`image`]: syndication formats embed images in
//! wildly different places, so each entry goes through a priority-ordered
//! cascade of six extraction strategies, with heuristic scoring when one
//! strategy produces several candidates.

pub mod config;
pub mod error;
pub mod feed;
pub mod fetch;
pub mod image;
pub mod server;
pub mod util;

use regex::Regex;
use std::net::IpAddr;
use std::sync::LazyLock;
use thiserror::Error;
use url::Url;

/// Errors that can occur during feed-URL validation.
///
/// These errors cover both parsing failures and security policy violations
/// designed to prevent SSRF (Server-Side Request Forgery) attacks: the
/// proxy fetches arbitrary caller-supplied URLs, so it must refuse to be
/// pointed at internal infrastructure.
#[derive(Error, Debug)]
pub enum UrlValidationError {
    /// The URL string could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The URL uses a scheme other than http or https.
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    /// The URL points to a private/internal IP address.
    #[error("Private IP address not allowed: {0}")]
    PrivateIp(String),
    /// The URL points to localhost.
    #[error("Localhost not allowed")]
    Localhost,
}

/// Validates a feed URL before the proxy fetches it.
///
/// Rejects non-HTTP(S) schemes always. When `allow_private` is false it
/// additionally rejects localhost, loopback, and private/link-local
/// addresses (RFC 1918, fe80::/10, fc00::/7). Passing `allow_private =
/// true` restores feeds served from a LAN.
///
/// # Errors
///
/// Returns [`UrlValidationError`] if:
/// - The URL cannot be parsed ([`UrlValidationError::InvalidUrl`])
/// - The scheme is not `http` or `https` ([`UrlValidationError::UnsupportedScheme`])
/// - The host is localhost ([`UrlValidationError::Localhost`])
/// - The host is a private IP address ([`UrlValidationError::PrivateIp`])
pub fn validate_feed_url(url_str: &str, allow_private: bool) -> Result<Url, UrlValidationError> {
    let url = Url::parse(url_str)?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }

    if allow_private {
        return Ok(url);
    }

    if let Some(host) = url.host_str() {
        if host == "localhost" {
            return Err(UrlValidationError::Localhost);
        }

        // Strip brackets from IPv6 addresses for parsing
        let host_for_parse = host
            .strip_prefix('[')
            .and_then(|h| h.strip_suffix(']'))
            .unwrap_or(host);

        if let Ok(ip) = host_for_parse.parse::<IpAddr>() {
            if ip.is_loopback() {
                return Err(UrlValidationError::Localhost);
            }
            if is_private_ip(&ip) {
                return Err(UrlValidationError::PrivateIp(ip.to_string()));
            }
        }
    }

    Ok(url)
}

fn is_private_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(ipv4) => {
            ipv4.is_private() || ipv4.is_loopback() || ipv4.is_link_local() || ipv4.is_unspecified()
        }
        IpAddr::V6(ipv6) => {
            if ipv6.is_loopback() || ipv6.is_unspecified() {
                return true;
            }
            let segments = ipv6.segments();
            // Unique Local (fc00::/7)
            let is_unique_local = (segments[0] & 0xfe00) == 0xfc00;
            // Link-Local (fe80::/10)
            let is_link_local = (segments[0] & 0xffc0) == 0xfe80;
            is_unique_local || is_link_local
        }
    }
}

static IMAGE_EXTENSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.(jpg|jpeg|png|gif|webp|svg)(\?.*)?$").unwrap());
static HTTP_URL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^https?://.+").unwrap());
static DATA_IMAGE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^data:image/.+").unwrap());

/// Whether a string is plausible as an image URL.
///
/// This is the single gate every image-extraction strategy passes a
/// candidate through before it is considered usable. Accepts any of:
///
/// - a known image extension (optionally followed by a query string)
/// - an inline `data:image/` URL
/// - an `http(s)` URL that does not smuggle a `javascript:` marker
///
/// Purely syntactic; nothing is fetched.
pub fn is_valid_image_url(url: &str) -> bool {
    if url.is_empty() {
        return false;
    }

    IMAGE_EXTENSION.is_match(url)
        || DATA_IMAGE_URL.is_match(url)
        || (HTTP_URL.is_match(url) && !url.contains("javascript:"))
}

//! The six image-extraction strategies.
//!
//! Each strategy is a pure function over one entry: it inspects one image
//! source convention and returns zero or more candidates, tolerating
//! missing elements and malformed attribute soup. Strategies other than
//! the media-metadata one gate their candidates through the URL validator
//! as part of finding them (an invalid match means "keep looking", not
//! "give up"); media candidates are validated by the resolver so that
//! structured width/height information reaches the scorer first.

use regex::Regex;
use std::sync::LazyLock;

use crate::feed::entry::{EntryElement, RawEntry};
use crate::image::{ImageCandidate, ImageSource};
use crate::util::is_valid_image_url;

// -- Strategy 1: structured media metadata ----------------------------------

static MEDIA_TAG_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r#"<media:content[^>]+url=["']([^"']+)["'][^>]*medium=["']image["']"#).unwrap(),
        Regex::new(r#"<media:content[^>]+url=["']([^"']+)["'][^>]*type=["']image/[^"']+["']"#)
            .unwrap(),
        Regex::new(r#"<content[^>]+url=["']([^"']+)["'][^>]*medium=["']image["']"#).unwrap(),
    ]
});

static WIDTH_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"width=["'](\d+)["']"#).unwrap());
static HEIGHT_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"height=["'](\d+)["']"#).unwrap());

fn is_image_media(element: &EntryElement) -> bool {
    let medium_is_image = element.attr("medium") == Some("image");
    let type_is_image = element
        .attr("type")
        .is_some_and(|t| t.starts_with("image"));
    medium_is_image || type_is_image
}

/// Media-namespace `content` elements marked as an image medium or image
/// MIME type. The element query is namespace-agnostic (a bare `content`
/// tag with the right attributes counts); when it finds nothing, raw-text
/// pattern matching takes over for documents whose media tags a lenient
/// parser would mangle.
pub(super) fn media_content(entry: &RawEntry) -> Vec<ImageCandidate> {
    let mut candidates: Vec<ImageCandidate> = entry
        .elements
        .iter()
        .filter(|e| e.local_name() == "content" && is_image_media(e))
        .filter_map(|e| {
            let url = e.attr("url")?;
            Some(ImageCandidate {
                url: url.to_string(),
                width: parse_dimension(e.attr("width")),
                height: parse_dimension(e.attr("height")),
                mime: e.attr("type").map(str::to_string),
                source: ImageSource::MediaContent,
            })
        })
        .collect();

    if !candidates.is_empty() {
        return candidates;
    }

    for pattern in MEDIA_TAG_PATTERNS.iter() {
        for captures in pattern.captures_iter(&entry.raw) {
            let tag_text = &captures[0];
            candidates.push(ImageCandidate {
                url: captures[1].to_string(),
                width: captured_dimension(&WIDTH_ATTR, tag_text),
                height: captured_dimension(&HEIGHT_ATTR, tag_text),
                mime: None,
                source: ImageSource::MediaContentPattern,
            });
        }
    }
    candidates
}

fn parse_dimension(attr: Option<&str>) -> u32 {
    attr.and_then(|v| v.trim().parse().ok()).unwrap_or(0)
}

fn captured_dimension(pattern: &Regex, tag_text: &str) -> u32 {
    pattern
        .captures(tag_text)
        .and_then(|c| c[1].parse().ok())
        .unwrap_or(0)
}

// -- Strategy 2: enclosure --------------------------------------------------

/// First image-typed `enclosure` attachment. At most one candidate; no
/// scoring needed downstream.
pub(super) fn enclosure(entry: &RawEntry) -> Vec<ImageCandidate> {
    entry
        .all_local("enclosure")
        .find(|e| e.attr("type").is_some_and(|t| t.starts_with("image")))
        .and_then(|e| e.attr("url"))
        .filter(|url| is_valid_image_url(url))
        .map(|url| {
            vec![ImageCandidate {
                url: url.to_string(),
                width: 0,
                height: 0,
                mime: None,
                source: ImageSource::Enclosure,
            }]
        })
        .unwrap_or_default()
}

// -- Strategy 3: thumbnail --------------------------------------------------

/// Dedicated thumbnail element, namespaced or not; URL attribute wins over
/// text content.
pub(super) fn thumbnail(entry: &RawEntry) -> Vec<ImageCandidate> {
    let Some(element) = entry.first_local("thumbnail") else {
        return Vec::new();
    };

    let url = element
        .attr("url")
        .map(str::to_string)
        .unwrap_or_else(|| element.text.trim().to_string());

    if is_valid_image_url(&url) {
        vec![ImageCandidate {
            url,
            width: 0,
            height: 0,
            mime: None,
            source: ImageSource::Thumbnail,
        }]
    } else {
        Vec::new()
    }
}

// -- Strategy 4: embedded content image -------------------------------------

static IMG_SRC_QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<img[^>]+src=["']([^"']+)["'][^>]*>"#).unwrap());
static IMG_SRC_UNQUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<img[^>]+src=([^\s>]+)").unwrap());
static SRC_WITH_EXTENSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)src=["']([^"']+\.(?:jpg|jpeg|png|gif|webp|svg))["']"#).unwrap()
});
static BARE_IMAGE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)https?://[^\s<>"]+\.(?:jpg|jpeg|png|gif|webp|svg)(\?[^\s<>"]*)?"#).unwrap()
});

/// Layered pattern scan over a blob of HTML-ish text: quoted `<img src>`,
/// unquoted `<img src>`, any quoted src with an image extension, finally
/// any bare image-extension URL. First validator-passing hit wins.
fn first_image_in_html(content: &str) -> Option<String> {
    for pattern in [&*IMG_SRC_QUOTED, &*IMG_SRC_UNQUOTED, &*SRC_WITH_EXTENSION] {
        if let Some(captures) = pattern.captures(content) {
            let url = captures[1].to_string();
            if is_valid_image_url(&url) {
                return Some(url);
            }
        }
    }

    // Whole-match pattern: the URL itself is the hit
    if let Some(m) = BARE_IMAGE_URL.find(content) {
        let url = m.as_str().to_string();
        if is_valid_image_url(&url) {
            return Some(url);
        }
    }
    None
}

/// Scans rich-content fields (`content:encoded`, then `description`) for
/// embedded image markup.
pub(super) fn embedded_content(entry: &RawEntry) -> Vec<ImageCandidate> {
    for field in ["encoded", "description"] {
        let Some(element) = entry.first_local(field) else {
            continue;
        };
        if let Some(url) = first_image_in_html(&element.text) {
            return vec![ImageCandidate {
                url,
                width: 0,
                height: 0,
                mime: None,
                source: ImageSource::EmbeddedContent,
            }];
        }
    }
    Vec::new()
}

// -- Strategy 5: ad-hoc image-like tags -------------------------------------

const CUSTOM_TAG_NAMES: &[&str] = &["image", "thumbnail", "photo", "picture", "img"];

static CUSTOM_TAG_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<(?:image|thumbnail|photo|picture)[^>]*(?:url|src|href)=["']([^"']+)["']"#)
        .unwrap()
});

/// Nonstandard tags some publishers use. Tries the common URL-bearing
/// attributes, then text content, then a raw-text pattern scan across the
/// whole entry markup.
pub(super) fn custom_tags(entry: &RawEntry) -> Vec<ImageCandidate> {
    for tag in CUSTOM_TAG_NAMES {
        let Some(element) = entry.first_local(tag) else {
            continue;
        };
        let url = element
            .attr("url")
            .or_else(|| element.attr("src"))
            .or_else(|| element.attr("href"))
            .map(str::to_string)
            .unwrap_or_else(|| element.text.trim().to_string());

        if is_valid_image_url(&url) {
            return vec![custom_candidate(url)];
        }
    }

    if let Some(captures) = CUSTOM_TAG_PATTERN.captures(&entry.raw) {
        let url = captures[1].to_string();
        if is_valid_image_url(&url) {
            return vec![custom_candidate(url)];
        }
    }
    Vec::new()
}

fn custom_candidate(url: String) -> ImageCandidate {
    ImageCandidate {
        url,
        width: 0,
        height: 0,
        mime: None,
        source: ImageSource::CustomTag,
    }
}

// -- Strategy 6: social/meta tags -------------------------------------------

static META_IMAGE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        // Attribute order is not canonical in scraped markup, so both
        // property-first and content-first variants are tried
        Regex::new(r#"<meta[^>]*property=["']og:image["'][^>]*content=["']([^"']+)["']"#).unwrap(),
        Regex::new(r#"<meta[^>]*name=["']twitter:image["'][^>]*content=["']([^"']+)["']"#).unwrap(),
        Regex::new(r#"<meta[^>]*content=["']([^"']+)["'][^>]*property=["']og:image["']"#).unwrap(),
    ]
});

/// Last resort: Open Graph / Twitter image markers anywhere in the entry's
/// raw text.
pub(super) fn meta_tags(entry: &RawEntry) -> Vec<ImageCandidate> {
    for pattern in META_IMAGE_PATTERNS.iter() {
        if let Some(captures) = pattern.captures(&entry.raw) {
            let url = captures[1].to_string();
            if is_valid_image_url(&url) {
                return vec![ImageCandidate {
                    url,
                    width: 0,
                    height: 0,
                    mime: None,
                    source: ImageSource::MetaTag,
                }];
            }
        }
    }
    Vec::new()
}

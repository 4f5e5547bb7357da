//! Multi-strategy image resolution for feed entries.
//!
//! Syndication formats disagree on how (or whether) they embed a
//! representative image, so resolution runs six independent extraction
//! strategies in a fixed priority order: structured, typed sources first
//! (media metadata, enclosures, thumbnails), content- and meta-mined
//! guesses last. The resolver stops at the first strategy that yields a
//! usable candidate; when one strategy yields several, the scorer picks
//! the best.

pub mod score;
mod strategies;

use crate::feed::entry::RawEntry;
use crate::util::is_valid_image_url;

pub use score::select_best;

/// Which strategy produced a candidate. Feeds into scoring (structured
/// media elements get a trust bonus).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    /// `media:content` element with image medium/type.
    MediaContent,
    /// Media-content tag recovered by pattern matching over raw markup.
    MediaContentPattern,
    /// Image-typed `enclosure` element.
    Enclosure,
    /// `media:thumbnail`/`thumbnail` element.
    Thumbnail,
    /// `<img>` mined out of `content:encoded`/`description` markup.
    EmbeddedContent,
    /// Nonstandard image-like tag (`image`, `photo`, `picture`, ...).
    CustomTag,
    /// Open Graph / Twitter meta marker in the raw entry text.
    MetaTag,
}

/// A still-unranked image URL plus whatever metadata the strategy could
/// read. Lives only for the duration of one entry's resolution.
#[derive(Debug, Clone)]
pub struct ImageCandidate {
    pub url: String,
    /// Pixels; 0 when unknown.
    pub width: u32,
    /// Pixels; 0 when unknown.
    pub height: u32,
    pub mime: Option<String>,
    pub source: ImageSource,
}

/// Priority-ordered strategy table. Structured sources are trusted before
/// mined guesses (precision over recall).
const STRATEGIES: &[(&str, fn(&RawEntry) -> Vec<ImageCandidate>)] = &[
    ("media_content", strategies::media_content),
    ("enclosure", strategies::enclosure),
    ("thumbnail", strategies::thumbnail),
    ("embedded_content", strategies::embedded_content),
    ("custom_tags", strategies::custom_tags),
    ("meta_tags", strategies::meta_tags),
];

/// Resolves at most one image URL for a feed entry.
///
/// Folds over the strategies in priority order, stopping at the first one
/// that yields a candidate surviving [`is_valid_image_url`]. Every URL
/// this function returns has passed that gate.
pub fn resolve_image(entry: &RawEntry) -> Option<String> {
    for (name, strategy) in STRATEGIES {
        let mut candidates = strategy(entry);
        // The media strategy defers URL validation to this point; for the
        // rest this is a no-op re-check
        candidates.retain(|c| is_valid_image_url(&c.url));

        if let Some(url) = select_best(&candidates) {
            tracing::trace!(strategy = name, url = %url, "resolved entry image");
            return Some(url);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use crate::feed::parser::parse_feed;

    fn entry_of(feed: &str) -> Option<String> {
        let articles = parse_feed(feed).unwrap();
        articles.into_iter().next().unwrap().image
    }

    #[test]
    fn test_media_content_wins_over_enclosure() {
        let feed = r#"<rss xmlns:media="http://search.yahoo.com/mrss/"><channel><item>
            <title>Both</title>
            <media:content url="https://cdn.example.com/media.jpg" medium="image" width="640" height="400"/>
            <enclosure url="https://cdn.example.com/enclosure.jpg" type="image/jpeg" length="1234"/>
        </item></channel></rss>"#;
        assert_eq!(
            entry_of(feed).as_deref(),
            Some("https://cdn.example.com/media.jpg")
        );
    }

    #[test]
    fn test_enclosure_wins_over_description_img() {
        let feed = r#"<rss><channel><item>
            <title>Both</title>
            <enclosure url="https://cdn.example.com/enclosure.png" type="image/png"/>
            <description>&lt;img src="https://cdn.example.com/inline.jpg"&gt;</description>
        </item></channel></rss>"#;
        assert_eq!(
            entry_of(feed).as_deref(),
            Some("https://cdn.example.com/enclosure.png")
        );
    }

    #[test]
    fn test_invalid_media_candidates_fall_through() {
        // The only structured candidate is a javascript: URL; resolution
        // must skip it and find the description image instead
        let feed = r#"<rss xmlns:media="http://search.yahoo.com/mrss/"><channel><item>
            <media:content url="javascript:alert(1)" medium="image"/>
            <description>&lt;img src="https://cdn.example.com/safe.jpg"&gt;</description>
        </item></channel></rss>"#;
        assert_eq!(
            entry_of(feed).as_deref(),
            Some("https://cdn.example.com/safe.jpg")
        );
    }

    #[test]
    fn test_multiple_media_candidates_are_scored() {
        let feed = r#"<rss xmlns:media="http://search.yahoo.com/mrss/"><channel><item>
            <media:content url="https://cdn.example.com/tiny.jpg" medium="image" width="50" height="50"/>
            <media:content url="https://cdn.example.com/ideal.jpg" medium="image" width="800" height="500"/>
            <media:content url="https://cdn.example.com/huge.jpg" medium="image" width="1600" height="1200"/>
        </item></channel></rss>"#;
        assert_eq!(
            entry_of(feed).as_deref(),
            Some("https://cdn.example.com/ideal.jpg")
        );
    }

    #[test]
    fn test_no_image_anywhere_is_none() {
        let feed = r#"<rss><channel><item><title>Text only</title></item></channel></rss>"#;
        assert_eq!(entry_of(feed), None);
    }
}

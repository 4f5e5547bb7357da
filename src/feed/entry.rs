//! A flattened, namespace-tolerant view of one feed entry.
//!
//! Third-party feeds disagree on namespacing (`media:content` vs a bare
//! `content`), so elements keep their full qualified name and expose the
//! local part separately. The raw markup slice of the entry is retained
//! for the strategies that fall back to pattern scanning.

/// One element found inside a feed entry, in document order.
#[derive(Debug, Clone)]
pub struct EntryElement {
    /// Qualified name as written in the source, lowercased
    /// (e.g. `media:content`).
    pub name: String,
    /// Attributes in source order, keys lowercased, values unescaped.
    pub attrs: Vec<(String, String)>,
    /// Text and CDATA content, entities unescaped, including text inside
    /// nested child elements (in document order).
    pub text: String,
}

impl EntryElement {
    /// The name without its namespace prefix.
    pub fn local_name(&self) -> &str {
        match self.name.rsplit_once(':') {
            Some((_, local)) => local,
            None => &self.name,
        }
    }

    /// First attribute value for `key` (case-insensitive key match).
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// One feed entry: all descendant elements flattened in document order,
/// plus the entry's raw markup.
#[derive(Debug, Clone, Default)]
pub struct RawEntry {
    pub elements: Vec<EntryElement>,
    /// The full source slice of the entry, including its wrapping
    /// `<item>`/`<entry>` tags.
    pub raw: String,
}

impl RawEntry {
    /// First element whose local name matches, in document order.
    pub fn first_local(&self, local: &str) -> Option<&EntryElement> {
        self.elements.iter().find(|e| e.local_name() == local)
    }

    /// All elements whose local name matches, in document order.
    pub fn all_local<'a>(&'a self, local: &'a str) -> impl Iterator<Item = &'a EntryElement> {
        self.elements.iter().filter(move |e| e.local_name() == local)
    }

    /// Trimmed text content of the first element with this local name,
    /// empty string when the element is missing.
    pub fn text_of(&self, local: &str) -> String {
        self.first_local(local)
            .map(|e| e.text.trim().to_string())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(name: &str, attrs: &[(&str, &str)], text: &str) -> EntryElement {
        EntryElement {
            name: name.to_string(),
            attrs: attrs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_local_name_strips_prefix() {
        assert_eq!(element("media:content", &[], "").local_name(), "content");
        assert_eq!(element("title", &[], "").local_name(), "title");
    }

    #[test]
    fn test_first_local_is_document_order() {
        let entry = RawEntry {
            elements: vec![
                element("media:thumbnail", &[("url", "a.jpg")], ""),
                element("thumbnail", &[("url", "b.jpg")], ""),
            ],
            raw: String::new(),
        };
        let first = entry.first_local("thumbnail").unwrap();
        assert_eq!(first.attr("url"), Some("a.jpg"));
    }

    #[test]
    fn test_text_of_missing_element_is_empty() {
        let entry = RawEntry::default();
        assert_eq!(entry.text_of("title"), "");
    }
}

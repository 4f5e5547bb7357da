use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::FeedError;
use crate::feed::entry::{EntryElement, RawEntry};
use crate::feed::{Article, ParseResult};
use crate::image::resolve_image;

/// Parses raw feed XML into articles.
///
/// Classification rules, in order:
/// - empty/whitespace-only input is [`FeedError::EmptyFeed`]
/// - structural XML errors (unclosed elements at end of input, or a body
///   with no root element at all) are [`FeedError::Malformed`]
/// - a well-formed document with zero `<item>`/`<entry>` nodes is
///   [`FeedError::NoArticles`]
///
/// Each entry's fields are looked up by local tag name so namespaced and
/// bare variants both match; `author` falls back to `dc:creator`. The
/// thumbnail is resolved per entry via [`resolve_image`].
pub fn parse_feed(text: &str) -> ParseResult {
    if text.trim().is_empty() {
        return Err(FeedError::EmptyFeed);
    }

    let entries = collect_entries(text)?;
    if entries.is_empty() {
        return Err(FeedError::NoArticles);
    }

    let articles: Vec<Article> = entries
        .iter()
        .enumerate()
        .map(|(id, entry)| build_article(id, entry))
        .collect();

    tracing::debug!(articles = articles.len(), "parsed feed");
    Ok(articles)
}

fn is_entry_tag(name: &str) -> bool {
    let local = name.rsplit_once(':').map(|(_, l)| l).unwrap_or(name);
    local == "item" || local == "entry"
}

/// Walks the document and captures every entry node, with its raw slice.
fn collect_entries(text: &str) -> Result<Vec<RawEntry>, FeedError> {
    let mut reader = Reader::from_str(text);
    let mut entries = Vec::new();
    let mut depth = 0usize;
    let mut saw_element = false;

    loop {
        // Position before the event is the byte offset of the event itself
        let event_start = reader.buffer_position() as usize;
        match reader.read_event() {
            Err(e) => return Err(FeedError::Malformed(e.to_string())),
            Ok(Event::Eof) => break,
            Ok(Event::Start(start)) => {
                saw_element = true;
                let name = qualified_name(&start);
                if is_entry_tag(&name) {
                    entries.push(read_entry(&mut reader, text, event_start, &name)?);
                } else {
                    depth += 1;
                }
            }
            Ok(Event::Empty(_)) => saw_element = true,
            Ok(Event::End(_)) => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| FeedError::Malformed("unexpected closing tag".into()))?;
            }
            Ok(_) => {}
        }
    }

    if !saw_element {
        // Plain text or a lone declaration is not a well-formed document
        return Err(FeedError::Malformed("no root element".into()));
    }
    if depth != 0 {
        return Err(FeedError::Malformed(
            "document ended with unclosed elements".into(),
        ));
    }

    Ok(entries)
}

/// Consumes events until the entry's closing tag, flattening descendant
/// elements in document order and slicing the entry's raw markup.
fn read_entry(
    reader: &mut Reader<&[u8]>,
    text: &str,
    start_offset: usize,
    entry_tag: &str,
) -> Result<RawEntry, FeedError> {
    let mut elements: Vec<EntryElement> = Vec::new();
    // Indices into `elements` for currently open descendants
    let mut open: Vec<usize> = Vec::new();

    loop {
        match reader.read_event() {
            Err(e) => return Err(FeedError::Malformed(e.to_string())),
            Ok(Event::Eof) => {
                return Err(FeedError::Malformed(format!("unclosed <{entry_tag}>")));
            }
            Ok(Event::Start(start)) => {
                elements.push(element_from(&start)?);
                open.push(elements.len() - 1);
            }
            Ok(Event::Empty(start)) => {
                elements.push(element_from(&start)?);
            }
            Ok(Event::Text(t)) => {
                if !open.is_empty() {
                    let unescaped = t
                        .unescape()
                        .map_err(|e| FeedError::Malformed(e.to_string()))?;
                    // Every open ancestor sees its descendants' text
                    for &idx in &open {
                        elements[idx].text.push_str(&unescaped);
                    }
                }
            }
            Ok(Event::CData(c)) => {
                let cdata = String::from_utf8_lossy(&c.into_inner()).into_owned();
                for &idx in &open {
                    elements[idx].text.push_str(&cdata);
                }
            }
            Ok(Event::End(_)) => {
                if open.pop().is_none() {
                    // Closing tag of the entry itself
                    let end_offset = reader.buffer_position() as usize;
                    return Ok(RawEntry {
                        elements,
                        raw: text[start_offset..end_offset].to_string(),
                    });
                }
            }
            Ok(_) => {}
        }
    }
}

fn qualified_name(start: &BytesStart) -> String {
    String::from_utf8_lossy(start.name().as_ref()).to_ascii_lowercase()
}

fn element_from(start: &BytesStart) -> Result<EntryElement, FeedError> {
    let mut attrs = Vec::new();
    // Lenient on attribute syntax; publisher markup is messy
    for attr in start.attributes().flatten() {
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_ascii_lowercase();
        let value = match attr.unescape_value() {
            Ok(v) => v.into_owned(),
            Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
        };
        attrs.push((key, value));
    }

    Ok(EntryElement {
        name: qualified_name(start),
        attrs,
        text: String::new(),
    })
}

fn build_article(id: usize, entry: &RawEntry) -> Article {
    let author = non_empty(entry.text_of("author")).or_else(|| non_empty(entry.text_of("creator")));

    Article {
        id,
        title: entry.text_of("title"),
        description: entry.text_of("description"),
        link: entry.text_of("link"),
        pub_date: entry.text_of("pubdate"),
        author,
        category: non_empty(entry.text_of("category")),
        guid: non_empty(entry.text_of("guid")),
        image: resolve_image(entry),
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

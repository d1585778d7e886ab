//! Event-driven reader for sitemap documents.

use super::{Diagnostic, Level};
use crate::generator::xml::DocumentKind;
use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesRef, BytesStart, Event};

/// One `<url>` or `<sitemap>` entry, values as written (entities resolved,
/// surrounding whitespace trimmed).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedEntry {
    pub loc: Option<String>,
    pub lastmod: Option<String>,
    pub changefreq: Option<String>,
    pub priority: Option<String>,
    pub line: usize,
    pub column: usize,
}

impl ParsedEntry {
    pub const fn position(&self) -> (usize, usize) {
        (self.line, self.column)
    }

    fn slot(&mut self, field: &str) -> Option<&mut Option<String>> {
        match field {
            "loc" => Some(&mut self.loc),
            "lastmod" => Some(&mut self.lastmod),
            "changefreq" => Some(&mut self.changefreq),
            "priority" => Some(&mut self.priority),
            _ => None,
        }
    }
}

/// A sitemap document reduced to what the checks need.
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    pub kind: DocumentKind,
    /// Default namespace declared on the root, if any.
    pub namespace: Option<String>,
    pub root_line: usize,
    pub root_column: usize,
    pub entries: Vec<ParsedEntry>,
    /// Problems found while reading that do not stop the read.
    pub notes: Vec<Diagnostic>,
}

impl ParsedDocument {
    pub const fn root_position(&self) -> (usize, usize) {
        (self.root_line, self.root_column)
    }
}

/// Fields each document kind allows inside an entry.
const fn entry_fields(kind: DocumentKind) -> &'static [&'static str] {
    match kind {
        DocumentKind::UrlSet => &["loc", "lastmod", "changefreq", "priority"],
        DocumentKind::SitemapIndex => &["loc", "lastmod"],
    }
}

/// Maps byte offsets to line and column, scanning forward only.
struct Locator<'a> {
    src: &'a [u8],
    offset: usize,
    line: usize,
    column: usize,
}

impl<'a> Locator<'a> {
    const fn new(src: &'a [u8]) -> Self {
        Self {
            src,
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    fn locate(&mut self, offset: u64) -> (usize, usize) {
        let target = usize::try_from(offset)
            .unwrap_or(usize::MAX)
            .min(self.src.len());
        if target < self.offset {
            *self = Self::new(self.src);
        }
        for &byte in &self.src[self.offset..target] {
            if byte == b'\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.offset = target;
        (self.line, self.column)
    }
}

/// Where the reader is inside the document.
enum Scope {
    /// Before the root element.
    Prolog,
    /// Directly inside the root.
    Root,
    /// Inside an entry, outside any field.
    Entry(ParsedEntry),
    /// Inside a known field of an entry, collecting its text.
    Field {
        entry: ParsedEntry,
        name: &'static str,
        text: String,
    },
    /// Inside an element whose content is ignored. The entry, if any, is
    /// resumed when `depth` closes.
    Skip {
        entry: Option<ParsedEntry>,
        depth: usize,
    },
    /// After the root element closed.
    Epilog,
}

/// Parse a sitemap document.
///
/// Malformed XML, a missing root, or a root other than `urlset` /
/// `sitemapindex` is returned as a fatal diagnostic.
pub fn read_document(xml: &str) -> Result<ParsedDocument, Diagnostic> {
    let mut reader = Reader::from_str(xml);
    let mut locator = Locator::new(xml.as_bytes());
    let mut document: Option<ParsedDocument> = None;
    let mut scope = Scope::Prolog;

    loop {
        let before = reader.buffer_position();
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(e) => {
                let position = locator.locate(reader.error_position());
                return Err(Diagnostic::new(
                    Level::Fatal,
                    position,
                    format!("malformed XML: {e}"),
                ));
            }
        };

        match event {
            Event::Start(start) if matches!(scope, Scope::Prolog) => {
                document = Some(open_root(&start, locator.locate(before))?);
                scope = Scope::Root;
            }
            Event::Empty(start) if matches!(scope, Scope::Prolog) => {
                document = Some(open_root(&start, locator.locate(before))?);
                scope = Scope::Epilog;
            }
            Event::Start(start) => {
                let Some(doc) = document.as_mut() else { continue };
                let position = locator.locate(before);
                scope = enter(scope, doc, &start, position, false);
            }
            Event::Empty(start) => {
                let Some(doc) = document.as_mut() else { continue };
                let position = locator.locate(before);
                scope = enter(scope, doc, &start, position, true);
            }
            Event::End(_) => {
                let Some(doc) = document.as_mut() else { continue };
                scope = leave(scope, doc);
            }
            Event::Text(text) => {
                if let Scope::Field { text: buffer, .. } = &mut scope {
                    buffer.push_str(&String::from_utf8_lossy(&text));
                }
            }
            Event::CData(data) => {
                if let Scope::Field { text: buffer, .. } = &mut scope {
                    buffer.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Event::GeneralRef(reference) => {
                if let Scope::Field { text: buffer, .. } = &mut scope {
                    let position = locator.locate(before);
                    buffer.push(resolve_reference(&reference, position)?);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    let position = locator.locate(reader.buffer_position());
    match (document, scope) {
        (Some(document), Scope::Epilog) => Ok(document),
        (Some(_), _) => Err(Diagnostic::new(
            Level::Fatal,
            position,
            "unexpected end of document",
        )),
        (None, _) => Err(Diagnostic::new(
            Level::Fatal,
            position,
            "document has no root element",
        )),
    }
}

fn local_name(start: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(start.local_name().as_ref()).into_owned()
}

fn has_prefix(start: &BytesStart<'_>) -> bool {
    start.name().prefix().is_some()
}

fn open_root(start: &BytesStart<'_>, position: (usize, usize)) -> Result<ParsedDocument, Diagnostic> {
    let name = local_name(start);
    let kind = DocumentKind::from_root(&name).ok_or_else(|| {
        Diagnostic::new(
            Level::Fatal,
            position,
            format!("root element <{name}> is neither <urlset> nor <sitemapindex>"),
        )
    })?;

    let namespace = start
        .attributes()
        .filter_map(Result::ok)
        .find(|attr| attr.key.as_ref() == b"xmlns")
        .map(|attr| String::from_utf8_lossy(&attr.value).into_owned());

    Ok(ParsedDocument {
        kind,
        namespace,
        root_line: position.0,
        root_column: position.1,
        entries: Vec::new(),
        notes: Vec::new(),
    })
}

/// Handle an opening tag. `empty` marks a self-closing tag, which opens
/// and closes in one event.
fn enter(
    scope: Scope,
    doc: &mut ParsedDocument,
    start: &BytesStart<'_>,
    position: (usize, usize),
    empty: bool,
) -> Scope {
    let name = local_name(start);

    match scope {
        Scope::Root if name == doc.kind.entry() && !has_prefix(start) => {
            let entry = ParsedEntry {
                line: position.0,
                column: position.1,
                ..ParsedEntry::default()
            };
            if empty {
                doc.entries.push(entry);
                Scope::Root
            } else {
                Scope::Entry(entry)
            }
        }
        Scope::Root => {
            if !has_prefix(start) {
                doc.notes.push(Diagnostic::new(
                    Level::Error,
                    position,
                    format!("unexpected element <{name}> in <{}>", doc.kind.root()),
                ));
            }
            if empty {
                Scope::Root
            } else {
                Scope::Skip {
                    entry: None,
                    depth: 1,
                }
            }
        }
        Scope::Entry(mut entry) => {
            let field = entry_fields(doc.kind)
                .iter()
                .find(|field| **field == name)
                .filter(|_| !has_prefix(start));

            match field {
                Some(&field) => {
                    if entry.slot(field).is_some_and(|slot| slot.is_some()) {
                        doc.notes.push(Diagnostic::new(
                            Level::Warning,
                            position,
                            format!("duplicate <{field}>, the last one wins"),
                        ));
                    }
                    if empty {
                        if let Some(slot) = entry.slot(field) {
                            *slot = Some(String::new());
                        }
                        Scope::Entry(entry)
                    } else {
                        Scope::Field {
                            entry,
                            name: field,
                            text: String::new(),
                        }
                    }
                }
                None => {
                    // Prefixed children are extensions (image:, news:, xhtml:)
                    if !has_prefix(start) {
                        doc.notes.push(Diagnostic::new(
                            Level::Error,
                            position,
                            format!("unexpected element <{name}> in <{}>", doc.kind.entry()),
                        ));
                    }
                    if empty {
                        Scope::Entry(entry)
                    } else {
                        Scope::Skip {
                            entry: Some(entry),
                            depth: 1,
                        }
                    }
                }
            }
        }
        Scope::Field {
            mut entry,
            name: field,
            text,
        } => {
            doc.notes.push(Diagnostic::new(
                Level::Error,
                position,
                format!("<{field}> must contain text only"),
            ));
            if empty {
                return Scope::Field {
                    entry,
                    name: field,
                    text,
                };
            }
            // Keep the text read so far; the nested element and the field
            // both close before the entry resumes
            if let Some(slot) = entry.slot(field) {
                *slot = Some(text.trim().to_string());
            }
            Scope::Skip {
                entry: Some(entry),
                depth: 2,
            }
        }
        Scope::Skip { entry, depth } => {
            if empty {
                Scope::Skip { entry, depth }
            } else {
                Scope::Skip {
                    entry,
                    depth: depth + 1,
                }
            }
        }
        Scope::Prolog => Scope::Prolog,
        Scope::Epilog => Scope::Epilog,
    }
}

fn leave(scope: Scope, doc: &mut ParsedDocument) -> Scope {
    match scope {
        Scope::Field {
            mut entry,
            name,
            text,
        } => {
            if let Some(slot) = entry.slot(name) {
                *slot = Some(text.trim().to_string());
            }
            Scope::Entry(entry)
        }
        Scope::Entry(entry) => {
            doc.entries.push(entry);
            Scope::Root
        }
        Scope::Skip { entry, depth } if depth > 1 => Scope::Skip {
            entry,
            depth: depth - 1,
        },
        // Skip ends: back to the entry it interrupted, or to the root
        Scope::Skip { entry, .. } => match entry {
            Some(entry) => Scope::Entry(entry),
            None => Scope::Root,
        },
        Scope::Root => Scope::Epilog,
        Scope::Prolog => Scope::Prolog,
        Scope::Epilog => Scope::Epilog,
    }
}

/// Resolve `&name;` or `&#N;` to its character.
fn resolve_reference(reference: &BytesRef<'_>, position: (usize, usize)) -> Result<char, Diagnostic> {
    let name = String::from_utf8_lossy(reference);

    let resolved = if let Some(code) = name.strip_prefix('#') {
        let value = match code.strip_prefix('x') {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => code.parse().ok(),
        };
        value.and_then(char::from_u32)
    } else {
        resolve_predefined_entity(&name).and_then(|s| s.chars().next())
    };

    resolved.ok_or_else(|| {
        Diagnostic::new(
            Level::Fatal,
            position,
            format!("unknown entity reference &{name};"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const URLSET: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url>
    <loc>https://example.com/</loc>
    <lastmod>2025-01-01T00:00:00+00:00</lastmod>
    <changefreq>daily</changefreq>
    <priority>1.0</priority>
  </url>
  <url>
    <loc> https://example.com/about/ </loc>
  </url>
</urlset>
"#;

    #[test]
    fn test_read_urlset() {
        let doc = read_document(URLSET).unwrap();
        assert_eq!(doc.kind, DocumentKind::UrlSet);
        assert_eq!(
            doc.namespace.as_deref(),
            Some("http://www.sitemaps.org/schemas/sitemap/0.9")
        );
        assert_eq!(doc.root_position(), (2, 1));
        assert_eq!(doc.entries.len(), 2);
        assert!(doc.notes.is_empty());

        let first = &doc.entries[0];
        assert_eq!(first.loc.as_deref(), Some("https://example.com/"));
        assert_eq!(first.changefreq.as_deref(), Some("daily"));
        assert_eq!(first.priority.as_deref(), Some("1.0"));
        assert_eq!(first.position(), (3, 3));

        let second = &doc.entries[1];
        assert_eq!(second.loc.as_deref(), Some("https://example.com/about/"));
        assert!(second.lastmod.is_none());
        assert_eq!(second.line, 9);
    }

    #[test]
    fn test_read_index() {
        let xml = r#"<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9"><sitemap><loc>https://example.com/sitemap-post.xml?paged=2</loc></sitemap></sitemapindex>"#;
        let doc = read_document(xml).unwrap();
        assert_eq!(doc.kind, DocumentKind::SitemapIndex);
        assert_eq!(
            doc.entries[0].loc.as_deref(),
            Some("https://example.com/sitemap-post.xml?paged=2")
        );
    }

    #[test]
    fn test_entities_and_char_refs() {
        let xml = "<urlset><url><loc>https://e.com/?a=1&amp;b=&#50;&#x33;</loc></url></urlset>";
        let doc = read_document(xml).unwrap();
        assert_eq!(doc.entries[0].loc.as_deref(), Some("https://e.com/?a=1&b=23"));
    }

    #[test]
    fn test_cdata_text() {
        let xml = "<urlset><url><loc><![CDATA[https://e.com/a&b]]></loc></url></urlset>";
        let doc = read_document(xml).unwrap();
        assert_eq!(doc.entries[0].loc.as_deref(), Some("https://e.com/a&b"));
    }

    #[test]
    fn test_unknown_root_is_fatal() {
        let err = read_document("<rss><channel/></rss>").unwrap_err();
        assert_eq!(err.level, Level::Fatal);
        assert!(err.message.contains("<rss>"));
    }

    #[test]
    fn test_missing_root_and_truncation() {
        assert!(read_document("").is_err());
        assert!(read_document("<?xml version=\"1.0\"?>").is_err());
        let err = read_document("<urlset><url><loc>x</loc></url>").unwrap_err();
        assert_eq!(err.level, Level::Fatal);
    }

    #[test]
    fn test_mismatched_tags_are_fatal() {
        let err = read_document("<urlset>\n  <url></loc>\n</urlset>").unwrap_err();
        assert_eq!(err.level, Level::Fatal);
        assert!(err.message.starts_with("malformed XML"));
        assert_eq!(err.line, 2);
    }

    #[test]
    fn test_unknown_children_noted() {
        let xml = "<urlset><url><loc>https://e.com/</loc><title>x</title><image:image><image:loc>y</image:loc></image:image></url><foo/></urlset>";
        let doc = read_document(xml).unwrap();
        assert_eq!(doc.entries.len(), 1);
        assert_eq!(doc.entries[0].loc.as_deref(), Some("https://e.com/"));

        // <title> and <foo> are unknown; image: is an extension
        assert_eq!(doc.notes.len(), 2);
        assert!(doc.notes.iter().all(|n| n.level == Level::Error));
        assert!(doc.notes[0].message.contains("<title>"));
        assert!(doc.notes[1].message.contains("<foo>"));
    }

    #[test]
    fn test_index_rejects_url_fields() {
        let xml = "<sitemapindex><sitemap><loc>https://e.com/s.xml</loc><priority>0.5</priority></sitemap></sitemapindex>";
        let doc = read_document(xml).unwrap();
        assert!(doc.entries[0].priority.is_none());
        assert_eq!(doc.notes.len(), 1);
    }

    #[test]
    fn test_empty_elements() {
        let doc = read_document("<urlset><url/><url><loc/></url></urlset>").unwrap();
        assert_eq!(doc.entries.len(), 2);
        assert!(doc.entries[0].loc.is_none());
        assert_eq!(doc.entries[1].loc.as_deref(), Some(""));

        let doc = read_document("<urlset/>").unwrap();
        assert!(doc.entries.is_empty());
    }

    #[test]
    fn test_duplicate_field_warns() {
        let doc =
            read_document("<urlset><url><loc>https://a.com/</loc><loc>https://b.com/</loc></url></urlset>")
                .unwrap();
        assert_eq!(doc.entries[0].loc.as_deref(), Some("https://b.com/"));
        assert_eq!(doc.notes[0].level, Level::Warning);
    }

    #[test]
    fn test_nested_markup_in_field() {
        let doc =
            read_document("<urlset><url><loc>https://a.com/<b>x</b></loc><priority>0.3</priority></url></urlset>")
                .unwrap();
        assert_eq!(doc.entries[0].loc.as_deref(), Some("https://a.com/"));
        assert_eq!(doc.entries[0].priority.as_deref(), Some("0.3"));
        assert_eq!(doc.notes.len(), 1);
    }
}

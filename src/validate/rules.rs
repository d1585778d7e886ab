//! Protocol checks over a parsed sitemap document.

use super::{Diagnostic, Level, ParsedDocument, ParsedEntry};
use crate::core::ChangeFreq;
use crate::generator::xml::{DocumentKind, SITEMAP_NS};
use crate::utils::date::DateTimeUtc;
use url::Url;

/// Entries allowed in one sitemap file.
pub const MAX_ENTRIES: usize = 50_000;

/// Longest `loc` crawlers accept.
pub const MAX_LOC_LEN: usize = 2048;

/// Run every check, returning findings in document order.
pub fn check_document(document: &ParsedDocument) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let root = document.root_position();

    match document.namespace.as_deref() {
        Some(SITEMAP_NS) => {}
        Some(other) => diagnostics.push(Diagnostic::new(
            Level::Error,
            root,
            format!("namespace `{other}` is not `{SITEMAP_NS}`"),
        )),
        None => diagnostics.push(Diagnostic::new(
            Level::Error,
            root,
            format!("<{}> does not declare xmlns=\"{SITEMAP_NS}\"", document.kind.root()),
        )),
    }

    if document.entries.is_empty() {
        diagnostics.push(Diagnostic::new(
            Level::Warning,
            root,
            "document has no entries",
        ));
    }
    if document.entries.len() > MAX_ENTRIES {
        diagnostics.push(Diagnostic::new(
            Level::Error,
            root,
            format!(
                "{} entries, at most {MAX_ENTRIES} are allowed per file",
                document.entries.len()
            ),
        ));
    }

    diagnostics.extend(document.notes.iter().cloned());
    for entry in &document.entries {
        check_entry(document.kind, entry, &mut diagnostics);
    }

    diagnostics.sort_by_key(|d| (d.line, d.column));
    diagnostics
}

fn check_entry(kind: DocumentKind, entry: &ParsedEntry, out: &mut Vec<Diagnostic>) {
    let at = entry.position();
    let mut report = |level, message: String| out.push(Diagnostic::new(level, at, message));

    match entry.loc.as_deref() {
        None | Some("") => report(Level::Error, format!("<{}> without <loc>", kind.entry())),
        Some(loc) => {
            if let Some(problem) = loc_problem(loc) {
                report(Level::Error, format!("<loc> `{loc}` {problem}"));
            }
            if loc.len() > MAX_LOC_LEN {
                report(
                    Level::Warning,
                    format!("<loc> is {} characters, longer than {MAX_LOC_LEN}", loc.len()),
                );
            }
        }
    }

    if let Some(lastmod) = entry.lastmod.as_deref()
        && DateTimeUtc::parse(lastmod).is_none()
    {
        report(
            Level::Error,
            format!("<lastmod> `{lastmod}` is not a W3C datetime"),
        );
    }

    if let Some(changefreq) = entry.changefreq.as_deref()
        && ChangeFreq::parse(changefreq).is_none()
    {
        report(
            Level::Error,
            format!("<changefreq> `{changefreq}` is not a known frequency"),
        );
    }

    if let Some(priority) = entry.priority.as_deref() {
        match priority.parse::<f64>() {
            Ok(value) if (0.0..=1.0).contains(&value) => {}
            Ok(_) => report(
                Level::Error,
                format!("<priority> {priority} is outside 0.0..=1.0"),
            ),
            Err(_) => report(
                Level::Error,
                format!("<priority> `{priority}` is not a number"),
            ),
        }
    }
}

/// Why `loc` is not a usable absolute URL, if it is not.
fn loc_problem(loc: &str) -> Option<&'static str> {
    match Url::parse(loc) {
        Ok(url) if !matches!(url.scheme(), "http" | "https") => Some("is not an http(s) URL"),
        Ok(url) if url.host_str().is_none() => Some("has no host"),
        Ok(_) => None,
        Err(_) => Some("is not an absolute URL"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::{read_document, validate_document};

    fn wrap(body: &str) -> String {
        format!(r#"<urlset xmlns="{SITEMAP_NS}">{body}</urlset>"#)
    }

    fn messages(xml: &str) -> Vec<(Level, String)> {
        validate_document(xml)
            .into_iter()
            .map(|d| (d.level, d.message))
            .collect()
    }

    #[test]
    fn test_clean_entry() {
        let xml = wrap(
            "<url><loc>https://example.com/</loc><lastmod>2025-01-01</lastmod>\
             <changefreq>weekly</changefreq><priority>0.5</priority></url>",
        );
        assert!(validate_document(&xml).is_empty());
    }

    #[test]
    fn test_namespace_checks() {
        let found = messages("<urlset><url><loc>https://e.com/</loc></url></urlset>");
        assert_eq!(found.len(), 1);
        assert!(found[0].1.contains("does not declare"));

        let found = messages(
            r#"<urlset xmlns="http://www.google.com/schemas/sitemap/0.84"><url><loc>https://e.com/</loc></url></urlset>"#,
        );
        assert_eq!(found.len(), 1);
        assert!(found[0].1.contains("0.84"));
    }

    #[test]
    fn test_missing_and_relative_loc() {
        let found = messages(&wrap("<url></url><url><loc>/about/</loc></url><url><loc>ftp://e.com/x</loc></url>"));
        assert_eq!(found.len(), 3);
        assert!(found.iter().all(|(level, _)| *level == Level::Error));
        assert!(found[0].1.contains("without <loc>"));
        assert!(found[1].1.contains("not an absolute URL"));
        assert!(found[2].1.contains("http(s)"));
    }

    #[test]
    fn test_field_values() {
        let found = messages(&wrap(
            "<url><loc>https://e.com/</loc><lastmod>yesterday</lastmod>\
             <changefreq>sometimes</changefreq><priority>1.5</priority></url>\
             <url><loc>https://e.com/b</loc><priority>high</priority></url>",
        ));
        let texts: Vec<_> = found.iter().map(|(_, m)| m.as_str()).collect();
        assert_eq!(texts.len(), 4);
        assert!(texts[0].contains("<lastmod>"));
        assert!(texts[1].contains("<changefreq>"));
        assert!(texts[2].contains("outside"));
        assert!(texts[3].contains("not a number"));
    }

    #[test]
    fn test_priority_bounds_inclusive() {
        let xml = wrap(
            "<url><loc>https://e.com/a</loc><priority>0.0</priority></url>\
             <url><loc>https://e.com/b</loc><priority>1.0</priority></url>",
        );
        assert!(validate_document(&xml).is_empty());
    }

    #[test]
    fn test_empty_document_warns() {
        let found = messages(&wrap(""));
        assert_eq!(found, [(Level::Warning, "document has no entries".to_string())]);
    }

    #[test]
    fn test_too_many_entries() {
        let body = "<url><loc>https://e.com/</loc></url>".repeat(MAX_ENTRIES + 1);
        let found = messages(&wrap(&body));
        assert_eq!(found.len(), 1);
        assert!(found[0].1.contains("at most 50000"));
    }

    #[test]
    fn test_long_loc_warns() {
        let loc = format!("https://e.com/{}", "a".repeat(MAX_LOC_LEN));
        let found = messages(&wrap(&format!("<url><loc>{loc}</loc></url>")));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].0, Level::Warning);
    }

    #[test]
    fn test_findings_sorted_by_position() {
        let xml = format!(
            "<urlset xmlns=\"{SITEMAP_NS}\">\n<url><loc>bad</loc></url>\n<bogus/>\n<url></url>\n</urlset>"
        );
        let document = read_document(&xml).unwrap();
        let lines: Vec<_> = check_document(&document).iter().map(|d| d.line).collect();
        assert_eq!(lines, [2, 3, 4]);
    }

    #[test]
    fn test_index_entries() {
        let xml = format!(
            r#"<sitemapindex xmlns="{SITEMAP_NS}"><sitemap><loc>https://e.com/sitemap-post.xml</loc><lastmod>2025-01-01T00:00:00+00:00</lastmod></sitemap></sitemapindex>"#
        );
        assert!(validate_document(&xml).is_empty());
        let found = messages(&format!(r#"<sitemapindex xmlns="{SITEMAP_NS}"><sitemap/></sitemapindex>"#));
        assert!(found[0].1.contains("<sitemap> without <loc>"));
    }
}

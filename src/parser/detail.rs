//! Article page parser
//!
//! Body text comes from one of two places, in priority order:
//! 1. An `articleBody` embedded in the page's JSON-LD metadata
//! 2. A walk over the content container's child elements
//!
//! Date, authors and tags are always read from their fixed locations,
//! whichever path produced the text. A page that matches nothing yields
//! absent fields, not an error.

use scraper::{node::Node, ElementRef, Html};
use serde_json::Value;

use crate::models::{ArticleDetail, Source};
use crate::parser::sanitize::{
    clean_author, has_content, is_advertisement, payload_to_text, translate_months,
};
use crate::parser::selectors::{DetailSelectors, JSON_LD, LIST_ITEM};
use crate::parser::{all_values, first_element, first_value};
use crate::utils::error::ParseError;
use crate::utils::{normalize_whitespace, resolve_url};

/// Elements whose whole subtree is never article text
const NOISE_TAGS: &[&str] = &[
    "script", "style", "noscript", "template", "figure", "figcaption", "img", "picture", "video",
    "audio", "iframe", "embed", "object", "nav", "footer", "aside", "form", "button", "svg",
    "ins",
];

/// Layout wrappers walked through as if their children were the container's
const WRAPPER_TAGS: &[&str] = &[
    "div", "section", "article", "main", "blockquote", "span", "strong", "em", "b", "center",
];

/// Separator between multiple authors
pub const AUTHOR_SEPARATOR: &str = ", ";

/// Article parser for one site
#[derive(Clone, Copy)]
pub struct ArticleParser {
    source: Source,
    selectors: DetailSelectors,
}

impl ArticleParser {
    #[must_use]
    pub fn new(source: Source) -> Self {
        Self {
            source,
            selectors: DetailSelectors::for_source(source),
        }
    }

    pub fn source(&self) -> Source {
        self.source
    }

    /// Parse an article page
    ///
    /// `response_url` is only used for diagnostics; links are not followed.
    pub fn parse(&self, html: &str, response_url: &str) -> ArticleDetail {
        let document = Html::parse_document(html);
        let root = document.root_element();

        let full_text = match inline_payload(&document) {
            Ok(Some(text)) => Some(text),
            Ok(None) => self.extract_body(root),
            Err(e) => {
                tracing::debug!(url = response_url, error = %e, "Ignoring inline payload");
                self.extract_body(root)
            }
        };

        if full_text.is_none() {
            tracing::debug!(
                source = %self.source,
                url = response_url,
                error = %ParseError::ContentNotFound,
                "No article text extracted"
            );
        }

        ArticleDetail {
            full_text,
            date: first_value(root, self.selectors.date).map(|d| translate_months(&d)),
            author: self.extract_authors(root),
            tags: self.extract_tags(root),
            error: None,
        }
    }

    /// Absolute URL of the single-page variant, if the page links to one
    ///
    /// Pages that already carry an inline payload need no refetch and
    /// return `None`.
    pub fn show_all_url(&self, html: &str, response_url: &str) -> Option<String> {
        let selector = self.selectors.show_all?;
        let document = Html::parse_document(html);

        if matches!(inline_payload(&document), Ok(Some(_))) {
            return None;
        }

        document
            .select(selector)
            .filter_map(|a| a.value().attr("href"))
            .find(|href| href.contains("page=all"))
            .and_then(|href| resolve_url(response_url, href))
            .filter(|url| url != response_url)
    }

    /// Walk the content container into newline-joined blocks
    fn extract_body(&self, root: ElementRef<'_>) -> Option<String> {
        let container = first_element(root, self.selectors.content)?;

        let mut blocks = Vec::new();
        collect_blocks(container, &mut blocks);

        let text = blocks.join("\n").trim().to_string();
        has_content(&text).then_some(text)
    }

    fn extract_authors(&self, root: ElementRef<'_>) -> Option<String> {
        let mut authors: Vec<String> = Vec::new();
        for name in all_values(root, self.selectors.author) {
            let name = clean_author(&name);
            if !name.is_empty() && !authors.contains(&name) {
                authors.push(name);
            }
        }

        (!authors.is_empty()).then(|| authors.join(AUTHOR_SEPARATOR))
    }

    fn extract_tags(&self, root: ElementRef<'_>) -> Vec<String> {
        let mut tags: Vec<String> = Vec::new();
        for tag in all_values(root, self.selectors.tags) {
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }
        tags
    }
}

/// Parse an article page for `source`
///
/// # Examples
///
/// ```
/// use cekfakta::models::Source;
/// use cekfakta::parser::parse_detail;
///
/// let html = r#"<div class="read__content"><p>Paragraf satu.</p><p>ADVERTISEMENT</p>
///     <h2>Penjelasan</h2><p>Paragraf dua.</p></div>"#;
///
/// let detail = parse_detail(Source::Kompas, html, "https://www.kompas.com/cekfakta/read/1");
/// assert_eq!(
///     detail.full_text.as_deref(),
///     Some("Paragraf satu.\n\nPenjelasan\n\nParagraf dua.")
/// );
/// ```
pub fn parse_detail(source: Source, html: &str, response_url: &str) -> ArticleDetail {
    ArticleParser::new(source).parse(html, response_url)
}

/// See [`ArticleParser::show_all_url`]
pub fn show_all_url(source: Source, html: &str, response_url: &str) -> Option<String> {
    ArticleParser::new(source).show_all_url(html, response_url)
}

/// Body text embedded as JSON-LD `articleBody`
fn inline_payload(document: &Html) -> Result<Option<String>, ParseError> {
    let mut last_error = None;

    for script in document.select(&JSON_LD) {
        let raw = script.text().collect::<String>();
        if raw.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<Value>(raw.trim()) {
            Ok(value) => {
                if let Some(body) = find_article_body(&value) {
                    let text = payload_to_text(body);
                    if has_content(&text) {
                        return Ok(Some(text));
                    }
                }
            }
            Err(e) => last_error = Some(ParseError::InvalidPayload(e.to_string())),
        }
    }

    match last_error {
        Some(e) => Err(e),
        None => Ok(None),
    }
}

/// `articleBody` of the value itself, an array item, or an `@graph` entry
fn find_article_body(value: &Value) -> Option<&str> {
    match value {
        Value::Object(map) => map
            .get("articleBody")
            .and_then(Value::as_str)
            .filter(|body| has_content(body))
            .or_else(|| map.get("@graph").and_then(find_article_body)),
        Value::Array(items) => items.iter().find_map(find_article_body),
        _ => None,
    }
}

fn is_noise(element: ElementRef<'_>) -> bool {
    let value = element.value();
    if NOISE_TAGS.contains(&value.name()) {
        return true;
    }

    if value
        .id()
        .is_some_and(|id| id.starts_with("div-gpt-ad") || id.starts_with("ads"))
    {
        return true;
    }

    value.classes().any(|class| {
        let class = class.to_ascii_lowercase();
        class.starts_with("ads")
            || class.contains("advert")
            || class.contains("related")
            || class.contains("sharedaddy")
            || class.starts_with("share")
            || class.contains("baca-juga")
    })
}

/// Append the text blocks under `element` in document order
fn collect_blocks(element: ElementRef<'_>, out: &mut Vec<String>) {
    for child in element.children().filter_map(ElementRef::wrap) {
        if is_noise(child) {
            continue;
        }

        match child.value().name() {
            "p" => {
                let text = visible_text(child);
                if has_content(&text) && !is_advertisement(&text) {
                    out.push(text);
                }
            }
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let text = visible_text(child);
                if has_content(&text) {
                    out.push(format!("\n{text}\n"));
                }
            }
            "ul" | "ol" => {
                let items: Vec<String> = child
                    .select(&LIST_ITEM)
                    .map(visible_text)
                    .filter(|item| has_content(item))
                    .map(|item| format!("- {item}"))
                    .collect();
                if !items.is_empty() {
                    out.push(items.join("\n"));
                }
            }
            name if WRAPPER_TAGS.contains(&name) => collect_blocks(child, out),
            _ => {}
        }
    }
}

/// Text of an element, skipping noise subtrees, whitespace collapsed
fn visible_text(element: ElementRef<'_>) -> String {
    let mut buf = String::new();
    push_visible_text(element, &mut buf);
    normalize_whitespace(&buf)
}

fn push_visible_text(element: ElementRef<'_>, buf: &mut String) {
    for node in element.children() {
        match node.value() {
            Node::Text(text) => buf.push_str(text),
            Node::Element(el) => {
                if el.name() == "br" {
                    buf.push(' ');
                    continue;
                }
                if let Some(child) = ElementRef::wrap(node) {
                    if !is_noise(child) {
                        push_visible_text(child, buf);
                    }
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://www.kompas.com/cekfakta/read/2025/08/05/1/hoaks";

    fn kompas(html: &str) -> ArticleDetail {
        parse_detail(Source::Kompas, html, URL)
    }

    #[test]
    fn test_paragraphs_headings_and_lists() {
        let detail = kompas(
            r#"<div class="read__content">
                <p>KOMPAS.com - Beredar klaim palsu.</p>
                <h3>Penelusuran</h3>
                <ul><li>Poin satu</li><li> Poin   dua </li></ul>
                <p>Kesimpulan.</p>
            </div>"#,
        );

        assert_eq!(
            detail.full_text.as_deref(),
            Some("KOMPAS.com - Beredar klaim palsu.\n\nPenelusuran\n\n- Poin satu\n- Poin dua\nKesimpulan.")
        );
    }

    #[test]
    fn test_advertisement_filtered_case_insensitive() {
        let detail = kompas(
            r#"<div class="read__content"><p>Satu</p><p>Advertisement</p><p>ADVERTISEMENT</p><p>Dua</p></div>"#,
        );
        assert_eq!(detail.full_text.as_deref(), Some("Satu\nDua"));
    }

    #[test]
    fn test_noise_subtrees_removed() {
        let detail = kompas(
            r#"<div class="read__content">
                <script>var x = "jangan";</script>
                <style>.a{}</style>
                <figure><img src="a.jpg"><figcaption>Keterangan foto</figcaption></figure>
                <div class="ads-on-body"><p>Iklan</p></div>
                <p>Teks <iframe src="x"></iframe>asli<script>bad()</script>.</p>
            </div>"#,
        );
        assert_eq!(detail.full_text.as_deref(), Some("Teks asli."));
    }

    #[test]
    fn test_nested_wrappers_walked_in_order() {
        let detail = kompas(
            r#"<div class="read__content"><div class="clearfix">
                <p>Pertama</p><div><p>Kedua</p></div></div><p>Ketiga</p></div>"#,
        );
        assert_eq!(detail.full_text.as_deref(), Some("Pertama\nKedua\nKetiga"));
    }

    #[test]
    fn test_inline_payload_takes_priority() {
        let detail = kompas(
            r#"<html><head><script type="application/ld+json">
                {"@context":"https://schema.org","@graph":[
                    {"@type":"WebPage"},
                    {"@type":"NewsArticle","articleBody":"Isi &quot;lengkap&quot; dari metadata"}
                ]}
            </script></head><body>
            <div class="read__content"><p>Isi dari DOM</p></div>
            <div class="read__time">Kompas.com - 05/08/2025, 10:15 WIB</div>
            </body></html>"#,
        );

        assert_eq!(detail.full_text.as_deref(), Some("Isi \"lengkap\" dari metadata"));
        assert_eq!(
            detail.date.as_deref(),
            Some("Kompas.com - 05/08/2025, 10:15 WIB")
        );
    }

    #[test]
    fn test_broken_payload_falls_back_to_dom() {
        let detail = kompas(
            r#"<script type="application/ld+json">{ not json</script>
               <div class="read__content"><p>Dari DOM</p></div>"#,
        );
        assert_eq!(detail.full_text.as_deref(), Some("Dari DOM"));
    }

    #[test]
    fn test_kompas_metadata() {
        let detail = kompas(
            r#"<div class="read__time">Kompas.com - 05/08/2025, 10:15 WIB</div>
               <div class="read__author">
                   <a href="/penulis/a">Nibras Nada Nailufar,</a>
                   <a href="/penulis/b">Inten Esti Pratiwi</a>
                   <a href="/penulis/a">Nibras Nada Nailufar</a>
               </div>
               <div class="tag__article__wrap">
                   <a class="tag__article__link" href="/tag/hoaks">hoaks</a>
                   <a class="tag__article__link" href="/tag/banjir">banjir</a>
               </div>"#,
        );

        assert!(detail.full_text.is_none());
        assert_eq!(
            detail.author.as_deref(),
            Some("Nibras Nada Nailufar, Inten Esti Pratiwi")
        );
        assert_eq!(detail.tags, vec!["hoaks", "banjir"]);
        assert!(detail.error.is_none());
    }

    #[test]
    fn test_turnbackhoax_article() {
        let html = r#"
            <div class="mh-content">
              <span class="entry-meta-date updated"><a href="/2025/08/06/">August 6, 2025</a></span>
              <span class="entry-meta-author author vcard"><a href="/author/x">Adi Syafitrah</a></span>
              <span class="entry-meta-categories"><a href="/c/salah">Salah</a>, <a href="/c/politik">Politik</a></span>
              <div class="entry-content">
                <p><strong>Hasil Cek Fakta</strong></p>
                <p>Beredar unggahan di Facebook.</p>
                <div class="sharedaddy"><p>Bagikan ini</p></div>
                <ol><li>Sumber satu</li><li>Sumber dua</li></ol>
              </div>
            </div>"#;

        let detail = parse_detail(Source::TurnBackHoax, html, "https://turnbackhoax.id/x/");
        assert_eq!(
            detail.full_text.as_deref(),
            Some("Hasil Cek Fakta\nBeredar unggahan di Facebook.\n- Sumber satu\n- Sumber dua")
        );
        assert_eq!(detail.date.as_deref(), Some("Agustus 6, 2025"));
        assert_eq!(detail.author.as_deref(), Some("Adi Syafitrah"));
        assert_eq!(detail.tags, vec!["Salah", "Politik"]);
    }

    #[test]
    fn test_missing_content_is_absent_not_empty() {
        let detail = kompas("<html><body><div class='read__content'>  </div></body></html>");
        assert!(detail.full_text.is_none());
        assert!(detail.author.is_none());
        assert!(detail.tags.is_empty());
    }

    #[test]
    fn test_show_all_link_detected() {
        let html = r#"<div class="paging">
            <a class="paging__link paging__link--next" href="?page=2">2</a>
            <a class="paging__link paging__link--show" href="?page=all#page2">Show All</a></div>"#;

        assert_eq!(
            show_all_url(Source::Kompas, html, URL).as_deref(),
            Some("https://www.kompas.com/cekfakta/read/2025/08/05/1/hoaks?page=all#page2")
        );
        assert!(show_all_url(Source::TurnBackHoax, html, URL).is_none());
    }

    #[test]
    fn test_show_all_skipped_with_inline_payload() {
        let html = r#"<script type="application/ld+json">{"articleBody":"Teks lengkap"}</script>
            <a class="paging__link--show" href="?page=all">Show All</a>"#;
        assert!(show_all_url(Source::Kompas, html, URL).is_none());
    }

    #[test]
    fn test_parse_detail_is_idempotent() {
        let html = r#"<div class="read__content"><p>Sama</p></div><div class="read__author">A</div>"#;
        assert_eq!(kompas(html), kompas(html));
    }
}

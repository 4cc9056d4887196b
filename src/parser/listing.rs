//! Listing page parser
//!
//! Turns one index page into article stubs. Containers are visited in
//! document order and handled independently: a container without a usable
//! permalink is skipped, never fatal to the page.

use scraper::{ElementRef, Html};
use serde::{Deserialize, Serialize};

use crate::models::{ArticleStub, Source};
use crate::parser::sanitize::{clean_author, translate_months};
use crate::parser::selectors::ListingSelectors;
use crate::parser::{element_text, first_element, first_value};
use crate::utils::error::ParseError;
use crate::utils::resolve_url;

/// Stubs extracted from one listing page
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ListingPage {
    /// 1-based page number
    pub page: u32,

    /// Valid stubs in document order
    pub stubs: Vec<ArticleStub>,

    /// Permalinks of `stubs`, same order
    pub urls: Vec<String>,

    /// Containers dropped for lack of a permalink
    pub skipped: usize,
}

impl ListingPage {
    pub fn is_empty(&self) -> bool {
        self.stubs.is_empty()
    }
}

/// Parse one listing page.
///
/// `origin` is the scheme and host that relative permalinks are resolved
/// against, e.g. `https://www.kompas.com`.
///
/// # Examples
///
/// ```
/// use cekfakta::models::Source;
/// use cekfakta::parser::parse_listing;
///
/// let html = r#"<article class="mh-loop-item">
///     <h3 class="entry-title"><a href="/2025/08/05/salah-foto/">[SALAH] Foto</a></h3>
///     <span class="mh-meta-date">August 5, 2025</span>
/// </article>"#;
///
/// let page = parse_listing(Source::TurnBackHoax, html, 1, "https://turnbackhoax.id");
/// assert_eq!(page.urls, vec!["https://turnbackhoax.id/2025/08/05/salah-foto/"]);
/// assert_eq!(page.stubs[0].timestamp_raw.as_deref(), Some("Agustus 5, 2025"));
/// ```
pub fn parse_listing(source: Source, html: &str, page_num: u32, origin: &str) -> ListingPage {
    let document = Html::parse_document(html);
    let selectors = ListingSelectors::for_source(source);

    let mut page = ListingPage {
        page: page_num,
        ..Default::default()
    };

    for (position, container) in document.select(selectors.container).enumerate() {
        match extract_stub(container, &selectors, origin) {
            Ok(stub) => {
                page.urls.push(stub.url.clone());
                page.stubs.push(stub);
            }
            Err(e) => {
                page.skipped += 1;
                tracing::debug!(
                    source = %source,
                    page = page_num,
                    position,
                    error = %e,
                    "Skipping listing container"
                );
            }
        }
    }

    tracing::debug!(
        source = %source,
        page = page_num,
        stubs = page.stubs.len(),
        skipped = page.skipped,
        "Parsed listing page"
    );

    page
}

/// Extract a stub from one article container
fn extract_stub(
    container: ElementRef<'_>,
    selectors: &ListingSelectors,
    origin: &str,
) -> Result<ArticleStub, ParseError> {
    let link = first_element(container, selectors.link).ok_or(ParseError::MissingPermalink)?;
    let href = link
        .value()
        .attr("href")
        .ok_or(ParseError::MissingPermalink)?;
    let url = resolve_url(origin, href).ok_or_else(|| ParseError::InvalidUrl(href.to_string()))?;

    let title = first_value(container, selectors.title)
        .or_else(|| Some(element_text(link)).filter(|t| !t.is_empty()))
        .or_else(|| link.value().attr("title").map(str::trim).map(String::from))
        .unwrap_or_default();

    let timestamp_raw = first_value(container, selectors.date).map(|d| translate_months(&d));

    let author = first_value(container, selectors.author)
        .map(|a| clean_author(&a))
        .filter(|a| !a.is_empty());

    Ok(ArticleStub {
        title,
        timestamp_raw,
        author,
        url,
    })
}

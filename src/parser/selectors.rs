//! CSS selectors for the supported fact-check sites
//!
//! Every field has an ordered list of selectors. The first one that matches
//! wins, so current layouts come first and legacy layouts after them.

use lazy_static::lazy_static;
use scraper::Selector;

use crate::models::Source;

// Selectors are literals; a typo is a programming error caught by the tests
macro_rules! parse_selector {
    ($s:expr) => {
        Selector::parse($s).expect(concat!("Invalid CSS selector: ", $s))
    };
}

lazy_static! {
    // TurnBackHoax listing (MH Magazine theme)
    static ref TBH_CONTAINER: Selector = parse_selector!("article.mh-loop-item");

    static ref TBH_LINK: Vec<Selector> = vec![
        parse_selector!("h3.entry-title a[href]"),
        parse_selector!(".mh-loop-title a[href]"),
        parse_selector!(".entry-title a[href]"),
    ];

    static ref TBH_TITLE: Vec<Selector> = vec![
        parse_selector!("h3.entry-title"),
        parse_selector!(".mh-loop-title"),
        parse_selector!(".entry-title"),
    ];

    static ref TBH_LIST_DATE: Vec<Selector> = vec![
        parse_selector!("span.mh-meta-date"),
        parse_selector!(".mh-loop-meta .mh-meta-date"),
    ];

    static ref TBH_LIST_AUTHOR: Vec<Selector> = vec![
        parse_selector!("span.mh-meta-author"),
        parse_selector!(".mh-loop-meta .mh-meta-author"),
    ];

    // TurnBackHoax article
    static ref TBH_CONTENT: Vec<Selector> = vec![
        parse_selector!("div.entry-content"),
        parse_selector!("div.mh-content .entry-content"),
        parse_selector!("article .post-content"),
    ];

    static ref TBH_DATE: Vec<Selector> = vec![
        parse_selector!("span.entry-meta-date"),
        parse_selector!("time.entry-date"),
        parse_selector!("meta[property='article:published_time']"),
    ];

    static ref TBH_AUTHOR: Vec<Selector> = vec![
        parse_selector!("span.entry-meta-author a"),
        parse_selector!("span.entry-meta-author"),
        parse_selector!("span.author a"),
    ];

    static ref TBH_TAGS: Vec<Selector> = vec![
        parse_selector!("span.entry-meta-categories a"),
        parse_selector!("div.entry-tags a"),
    ];

    // Kompas listing: headline, small headline items, then the grid
    static ref KOMPAS_CONTAINER: Selector = parse_selector!(
        "div.cekfakta-headlineBig, div.cekfakta-headlineSmall-item, div.cekfakta-list"
    );

    static ref KOMPAS_LINK: Vec<Selector> = vec![
        parse_selector!("a[class*='cekfakta-headline-link'][href]"),
        parse_selector!("a[class*='cekfakta-list-link'][href]"),
    ];

    static ref KOMPAS_TITLE: Vec<Selector> = vec![
        parse_selector!("h1[class*='textBig'], h2[class*='textBig'], h3[class*='textBig']"),
        parse_selector!("h1[class*='textSmall'], h2[class*='textSmall'], h3[class*='textSmall']"),
        parse_selector!(
            "h1[class*='cekfakta-list-title'], h2[class*='cekfakta-list-title'], h3[class*='cekfakta-list-title']"
        ),
    ];

    static ref KOMPAS_LIST_DATE: Vec<Selector> = vec![
        parse_selector!("p[class*='cekfakta-text-date']"),
        parse_selector!("p[class*='text-date']"),
    ];

    // Kompas article
    static ref KOMPAS_CONTENT: Vec<Selector> = vec![
        parse_selector!("div.read__content"),
        parse_selector!("div.read__article"),
        parse_selector!("div.article__content"),
    ];

    static ref KOMPAS_DATE: Vec<Selector> = vec![
        parse_selector!("div.read__time"),
        parse_selector!("meta[name='content_PublishedDate']"),
    ];

    static ref KOMPAS_AUTHOR: Vec<Selector> = vec![
        parse_selector!("div.read__author a"),
        parse_selector!("div.read__author"),
        parse_selector!("div.credit-title-name"),
    ];

    static ref KOMPAS_TAGS: Vec<Selector> = vec![
        parse_selector!("div.tag__article__wrap a.tag__article__link"),
        parse_selector!("ul.tag__article__wrap a"),
    ];

    static ref KOMPAS_SHOW_ALL: Selector = parse_selector!("a.paging__link--show[href]");

    // Shared
    pub(crate) static ref JSON_LD: Selector =
        parse_selector!("script[type='application/ld+json']");

    pub(crate) static ref LIST_ITEM: Selector = parse_selector!("li");
}

/// Selectors for one site's listing pages
#[derive(Clone, Copy)]
pub struct ListingSelectors {
    /// Matches every article container, in document order
    pub container: &'static Selector,
    pub link: &'static [Selector],
    pub title: &'static [Selector],
    pub date: &'static [Selector],
    pub author: &'static [Selector],
}

impl ListingSelectors {
    pub fn for_source(source: Source) -> Self {
        match source {
            Source::TurnBackHoax => Self {
                container: &TBH_CONTAINER,
                link: &TBH_LINK,
                title: &TBH_TITLE,
                date: &TBH_LIST_DATE,
                author: &TBH_LIST_AUTHOR,
            },
            Source::Kompas => Self {
                container: &KOMPAS_CONTAINER,
                link: &KOMPAS_LINK,
                title: &KOMPAS_TITLE,
                date: &KOMPAS_LIST_DATE,
                author: &[],
            },
        }
    }
}

/// Selectors for one site's article pages
#[derive(Clone, Copy)]
pub struct DetailSelectors {
    pub content: &'static [Selector],
    pub date: &'static [Selector],
    pub author: &'static [Selector],
    pub tags: &'static [Selector],
    /// Link to the single-page variant of a paginated article
    pub show_all: Option<&'static Selector>,
}

impl DetailSelectors {
    pub fn for_source(source: Source) -> Self {
        match source {
            Source::TurnBackHoax => Self {
                content: &TBH_CONTENT,
                date: &TBH_DATE,
                author: &TBH_AUTHOR,
                tags: &TBH_TAGS,
                show_all: None,
            },
            Source::Kompas => Self {
                content: &KOMPAS_CONTENT,
                date: &KOMPAS_DATE,
                author: &KOMPAS_AUTHOR,
                tags: &KOMPAS_TAGS,
                show_all: Some(&KOMPAS_SHOW_ALL),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_selectors_compile() {
        for source in Source::all() {
            let listing = ListingSelectors::for_source(source);
            assert!(!listing.link.is_empty());
            assert!(!listing.title.is_empty());

            let detail = DetailSelectors::for_source(source);
            assert!(!detail.content.is_empty());
            assert!(!detail.tags.is_empty());
        }
        let _ = &*JSON_LD;
        let _ = &*LIST_ITEM;
    }

    #[test]
    fn test_only_kompas_has_show_all() {
        assert!(DetailSelectors::for_source(Source::Kompas).show_all.is_some());
        assert!(DetailSelectors::for_source(Source::TurnBackHoax)
            .show_all
            .is_none());
    }
}

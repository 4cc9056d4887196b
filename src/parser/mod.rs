//! HTML parsing and data extraction
//!
//! This module turns listing pages into [`ArticleStub`]s and article pages
//! into [`ArticleDetail`]s. Parsing is synchronous and pure: the same markup
//! always yields the same result, and no `scraper::Html` outlives a call.
//!
//! [`ArticleStub`]: crate::models::ArticleStub
//! [`ArticleDetail`]: crate::models::ArticleDetail

pub mod detail;
pub mod listing;
pub mod sanitize;
pub mod selectors;

// Re-export main parser entry points
pub use detail::{parse_detail, show_all_url, ArticleParser};
pub use listing::{parse_listing, ListingPage};
pub use selectors::{DetailSelectors, ListingSelectors};

use scraper::{ElementRef, Selector};

use crate::utils::normalize_whitespace;

/// Visible text of an element with whitespace collapsed
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    normalize_whitespace(&element.text().collect::<String>())
}

/// Text of an element, or the `content` attribute for `<meta>` tags
pub(crate) fn element_value(element: ElementRef<'_>) -> Option<String> {
    let value = if element.value().name() == "meta" {
        normalize_whitespace(element.value().attr("content").unwrap_or_default())
    } else {
        element_text(element)
    };

    sanitize::has_content(&value).then_some(value)
}

/// First non-empty value matched by any of `selectors`, tried in order
pub(crate) fn first_value(scope: ElementRef<'_>, selectors: &[Selector]) -> Option<String> {
    selectors
        .iter()
        .flat_map(|selector| scope.select(selector))
        .find_map(element_value)
}

/// First element matched by any of `selectors`, tried in order
pub(crate) fn first_element<'a>(
    scope: ElementRef<'a>,
    selectors: &[Selector],
) -> Option<ElementRef<'a>> {
    selectors
        .iter()
        .find_map(|selector| scope.select(selector).next())
}

/// Values of every element matched by the first selector that matches at all
pub(crate) fn all_values(scope: ElementRef<'_>, selectors: &[Selector]) -> Vec<String> {
    for selector in selectors {
        let values: Vec<String> = scope.select(selector).filter_map(element_value).collect();
        if !values.is_empty() {
            return values;
        }
    }
    Vec::new()
}

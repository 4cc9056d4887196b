//! Listing page fetch task
//!
//! One task per page number: wait for the pacer, fetch, parse. The parsed
//! page is returned to the orchestrator; nothing shared is mutated here.

use crate::crawler::fetcher::PageFetcher;
use crate::crawler::pacer::Pacer;
use crate::models::Source;
use crate::parser::{parse_listing, ListingPage};
use crate::utils::error::FetchError;
use crate::utils::origin_of;

/// Builds listing URLs for one site
#[derive(Debug, Clone)]
pub struct ListUrlBuilder {
    source: Source,
    base_url: String,
    origin: String,
}

impl ListUrlBuilder {
    /// Create a builder for `source` rooted at `base_url`
    ///
    /// # Examples
    ///
    /// ```
    /// use cekfakta::crawler::list::ListUrlBuilder;
    /// use cekfakta::models::Source;
    ///
    /// let builder = ListUrlBuilder::new(Source::Kompas, "https://www.kompas.com/cekfakta/data-dan-fakta");
    /// assert_eq!(builder.page_url(2), "https://www.kompas.com/cekfakta/data-dan-fakta/2");
    /// assert_eq!(builder.origin(), "https://www.kompas.com");
    /// ```
    pub fn new(source: Source, base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        let origin = origin_of(&base_url).unwrap_or_else(|| base_url.clone());
        Self {
            source,
            base_url,
            origin,
        }
    }

    pub fn page_url(&self, page: u32) -> String {
        self.source.listing_url(&self.base_url, page)
    }

    pub fn probe_url(&self) -> String {
        self.source.probe_url(&self.base_url)
    }

    /// Scheme and host that relative permalinks resolve against
    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn source(&self) -> Source {
        self.source
    }
}

/// Fetch and parse listing page `page`
///
/// # Errors
///
/// Returns the `FetchError` of the page request, including checkpoint
/// redirects. Parsing itself never fails.
pub async fn fetch_listing_page<F>(
    fetcher: &F,
    pacer: &Pacer,
    urls: &ListUrlBuilder,
    page: u32,
) -> Result<ListingPage, FetchError>
where
    F: PageFetcher + ?Sized,
{
    let url = urls.page_url(page);
    pacer.wait().await;

    tracing::debug!(source = %urls.source(), page, url = %url, "Fetching listing page");
    let fetched = fetcher.fetch(&url).await?;

    Ok(parse_listing(
        urls.source(),
        &fetched.body,
        page,
        urls.origin(),
    ))
}

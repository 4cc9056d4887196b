//! Article detail fetch task
//!
//! Fetches one article, follows the "show all" link when the page offers
//! one, and parses the result.

use crate::crawler::fetcher::PageFetcher;
use crate::crawler::pacer::Pacer;
use crate::models::ArticleDetail;
use crate::parser::ArticleParser;
use crate::utils::error::FetchError;

/// Fetch and parse one article
///
/// Both the article request and the show-all refetch wait for the pacer
/// first.
///
/// # Errors
///
/// Returns the `FetchError` of either request. A failed show-all refetch
/// fails the whole article.
pub async fn fetch_article<F>(
    fetcher: &F,
    pacer: &Pacer,
    parser: &ArticleParser,
    url: &str,
) -> Result<ArticleDetail, FetchError>
where
    F: PageFetcher + ?Sized,
{
    pacer.wait().await;
    let page = fetcher.fetch(url).await?;

    let Some(full_url) = parser.show_all_url(&page.body, &page.final_url) else {
        return Ok(parser.parse(&page.body, &page.final_url));
    };

    tracing::debug!(url, show_all = %full_url, "Fetching single-page variant");
    pacer.wait().await;
    let full = fetcher.fetch(&full_url).await.inspect_err(|e| {
        tracing::warn!(url, show_all = %full_url, error = %e, "Show-all fetch failed");
    })?;

    Ok(parser.parse(&full.body, &full.final_url))
}

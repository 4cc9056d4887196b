//! Crawling: HTTP session, pacing, fetch tasks and the run orchestrator
//!
//! A run is driven by [`Orchestrator`]: a connectivity probe, a bounded
//! listing phase producing [`ArticleStub`](crate::models::ArticleStub)s, and a
//! bounded detail phase merging [`ArticleDetail`](crate::models::ArticleDetail)s
//! back by URL.

pub mod article;
pub mod fetcher;
pub mod headers;
pub mod list;
pub mod orchestrator;
pub mod pacer;

pub use article::fetch_article;
pub use fetcher::{create_session, is_checkpoint_url, FetchedPage, HttpFetcher, PageFetcher};
pub use headers::build_browser_headers;
pub use list::{fetch_listing_page, ListUrlBuilder};
pub use orchestrator::{CrawlPhase, CrawlReport, Orchestrator, PageFailure, RecordSet};
pub use pacer::Pacer;

//! Two-phase crawl orchestrator
//!
//! # Phases
//!
//! ```text
//! Init ──probe──▶ Listing ──stubs > 0──▶ Detail ──▶ Persisted ──▶ Done
//!   │                │
//!   └──── Aborted ◀──┘  (probe failed/blocked, or no stubs)
//! ```
//!
//! Each phase fans out over a bounded pool (`buffer_unordered`) and fans
//! back in on this task. Workers only return values; the record collection
//! and its URL index are mutated here alone, as results arrive.
//!
//! # Example
//!
//! ```no_run
//! use cekfakta::config::Config;
//! use cekfakta::crawler::{create_session, Orchestrator};
//! use cekfakta::models::Source;
//! use cekfakta::storage::ResultSink;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::for_source(Source::Kompas);
//! let fetcher = create_session(&config)?;
//! let sink = ResultSink::from_config(&config.output);
//!
//! let mut orchestrator = Orchestrator::new(config, fetcher);
//! let report = orchestrator.run(&sink).await?;
//! println!("{} articles, {} failed", report.records.len(), report.failed_urls.len());
//! # Ok(())
//! # }
//! ```

use chrono::Utc;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::collections::HashMap;

use crate::config::Config;
use crate::crawler::article::fetch_article;
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::list::{fetch_listing_page, ListUrlBuilder};
use crate::crawler::pacer::Pacer;
use crate::error::Error;
use crate::models::{ArticleDetail, ArticleRecord, ArticleStub, CrawlStats, Source};
use crate::parser::ArticleParser;
use crate::storage::{PersistOutcome, ResultSink};
use crate::utils::error::{CrawlerError, FetchError};

// ============================================================================
// Run state
// ============================================================================

/// Position of a run in its state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CrawlPhase {
    Init,
    Listing,
    Detail,
    Persisted,
    Done,
    Aborted,
}

/// Result of one article task
#[derive(Debug)]
pub enum DetailOutcome {
    Ok(ArticleDetail),
    Failed(FetchError),
}

impl DetailOutcome {
    /// Detail to merge; a failure becomes an all-absent detail with its reason
    pub fn into_detail(self) -> ArticleDetail {
        match self {
            Self::Ok(detail) => detail,
            Self::Failed(e) => ArticleDetail::failed(e.to_string()),
        }
    }
}

impl From<Result<ArticleDetail, FetchError>> for DetailOutcome {
    fn from(result: Result<ArticleDetail, FetchError>) -> Self {
        match result {
            Ok(detail) => Self::Ok(detail),
            Err(e) => Self::Failed(e),
        }
    }
}

/// A listing page that contributed nothing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageFailure {
    pub page: u32,
    pub url: String,
    pub error: String,
}

/// Everything a run produced
#[derive(Debug, Clone, Serialize)]
pub struct CrawlReport {
    pub source: Source,

    /// Records in detail-completion order
    pub records: Vec<ArticleRecord>,

    /// Records without full text
    pub failed_urls: Vec<String>,

    pub failed_pages: Vec<PageFailure>,

    pub stats: CrawlStats,

    /// Set once results are written
    pub persisted: Option<PersistOutcome>,
}

// ============================================================================
// Record collection
// ============================================================================

/// Records keyed by URL, owned by the orchestrator
#[derive(Debug, Default)]
pub struct RecordSet {
    records: Vec<ArticleRecord>,
    index: HashMap<String, usize>,
    merge_order: Vec<usize>,
}

impl RecordSet {
    /// Add a stub; a URL seen before keeps its slot and takes the newer stub.
    ///
    /// Returns `false` when the URL was already present.
    pub fn upsert_stub(&mut self, stub: ArticleStub) -> bool {
        match self.index.get(&stub.url) {
            Some(&idx) => {
                self.records[idx] = ArticleRecord::from_stub(stub);
                false
            }
            None => {
                self.index.insert(stub.url.clone(), self.records.len());
                self.records.push(ArticleRecord::from_stub(stub));
                true
            }
        }
    }

    /// Merge a detail into the record for `url`.
    ///
    /// Returns `false` for unknown URLs and for records already merged.
    pub fn merge(&mut self, url: &str, detail: ArticleDetail) -> bool {
        let Some(&idx) = self.index.get(url) else {
            return false;
        };
        let record = &mut self.records[idx];
        if record.detail_merged {
            return false;
        }
        record.merge_detail(detail);
        self.merge_order.push(idx);
        true
    }

    pub fn urls(&self) -> Vec<String> {
        self.records.iter().map(|r| r.url.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, url: &str) -> Option<&ArticleRecord> {
        self.index.get(url).map(|&idx| &self.records[idx])
    }

    /// Records in merge order, then any never merged in listing order
    pub fn in_completion_order(&self) -> Vec<ArticleRecord> {
        let mut ordered: Vec<ArticleRecord> = self
            .merge_order
            .iter()
            .map(|&idx| self.records[idx].clone())
            .collect();
        ordered.extend(self.records.iter().filter(|r| !r.detail_merged).cloned());
        ordered
    }
}

// ============================================================================
// Orchestrator
// ============================================================================

/// Drives one crawl run
pub struct Orchestrator<F: PageFetcher> {
    config: Config,
    fetcher: F,
    pacer: Pacer,
    parser: ArticleParser,
    urls: ListUrlBuilder,
    phase: CrawlPhase,
    records: RecordSet,
    failed_pages: Vec<PageFailure>,
    stats: CrawlStats,
}

impl<F: PageFetcher> Orchestrator<F> {
    pub fn new(config: Config, fetcher: F) -> Self {
        let source = config.site.source;
        let urls = ListUrlBuilder::new(source, config.base_url());

        Self {
            pacer: Pacer::from_config(&config.crawl),
            parser: ArticleParser::new(source),
            urls,
            config,
            fetcher,
            phase: CrawlPhase::Init,
            records: RecordSet::default(),
            failed_pages: Vec::new(),
            stats: CrawlStats::default(),
        }
    }

    /// Replace the pacer built from the config
    #[must_use]
    pub fn with_pacer(mut self, pacer: Pacer) -> Self {
        self.pacer = pacer;
        self
    }

    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    pub fn records(&self) -> &RecordSet {
        &self.records
    }

    pub fn stats(&self) -> &CrawlStats {
        &self.stats
    }

    /// Run every phase, then write results through `sink`
    ///
    /// # Errors
    ///
    /// Fails when the run aborts (probe failed, no stubs) or the results
    /// cannot be written. Per-page and per-article failures are reported in
    /// the returned [`CrawlReport`] instead.
    pub async fn run(&mut self, sink: &ResultSink) -> Result<CrawlReport, Error> {
        let mut report = self.run_phases().await?;

        let outcome = sink.persist(&report.records).map_err(|e| Error::storage(&e))?;
        self.phase = CrawlPhase::Persisted;

        report.persisted = Some(outcome);
        self.phase = CrawlPhase::Done;

        tracing::info!(
            source = %report.source,
            records = report.records.len(),
            failed_urls = report.failed_urls.len(),
            failed_pages = report.failed_pages.len(),
            success_rate = format!("{:.1}%", report.stats.success_rate() * 100.0),
            "Crawl finished"
        );

        Ok(report)
    }

    /// Probe, listing phase and detail phase, without writing anything
    ///
    /// # Errors
    ///
    /// `CrawlerError::ProbeFailed` or `CrawlerError::NoArticlesFound`; the
    /// run is then [`CrawlPhase::Aborted`].
    pub async fn run_phases(&mut self) -> Result<CrawlReport, CrawlerError> {
        self.stats.started_at = Some(Utc::now());

        self.probe().await?;
        self.listing_phase().await?;
        self.detail_phase().await;

        self.stats.finished_at = Some(Utc::now());

        let records = self.records.in_completion_order();
        let failed_urls = records
            .iter()
            .filter(|r| !r.has_full_text())
            .map(|r| r.url.clone())
            .collect();

        Ok(CrawlReport {
            source: self.config.site.source,
            records,
            failed_urls,
            failed_pages: self.failed_pages.clone(),
            stats: self.stats.clone(),
            persisted: None,
        })
    }

    /// Connectivity probe; a failure or checkpoint aborts the run
    async fn probe(&mut self) -> Result<(), CrawlerError> {
        let url = self.urls.probe_url();
        tracing::info!(source = %self.config.site.source, url = %url, "Probing site");

        match self.fetcher.fetch(&url).await {
            Ok(page) => {
                tracing::debug!(final_url = %page.final_url, status = page.status, "Probe ok");
                Ok(())
            }
            Err(source) => {
                self.phase = CrawlPhase::Aborted;
                tracing::error!(url = %url, error = %source, "Connectivity probe failed, aborting");
                Err(CrawlerError::ProbeFailed { url, source })
            }
        }
    }

    /// Phase 1: fetch pages `1..=max_pages`, collect stubs
    async fn listing_phase(&mut self) -> Result<(), CrawlerError> {
        self.phase = CrawlPhase::Listing;
        let max_pages = self.config.crawl.max_pages;
        let concurrency = self.config.crawl.concurrency;

        tracing::info!(max_pages, concurrency, "Listing phase started");

        let fetcher = &self.fetcher;
        let pacer = &self.pacer;
        let urls = &self.urls;

        let mut pages = stream::iter(1..=max_pages)
            .map(|page| async move {
                let result = fetch_listing_page(fetcher, pacer, urls, page).await;
                (page, result)
            })
            .buffer_unordered(concurrency);

        while let Some((page, result)) = pages.next().await {
            self.stats.pages_requested += 1;

            match result {
                Ok(listing) => {
                    if listing.is_empty() {
                        tracing::warn!(page, "Listing page has no article containers");
                    }
                    for stub in listing.stubs {
                        if !self.records.upsert_stub(stub) {
                            self.stats.duplicate_urls += 1;
                        }
                    }
                }
                Err(e) => {
                    self.stats.pages_failed += 1;
                    tracing::warn!(page, error = %e, "Listing page failed");
                    self.failed_pages.push(PageFailure {
                        page,
                        url: urls.page_url(page),
                        error: e.to_string(),
                    });
                }
            }
        }
        drop(pages);

        self.stats.stubs_found = self.records.len();
        tracing::info!(
            stubs = self.records.len(),
            duplicates = self.stats.duplicate_urls,
            failed_pages = self.stats.pages_failed,
            "Listing phase finished"
        );

        if self.records.is_empty() {
            self.phase = CrawlPhase::Aborted;
            tracing::error!(pages = max_pages, "No articles found, aborting");
            return Err(CrawlerError::NoArticlesFound { pages: max_pages });
        }

        Ok(())
    }

    /// Phase 2: fetch every distinct URL and merge the details
    async fn detail_phase(&mut self) {
        self.phase = CrawlPhase::Detail;
        let targets = self.records.urls();
        let concurrency = self.config.crawl.concurrency;

        tracing::info!(articles = targets.len(), concurrency, "Detail phase started");

        let fetcher = &self.fetcher;
        let pacer = &self.pacer;
        let parser = &self.parser;

        let mut details = stream::iter(targets)
            .map(|url| async move {
                let outcome = DetailOutcome::from(fetch_article(fetcher, pacer, parser, &url).await);
                (url, outcome)
            })
            .buffer_unordered(concurrency);

        while let Some((url, outcome)) = details.next().await {
            match &outcome {
                DetailOutcome::Ok(detail) => {
                    self.stats.details_ok += 1;
                    if detail.full_text.is_none() {
                        tracing::warn!(url = %url, "Article has no extractable text");
                    }
                }
                DetailOutcome::Failed(e) => {
                    self.stats.details_failed += 1;
                    tracing::warn!(url = %url, error = %e, "Article fetch failed");
                }
            }

            if !self.records.merge(&url, outcome.into_detail()) {
                tracing::debug!(url = %url, "Detail for unknown or merged URL ignored");
            }
        }

        tracing::info!(
            ok = self.stats.details_ok,
            failed = self.stats.details_failed,
            "Detail phase finished"
        );
    }
}

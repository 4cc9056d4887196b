//! cekfakta - Indonesian fact-check article crawler
//!
//! Collects debunking articles from turnbackhoax.id and the kompas.com
//! cekfakta section into chunked CSV files.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Per-site defaults, TOML and environment overrides
//! - [`crawler`] - HTTP session, pacing and the two-phase orchestrator
//! - [`parser`] - Listing and article extraction, text cleanup
//! - [`models`] - Stubs, details, merged records and run statistics
//! - [`storage`] - Chunked CSV output and the failure manifest
//! - [`utils`] - Retry policy, domain errors and URL helpers
//!
//! # Example
//!
//! ```no_run
//! use cekfakta::config::Config;
//! use cekfakta::crawler::{create_session, Orchestrator};
//! use cekfakta::models::Source;
//! use cekfakta::storage::ResultSink;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::for_source(Source::TurnBackHoax);
//!     let fetcher = create_session(&config)?;
//!     let sink = ResultSink::from_config(&config.output);
//!
//!     let report = Orchestrator::new(config, fetcher).run(&sink).await?;
//!     println!("{} records", report.records.len());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod crawler;
pub mod error;
pub mod logging;
pub mod models;
pub mod parser;
pub mod storage;
pub mod utils;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::crawler::{create_session, CrawlReport, Orchestrator, PageFetcher};
    pub use crate::error::{CrawlErrorExt, Error, ErrorCategory, Result};
    pub use crate::models::{ArticleDetail, ArticleRecord, ArticleStub, CrawlStats, Source};
    pub use crate::parser::ArticleParser;
    pub use crate::storage::ResultSink;
}

// Direct re-exports for convenience
pub use models::{ArticleRecord, CrawlStats, Source};

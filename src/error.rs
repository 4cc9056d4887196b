//! Unified error handling for the cekfakta crate
//!
//! Domain errors stay specific ([`FetchError`], [`ParseError`],
//! [`CrawlerError`]); [`Error`] wraps them at module boundaries.
//!
//! # Usage
//!
//! ```
//! use cekfakta::error::{CrawlErrorExt, Error, ErrorCategory, FetchError};
//!
//! let err = Error::from(FetchError::Checkpoint { url: "https://www.kompas.com/checkpoint".into() });
//! assert_eq!(err.category(), ErrorCategory::Blocked);
//! assert!(!err.is_recoverable());
//! ```

use thiserror::Error;

// Re-export domain-specific errors for convenience
pub use crate::utils::error::{CrawlerError, FetchError, ParseError};

/// Common interface of the crate's error types
pub trait CrawlErrorExt: std::error::Error {
    /// Whether trying again later could succeed
    fn is_recoverable(&self) -> bool;

    /// Coarse classification for reporting
    fn category(&self) -> ErrorCategory;
}

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// HTTP, timeout, retry exhaustion
    Network,
    /// Anti-bot checkpoint pages
    Blocked,
    /// Markup and payload extraction
    Parsing,
    /// Output files
    Storage,
    /// Configuration and validation
    Config,
    /// Other/unknown errors
    Other,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Blocked => "blocked",
            Self::Parsing => "parsing",
            Self::Storage => "storage",
            Self::Config => "config",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl CrawlErrorExt for FetchError {
    fn is_recoverable(&self) -> bool {
        match self {
            Self::Http(_) | Self::Timeout | Self::MaxRetriesExceeded { .. } => true,
            Self::Status(status) => *status == 429 || *status >= 500,
            Self::Checkpoint { .. }
            | Self::Decode(_)
            | Self::InvalidUrl(_)
            | Self::InvalidHeader(_) => false,
        }
    }

    fn category(&self) -> ErrorCategory {
        if self.is_blocked() {
            return ErrorCategory::Blocked;
        }
        match self {
            Self::InvalidHeader(_) => ErrorCategory::Config,
            _ => ErrorCategory::Network,
        }
    }
}

impl CrawlErrorExt for ParseError {
    fn is_recoverable(&self) -> bool {
        false
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Parsing
    }
}

impl CrawlErrorExt for CrawlerError {
    fn is_recoverable(&self) -> bool {
        match self {
            Self::Fetch(e) => e.is_recoverable(),
            Self::Parse(e) => e.is_recoverable(),
            Self::ProbeFailed { source, .. } => source.is_recoverable(),
            Self::NoArticlesFound { .. } => false,
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Fetch(e) | Self::ProbeFailed { source: e, .. } => e.category(),
            Self::Parse(e) => e.category(),
            Self::NoArticlesFound { .. } => ErrorCategory::Parsing,
        }
    }
}

/// Unified error type for the cekfakta crate
#[derive(Error, Debug)]
pub enum Error {
    /// Run-level crawl errors (probe, empty listing)
    #[error("Crawler error: {0}")]
    Crawler(#[from] CrawlerError),

    /// Fetch-specific errors
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Parse-specific errors
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Writing results failed
    #[error("Storage error: {0}")]
    Storage(String),
}

impl CrawlErrorExt for Error {
    fn is_recoverable(&self) -> bool {
        match self {
            Self::Crawler(e) => e.is_recoverable(),
            Self::Fetch(e) => e.is_recoverable(),
            Self::Parse(e) => e.is_recoverable(),
            Self::Storage(_) => false,
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Crawler(e) => e.category(),
            Self::Fetch(e) => e.category(),
            Self::Parse(e) => e.category(),
            Self::Storage(_) => ErrorCategory::Storage,
        }
    }
}

impl Error {
    /// Storage error keeping the whole context chain of `err`
    pub fn storage(err: &anyhow::Error) -> Self {
        Self::Storage(format!("{err:#}"))
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;
